// Copyright 2024 The CollabMap Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Data types shared between the replication engine and the transport,
//! storage, and registry collaborators it is wired up to.

mod collaborative;
mod event;
mod message;
mod operation;
mod registry;
mod storage;
mod stored_value;
mod transport;

pub use collaborative::CollaborativeObject;
pub use event::MapEvent;
pub use message::Message;
pub use message::MessageKind;
pub use message::SequencedMessage;
pub use operation::Operation;
pub use registry::ObjectFactory;
pub use registry::ObjectRegistry;
pub use storage::ObjectStorage;
pub use stored_value::StoredValue;
pub use stored_value::UserValue;
pub use transport::ConnectResult;
pub use transport::DeltaTransport;
pub use transport::ReferenceSequenceNumberProvider;

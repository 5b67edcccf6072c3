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

//! In-process mocks for the delta transport, object storage, and registry
//! collaborators this crate's core treats as external. Mirrors the role
//! `common_meta_local_store::KV` plays for the rest of the grounding
//! workspace: a local, in-process stand-in for a networked service, so the
//! replication engine's own test suite never needs a real sequencer.

mod mock_transport;
mod registry;
mod storage;

pub use mock_transport::MockTransport;
pub use mock_transport::TransportEvent;
pub use registry::CollabMapFactory;
pub use registry::InMemoryRegistry;
pub use storage::InMemoryStorage;

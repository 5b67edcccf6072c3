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

//! Operation-based replication engine for a collaborative key-value map.
//!
//! A [`CollabMap`] starts out local: reads and writes apply immediately to
//! its own Map State with no network involved. Calling
//! [`CollabMap::attach`] connects it to a central sequencer through a
//! [`collabmap_types::DeltaTransport`]; from then on every mutation is
//! optimistically applied locally and reconciled against the sequencer's
//! total order as acknowledgements arrive.

mod config;
mod engine;
mod map_state;
mod nested_cache;
mod op_log;
mod snapshot;
mod value_codec;

#[cfg(test)]
mod testing;

pub use config::EngineConfig;
pub use engine::CollabMap;
pub use snapshot::SnapshotEnvelope;

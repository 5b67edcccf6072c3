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

//! Engine configuration, analogous in spirit to the workspace's
//! `RaftConfig`: a small serde-deserializable struct with sensible defaults,
//! carried without pulling in the rest of that crate's CLI surface (this
//! spec's non-goals exclude CLI/packaging).

/// Tunables for one `CollabMap` instance.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    /// Prefix used by `CollabMap::new_anonymous` when a caller does not
    /// supply an explicit object id (tests and small demos mostly).
    pub id_namespace: String,

    /// Log a `tracing::warn!` for every duplicate ack (an inbound own-client
    /// message that does not match the Operation Log head). Disabling this
    /// does not change behavior, only verbosity: the duplicate-ack counter
    /// (`CollabMap::duplicate_ack_count`) is always maintained regardless of
    /// this flag.
    pub warn_on_duplicate_ack: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            id_namespace: "collabmap".to_string(),
            warn_on_duplicate_ack: true,
        }
    }
}

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

//! Serialize/restore `{ sequence_number, map_state }`, the engine's only
//! persisted artifact, handed to/read from an `ObjectStorage` collaborator.

use std::collections::BTreeMap;
use std::sync::Arc;

use collabmap_exception::Error;
use collabmap_exception::Result;
use collabmap_types::ObjectStorage;
use collabmap_types::StoredValue;

use crate::map_state::MapState;

/// Wire shape: `{ sequenceNumber: int, snapshot: { <key>: <StoredValue> } }`.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotEnvelope {
    pub sequence_number: u64,
    pub snapshot: BTreeMap<String, StoredValue>,
}

/// Serialize `map`'s current state (a value copy) at `sequence_number` and
/// hand it to `storage`.
pub async fn write_snapshot(
    id: &str,
    sequence_number: u64,
    map: &MapState,
    storage: &dyn ObjectStorage,
) -> Result<()> {
    let envelope = SnapshotEnvelope { sequence_number, snapshot: map.deep_copy() };
    let blob = serde_json::to_vec(&envelope).map_err(Error::Snapshot)?;
    storage.write(id, blob).await
}

/// Read `id`'s blob from `storage` and parse it. If there is no blob (a
/// brand-new document), returns an empty map state at `sequence_number = 0`.
pub async fn load_snapshot(id: &str, storage: &dyn ObjectStorage) -> Result<(MapState, u64)> {
    match storage.read(id).await? {
        Some(blob) => {
            let envelope: SnapshotEnvelope =
                serde_json::from_slice(&blob).map_err(Error::Snapshot)?;
            Ok((MapState::from_snapshot(envelope.snapshot), envelope.sequence_number))
        }
        None => Ok((MapState::new(), 0)),
    }
}

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

//! The key -> value store and its mutation primitives.
//!
//! `MapState` itself never decides whether a mutation is "allowed": that is
//! the Replication Engine's job (optimistic local apply vs. sequenced remote
//! apply). `MapState` only guarantees the primitives are idempotent where the
//! spec requires it (`delete` of a missing key, `clear` of an empty map).

use std::collections::BTreeMap;

use collabmap_types::MapEvent;
use collabmap_types::StoredValue;

/// insertion order is not observable, so a `BTreeMap` (sorted iteration) is as
/// good a choice as a `HashMap` and makes `keys()` and snapshot diffs
/// deterministic for tests and debugging.
#[derive(Default, Debug, Clone)]
pub struct MapState {
    slots: BTreeMap<String, StoredValue>,
}

impl MapState {
    pub fn new() -> Self {
        MapState { slots: BTreeMap::new() }
    }

    pub fn from_snapshot(slots: BTreeMap<String, StoredValue>) -> Self {
        MapState { slots }
    }

    pub fn get(&self, key: &str) -> Option<&StoredValue> {
        self.slots.get(key)
    }

    pub fn has(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.slots.keys().cloned().collect()
    }

    /// A value copy of the current state, safe to serialize independently of
    /// subsequent mutations: the snapshot must not be mutated by later
    /// writes.
    pub fn deep_copy(&self) -> BTreeMap<String, StoredValue> {
        self.slots.clone()
    }

    /// Overwrite `key`'s slot unconditionally. Always emits `ValueChanged`.
    pub fn set_core(&mut self, key: String, value: StoredValue) -> MapEvent {
        self.slots.insert(key.clone(), value);
        MapEvent::ValueChanged { key }
    }

    /// Remove `key`'s slot. A no-op if absent, but the event still fires: a
    /// remote delete of a key this replica already lacks (e.g. because of a
    /// concurrent local clear) must still surface as a `ValueChanged` so
    /// observers stay in sync with the server's total order.
    pub fn delete_core(&mut self, key: String) -> MapEvent {
        self.slots.remove(&key);
        MapEvent::ValueChanged { key }
    }

    pub fn clear_core(&mut self) -> MapEvent {
        self.slots.clear();
        MapEvent::Clear
    }
}

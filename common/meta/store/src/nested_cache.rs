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

//! Lazily materializes and caches nested collaborative objects referenced by
//! `StoredValue::Reference` values.

use std::collections::HashMap;
use std::sync::Arc;

use collabmap_exception::Error;
use collabmap_exception::Result;
use collabmap_types::CollaborativeObject;
use collabmap_types::DeltaTransport;
use collabmap_types::ObjectRegistry;
use collabmap_types::ObjectStorage;

/// Handle cache, populated on demand. Lifetime of a cached handle extends for
/// the life of the parent map: nothing ever evicts an entry here, it is
/// dropped only when the owning `CollabMap` is dropped.
#[derive(Default)]
pub struct NestedObjectCache {
    handles: HashMap<String, Arc<dyn CollaborativeObject>>,
}

impl NestedObjectCache {
    pub fn new() -> Self {
        NestedObjectCache { handles: HashMap::new() }
    }

    /// Register a handle directly, used by the Value Codec when `encode`
    /// turns a freshly-`set` collaborative object into a `Reference`: the
    /// handle must already be in the cache by the time the outer message is
    /// submitted.
    pub fn insert(&mut self, id: String, handle: Arc<dyn CollaborativeObject>) {
        self.handles.insert(id, handle);
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn CollaborativeObject>> {
        self.handles.get(id).cloned()
    }

    /// Consult the registry for a factory matching `kind`, instantiate the
    /// object bound to `storage`/`registry`, cache it by `id`, and return it.
    pub async fn materialize(
        &mut self,
        kind: &str,
        id: &str,
        transport: Arc<dyn DeltaTransport>,
        storage: Arc<dyn ObjectStorage>,
        registry: Arc<dyn ObjectRegistry>,
    ) -> Result<Arc<dyn CollaborativeObject>> {
        if let Some(handle) = self.get(id) {
            return Ok(handle);
        }

        let factory = registry
            .get_extension(kind)
            .ok_or_else(|| Error::UnknownKind(kind.to_string()))?;

        let handle = factory.load(id, transport, storage, registry.clone()).await?;
        self.insert(id.to_string(), handle.clone());
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubCollaborativeObject;

    #[test]
    fn insert_then_get_returns_the_same_handle() {
        let mut cache = NestedObjectCache::new();
        let obj: Arc<dyn CollaborativeObject> =
            Arc::new(StubCollaborativeObject::new("doc-1", "map"));
        cache.insert("doc-1".to_string(), obj.clone());
        let got = cache.get("doc-1").unwrap();
        assert_eq!(got.id(), "doc-1");
    }

    #[test]
    fn get_of_unknown_id_is_none() {
        let cache = NestedObjectCache::new();
        assert!(cache.get("nope").is_none());
    }
}

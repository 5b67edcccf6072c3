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

//! Encode/decode between the `UserValue` a caller hands to `set`/gets back
//! from `get`, and the `StoredValue` that actually lives in Map State.

use std::sync::Arc;

use collabmap_exception::Result;
use collabmap_types::DeltaTransport;
use collabmap_types::ObjectRegistry;
use collabmap_types::ObjectStorage;
use collabmap_types::StoredValue;
use collabmap_types::UserValue;

use crate::nested_cache::NestedObjectCache;

/// Turn a `UserValue` into the `StoredValue` that will be written to Map
/// State. A collaborative object is registered into `cache` as a side
/// effect, *before* this returns, so invariant 5 (the reference's target
/// has a cache entry at submission time) holds even for an object created in
/// the same call that sets it.
pub fn encode(value: UserValue, cache: &mut NestedObjectCache) -> StoredValue {
    match value {
        UserValue::Plain(v) => StoredValue::Plain(v),
        UserValue::Object(obj) => {
            let kind = obj.kind().to_string();
            let id = obj.id().to_string();
            cache.insert(id.clone(), obj);
            StoredValue::Reference { kind, id }
        }
    }
}

/// Turn a `StoredValue` back into a `UserValue`. `Plain` is returned as-is.
/// `Reference` is resolved from `cache`, materializing through `registry` on
/// a cache miss (e.g. a reference to an object created by another client).
pub async fn decode(
    value: &StoredValue,
    cache: &mut NestedObjectCache,
    transport: Arc<dyn DeltaTransport>,
    storage: Arc<dyn ObjectStorage>,
    registry: Arc<dyn ObjectRegistry>,
) -> Result<UserValue> {
    match value {
        StoredValue::Plain(v) => Ok(UserValue::Plain(v.clone())),
        StoredValue::Reference { kind, id } => {
            let handle = cache.materialize(kind, id, transport, storage, registry).await?;
            Ok(UserValue::Object(handle))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubCollaborativeObject;
    use crate::testing::StubRegistry;
    use crate::testing::StubStorage;
    use crate::testing::StubTransport;
    use collabmap_types::DeltaTransport;

    #[test]
    fn encode_plain_value_passes_through() {
        let mut cache = NestedObjectCache::new();
        let stored = encode(UserValue::Plain(serde_json::json!(42)), &mut cache);
        assert_eq!(stored, StoredValue::Plain(serde_json::json!(42)));
    }

    #[test]
    fn encode_object_registers_into_cache_and_produces_reference() {
        let mut cache = NestedObjectCache::new();
        let obj: Arc<dyn collabmap_types::CollaborativeObject> =
            Arc::new(StubCollaborativeObject::new("doc-1", "map"));
        let stored = encode(UserValue::Object(obj), &mut cache);
        assert_eq!(stored, StoredValue::reference("map", "doc-1"));
        assert!(cache.get("doc-1").is_some());
    }

    #[tokio::test]
    async fn decode_reference_hits_cache_without_touching_registry() {
        let mut cache = NestedObjectCache::new();
        let obj: Arc<dyn collabmap_types::CollaborativeObject> =
            Arc::new(StubCollaborativeObject::new("doc-1", "map"));
        cache.insert("doc-1".to_string(), obj);

        let transport: Arc<dyn DeltaTransport> = Arc::new(StubTransport);
        let storage: Arc<dyn ObjectStorage> = Arc::new(StubStorage::default());
        let registry: Arc<dyn ObjectRegistry> = Arc::new(StubRegistry::empty());

        let decoded = decode(
            &StoredValue::reference("map", "doc-1"),
            &mut cache,
            transport,
            storage,
            registry,
        )
        .await
        .unwrap();

        match decoded {
            UserValue::Object(o) => assert_eq!(o.id(), "doc-1"),
            UserValue::Plain(_) => panic!("expected Object"),
        }
    }

    #[tokio::test]
    async fn decode_unknown_kind_is_an_error() {
        let mut cache = NestedObjectCache::new();
        let transport: Arc<dyn DeltaTransport> = Arc::new(StubTransport);
        let storage: Arc<dyn ObjectStorage> = Arc::new(StubStorage::default());
        let registry: Arc<dyn ObjectRegistry> = Arc::new(StubRegistry::empty());

        let err = decode(
            &StoredValue::reference("widget", "doc-2"),
            &mut cache,
            transport,
            storage,
            registry,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, collabmap_exception::Error::UnknownKind(k) if k == "widget"));
    }
}

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

//! An `ObjectRegistry` with one built-in factory, `CollabMapFactory`, which
//! materializes a reference as another `CollabMap` of kind `"map"` — the
//! only kind this workspace needs since the only nested collaborative
//! object type it defines is `CollabMap` itself.

use std::collections::HashMap;
use std::sync::Arc;

use collabmap_exception::Result;
use collabmap_store::CollabMap;
use collabmap_store::EngineConfig;
use collabmap_types::CollaborativeObject;
use collabmap_types::DeltaTransport;
use collabmap_types::ObjectFactory;
use collabmap_types::ObjectRegistry;
use collabmap_types::ObjectStorage;

pub struct CollabMapFactory;

#[async_trait::async_trait]
impl ObjectFactory for CollabMapFactory {
    async fn load(
        &self,
        id: &str,
        transport: Arc<dyn DeltaTransport>,
        storage: Arc<dyn ObjectStorage>,
        registry: Arc<dyn ObjectRegistry>,
    ) -> Result<Arc<dyn CollaborativeObject>> {
        let map = CollabMap::new(id, EngineConfig::default());
        map.attach(transport, storage, registry).await?;
        Ok(map)
    }
}

#[derive(Default)]
pub struct InMemoryRegistry {
    factories: HashMap<String, Arc<dyn ObjectFactory>>,
}

impl InMemoryRegistry {
    pub fn empty() -> Self {
        InMemoryRegistry::default()
    }

    /// A registry with the one factory this workspace ships, keyed under
    /// `"map"` the way `CollabMap::kind_str` names itself.
    pub fn with_map_factory() -> Self {
        let mut registry = InMemoryRegistry::default();
        registry.register("map", Arc::new(CollabMapFactory));
        registry
    }

    pub fn register(&mut self, kind: impl Into<String>, factory: Arc<dyn ObjectFactory>) {
        self.factories.insert(kind.into(), factory);
    }
}

impl ObjectRegistry for InMemoryRegistry {
    fn get_extension(&self, kind: &str) -> Option<Arc<dyn ObjectFactory>> {
        self.factories.get(kind).cloned()
    }
}

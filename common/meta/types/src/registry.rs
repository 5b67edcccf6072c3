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

use std::sync::Arc;

use crate::CollaborativeObject;
use crate::DeltaTransport;
use crate::ObjectStorage;
use collabmap_exception::Result;

/// Builds a live collaborative object of one specific `kind`, bound to the
/// same transport/storage services as the parent map that is materializing
/// it.
#[async_trait::async_trait]
pub trait ObjectFactory: Send + Sync {
    async fn load(
        &self,
        id: &str,
        transport: Arc<dyn DeltaTransport>,
        storage: Arc<dyn ObjectStorage>,
        registry: Arc<dyn ObjectRegistry>,
    ) -> Result<Arc<dyn CollaborativeObject>>;
}

/// The registry that instantiates nested collaborative object types. Out of
/// scope for this crate's core: the Nested Object Registry Adapter
/// (`collabmap-store`) only *consults* this trait, it does not implement it.
pub trait ObjectRegistry: Send + Sync {
    fn get_extension(&self, kind: &str) -> Option<Arc<dyn ObjectFactory>>;
}

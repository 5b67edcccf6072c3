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

//! Minimal stand-ins for `CollaborativeObject`/`ObjectStorage`/`ObjectRegistry`
//! used only by this crate's own unit tests. The full mock transport/storage/
//! registry used for engine-level integration tests live in
//! `collabmap-testing`, a separate crate, so downstream consumers of this
//! crate's public API can reuse them too.

use std::collections::HashMap;
use std::sync::Arc;

use collabmap_exception::Result;
use collabmap_exception::ToCollabError;
use collabmap_types::CollaborativeObject;
use collabmap_types::ConnectResult;
use collabmap_types::DeltaTransport;
use collabmap_types::Message;
use collabmap_types::ObjectFactory;
use collabmap_types::ObjectRegistry;
use collabmap_types::ObjectStorage;
use collabmap_types::ReferenceSequenceNumberProvider;
use collabmap_types::SequencedMessage;

pub struct StubCollaborativeObject {
    id: String,
    kind: String,
}

impl StubCollaborativeObject {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        StubCollaborativeObject { id: id.into(), kind: kind.into() }
    }
}

#[async_trait::async_trait]
impl CollaborativeObject for StubCollaborativeObject {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> &str {
        &self.kind
    }

    fn is_local(&self) -> bool {
        true
    }

    async fn attach(&self) -> Result<()> {
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[derive(Default)]
pub struct StubStorage {
    blobs: std::sync::Mutex<HashMap<String, Vec<u8>>>,
}

#[async_trait::async_trait]
impl ObjectStorage for StubStorage {
    async fn read(&self, id: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.blobs.lock().unwrap().get(id).cloned())
    }

    async fn write(&self, id: &str, blob: Vec<u8>) -> Result<()> {
        self.blobs.lock().unwrap().insert(id.to_string(), blob);
        Ok(())
    }
}

#[derive(Default)]
pub struct StubRegistry {
    factories: HashMap<String, Arc<dyn ObjectFactory>>,
}

impl StubRegistry {
    pub fn empty() -> Self {
        StubRegistry::default()
    }
}

impl ObjectRegistry for StubRegistry {
    fn get_extension(&self, kind: &str) -> Option<Arc<dyn ObjectFactory>> {
        self.factories.get(kind).cloned()
    }
}

/// A `DeltaTransport` that never actually connects anywhere; only useful to
/// satisfy signatures in unit tests that never submit or receive a message.
/// Engine-level tests that exercise real connect/submit/deliver behavior use
/// `collabmap-testing`'s `MockTransport` instead.
#[derive(Default)]
pub struct StubTransport;

#[async_trait::async_trait]
impl DeltaTransport for StubTransport {
    async fn connect(
        &self,
        _id: &str,
        _kind: &str,
        _reference_sequence_number: ReferenceSequenceNumberProvider,
    ) -> Result<ConnectResult> {
        Err("StubTransport never connects").map_err_to_transport(|| "connect".to_string())
    }

    async fn submit(&self, _message: Message) -> Result<()> {
        Err("StubTransport never submits").map_err_to_transport(|| "submit".to_string())
    }

    fn take_receiver(&self) -> Option<tokio::sync::mpsc::UnboundedReceiver<SequencedMessage>> {
        None
    }
}

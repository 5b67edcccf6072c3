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

use std::collections::HashMap;
use std::sync::Mutex;

use collabmap_exception::Result;
use collabmap_types::ObjectStorage;

/// An `ObjectStorage` backed by a `HashMap`, shared by clone (`Arc` it at
/// the call site) so two engines in the same test can see the same blobs.
#[derive(Default)]
pub struct InMemoryStorage {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

#[async_trait::async_trait]
impl ObjectStorage for InMemoryStorage {
    async fn read(&self, id: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.blobs.lock().unwrap().get(id).cloned())
    }

    async fn write(&self, id: &str, blob: Vec<u8>) -> Result<()> {
        self.blobs.lock().unwrap().insert(id.to_string(), blob);
        Ok(())
    }
}

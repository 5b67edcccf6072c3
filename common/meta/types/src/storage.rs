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

use collabmap_exception::Result;

/// Opaque blob storage for snapshots, keyed by object id. Out of scope for
/// this crate's core: snapshot *content* is this crate's concern, snapshot
/// *storage* is not.
#[async_trait::async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn read(&self, id: &str) -> Result<Option<Vec<u8>>>;
    async fn write(&self, id: &str, blob: Vec<u8>) -> Result<()>;
}

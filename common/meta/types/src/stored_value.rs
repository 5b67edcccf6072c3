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

/// A value as it lives in `Map State`: either owned data or a pointer to
/// another collaborative object.
///
/// `Reference` never owns the pointed-to object; the map only remembers
/// enough to ask the registry adapter to materialize it again.
///
/// Wire shape is adjacently tagged as `{ type: "Plain"|"Collaborative",
/// value: .. }`, matching the interop format the transport and snapshot
/// blobs are expected to speak; `Reference`'s wire tag is renamed to
/// `"Collaborative"` since that is the name the format uses for it.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", content = "value")]
pub enum StoredValue {
    /// Opaque JSON-compatible payload, owned by the map.
    Plain(serde_json::Value),
    /// A pointer to a collaborative object: its kind tag (registry key) and id.
    #[serde(rename = "Collaborative")]
    Reference { kind: String, id: String },
}

impl StoredValue {
    pub fn reference(kind: impl Into<String>, id: impl Into<String>) -> Self {
        StoredValue::Reference { kind: kind.into(), id: id.into() }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, StoredValue::Reference { .. })
    }
}

/// The value a caller passes to `set` or gets back from `get`/`decode`.
///
/// This is the explicit tagged variant the design notes call for in place of
/// a runtime capability probe: a plain value is always `Plain`, a nested
/// collaborative object is always `Object`, decided at the call site rather
/// than inferred from the value's shape.
#[derive(Clone)]
pub enum UserValue {
    Plain(serde_json::Value),
    Object(Arc<dyn CollaborativeObject>),
}

impl std::fmt::Debug for UserValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserValue::Plain(v) => f.debug_tuple("Plain").field(v).finish(),
            UserValue::Object(o) => f
                .debug_struct("Object")
                .field("kind", &o.kind())
                .field("id", &o.id())
                .finish(),
        }
    }
}

impl From<serde_json::Value> for UserValue {
    fn from(v: serde_json::Value) -> Self {
        UserValue::Plain(v)
    }
}

impl From<Arc<dyn CollaborativeObject>> for UserValue {
    fn from(o: Arc<dyn CollaborativeObject>) -> Self {
        UserValue::Object(o)
    }
}

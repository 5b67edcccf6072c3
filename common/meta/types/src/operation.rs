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

//! The operation a `Message` carries: a mutation to apply to Map State.

use crate::StoredValue;

/// A mutation to Map State. `Delete` of a missing key and `Clear` of an
/// already-empty map are both no-ops, never errors: remote deletes must stay
/// idempotent against a concurrent local clear.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Operation {
    #[serde(rename = "set")]
    Set { key: String, value: StoredValue },
    #[serde(rename = "delete")]
    Delete { key: String },
    #[serde(rename = "clear")]
    Clear,
}

impl Operation {
    pub fn set(key: impl Into<String>, value: StoredValue) -> Self {
        Operation::Set { key: key.into(), value }
    }

    pub fn delete(key: impl Into<String>) -> Self {
        Operation::Delete { key: key.into() }
    }

    pub fn kind_str(&self) -> &'static str {
        match self {
            Operation::Set { .. } => "set",
            Operation::Delete { .. } => "delete",
            Operation::Clear => "clear",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shape_matches_spec() {
        let op = Operation::set("a", StoredValue::Plain(serde_json::json!(1)));
        let v = serde_json::to_value(&op).unwrap();
        assert_eq!(v["type"], "set");
        assert_eq!(v["key"], "a");
        assert_eq!(v["value"], serde_json::json!({"type": "Plain", "value": 1}));
    }

    #[test]
    fn set_of_a_reference_value_carries_the_collaborative_wire_shape() {
        let op = Operation::set("child", StoredValue::reference("map", "doc-1"));
        let v = serde_json::to_value(&op).unwrap();
        assert_eq!(
            v["value"],
            serde_json::json!({"type": "Collaborative", "value": {"kind": "map", "id": "doc-1"}})
        );
    }

    #[test]
    fn clear_has_no_payload_fields() {
        let v = serde_json::to_value(Operation::Clear).unwrap();
        assert_eq!(v, serde_json::json!({"type": "clear"}));
    }
}

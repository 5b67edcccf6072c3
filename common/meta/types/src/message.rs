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

use crate::Operation;

/// An outbound message: a local operation plus the sequence the client had
/// observed when it issued it.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub client_sequence_number: u64,
    pub reference_sequence_number: u64,
    pub op: Operation,
}

/// The non-operation control messages a transport may deliver. This engine
/// only acts on `Operation`; anything else is acknowledged by advancing
/// `sequence_number` and otherwise ignored.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Operation,
    NoOp,
}

/// A `Message` with the server overlay attached: the total order position,
/// the collaboration-wide low-water mark, and the origin client.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SequencedMessage {
    pub sequence_number: u64,
    pub minimum_sequence_number: u64,
    pub client_id: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub client_sequence_number: u64,
    pub reference_sequence_number: u64,
    pub op: Operation,
}

impl SequencedMessage {
    /// True when this message is the echo of a message this same client sent.
    pub fn is_own(&self, client_id: &str) -> bool {
        self.client_id == client_id
    }
}

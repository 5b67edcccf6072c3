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

//! FIFO of locally-issued operations awaiting server acknowledgement.
//!
//! Purely local bookkeeping: no thread, no lock of its own. Its only
//! consistency requirement is that entries are appended in
//! `client_sequence_number` order and popped only from the head, which
//! `OperationLog` upholds by construction (`push` only appends, `pop_head`
//! only removes the front).

use std::collections::VecDeque;

use collabmap_types::Message;

#[derive(Default, Debug)]
pub struct OperationLog {
    entries: VecDeque<Message>,
}

impl OperationLog {
    pub fn new() -> Self {
        OperationLog { entries: VecDeque::new() }
    }

    pub fn push(&mut self, message: Message) {
        debug_assert!(
            self.entries
                .back()
                .map(|m| m.client_sequence_number < message.client_sequence_number)
                .unwrap_or(true),
            "operation log entries must be appended in client_sequence_number order"
        );
        self.entries.push_back(message);
    }

    pub fn peek_head(&self) -> Option<&Message> {
        self.entries.front()
    }

    pub fn pop_head(&mut self) -> Option<Message> {
        self.entries.pop_front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.entries.iter()
    }
}

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

//! A hand-driven stand-in for the delta transport: one `MockTransport`
//! plays the role of one client's connection to the sequencer. Tests control
//! the total order directly by calling [`MockTransport::deliver`], rather
//! than this mock running an actual sequencer loop, so scenarios like a
//! duplicate ack or an out-of-order delivery can be constructed exactly as
//! spelled out in the spec's test scenarios.

use std::sync::Mutex;

use collabmap_exception::Result;
use collabmap_types::ConnectResult;
use collabmap_types::DeltaTransport;
use collabmap_types::Message;
use collabmap_types::ReferenceSequenceNumberProvider;
use collabmap_types::SequencedMessage;
use tokio::sync::mpsc;

/// One entry in a `MockTransport`'s combined connect/submit history, kept in
/// a single log (rather than two separate vectors) so a test can assert
/// relative ordering between a `connect` and a `submit` — e.g. that a nested
/// object's `connect` happened before its parent's queued `Set` was
/// submitted.
#[derive(Clone, Debug, PartialEq)]
pub enum TransportEvent {
    Connected { id: String },
    Submitted { client_sequence_number: u64 },
}

pub struct MockTransport {
    client_id: String,
    existing: bool,
    submitted: Mutex<Vec<Message>>,
    events: Mutex<Vec<TransportEvent>>,
    tx: mpsc::UnboundedSender<SequencedMessage>,
    rx: Mutex<Option<mpsc::UnboundedReceiver<SequencedMessage>>>,
}

impl MockTransport {
    /// `existing` controls what `connect` reports: whether the document
    /// this client is opening already has state on the sequencer (driving
    /// `CollabMap::attach`'s snapshot-load branch).
    pub fn new(client_id: impl Into<String>, existing: bool) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        MockTransport {
            client_id: client_id.into(),
            existing,
            submitted: Mutex::new(Vec::new()),
            events: Mutex::new(Vec::new()),
            tx,
            rx: Mutex::new(Some(rx)),
        }
    }

    /// Push a sequenced message onto this client's inbound channel, as if
    /// the sequencer had just delivered it.
    pub fn deliver(&self, message: SequencedMessage) {
        let _ = self.tx.send(message);
    }

    /// Messages submitted so far, in submission order.
    pub fn submitted(&self) -> Vec<Message> {
        self.submitted.lock().unwrap().clone()
    }

    /// The combined connect/submit history, in call order.
    pub fn events(&self) -> Vec<TransportEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DeltaTransport for MockTransport {
    async fn connect(
        &self,
        id: &str,
        _kind: &str,
        _reference_sequence_number: ReferenceSequenceNumberProvider,
    ) -> Result<ConnectResult> {
        self.events.lock().unwrap().push(TransportEvent::Connected { id: id.to_string() });
        Ok(ConnectResult { existing: self.existing, client_id: self.client_id.clone() })
    }

    async fn submit(&self, message: Message) -> Result<()> {
        self.events.lock().unwrap().push(TransportEvent::Submitted {
            client_sequence_number: message.client_sequence_number,
        });
        self.submitted.lock().unwrap().push(message);
        Ok(())
    }

    fn take_receiver(&self) -> Option<mpsc::UnboundedReceiver<SequencedMessage>> {
        self.rx.lock().unwrap().take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use collabmap_types::MessageKind;
    use collabmap_types::Operation;
    use collabmap_types::StoredValue;

    #[tokio::test]
    async fn connect_reports_configured_identity() {
        let transport = MockTransport::new("alice", true);
        let provider: ReferenceSequenceNumberProvider = std::sync::Arc::new(|| 0);
        let result = transport.connect("doc-1", "map", provider).await.unwrap();
        assert_eq!(result.client_id, "alice");
        assert!(result.existing);
    }

    #[tokio::test]
    async fn submit_records_messages_in_order() {
        let transport = MockTransport::new("alice", false);
        for cseq in 0..3 {
            transport
                .submit(Message {
                    client_sequence_number: cseq,
                    reference_sequence_number: 0,
                    op: Operation::set("k", StoredValue::Plain(serde_json::json!(cseq))),
                })
                .await
                .unwrap();
        }
        let submitted = transport.submitted();
        assert_eq!(submitted.len(), 3);
        assert_eq!(submitted[0].client_sequence_number, 0);
        assert_eq!(submitted[2].client_sequence_number, 2);
    }

    #[tokio::test]
    async fn take_receiver_is_a_one_shot() {
        let transport = MockTransport::new("alice", false);
        assert!(transport.take_receiver().is_some());
        assert!(transport.take_receiver().is_none());
    }

    #[tokio::test]
    async fn delivered_messages_arrive_on_the_taken_receiver() {
        let transport = MockTransport::new("alice", false);
        let mut rx = transport.take_receiver().unwrap();
        transport.deliver(SequencedMessage {
            sequence_number: 1,
            minimum_sequence_number: 0,
            client_id: "bob".to_string(),
            kind: MessageKind::Operation,
            client_sequence_number: 0,
            reference_sequence_number: 0,
            op: Operation::set("k", StoredValue::Plain(serde_json::json!("v"))),
        });
        let msg = rx.recv().await.unwrap();
        assert_eq!(msg.sequence_number, 1);
    }
}

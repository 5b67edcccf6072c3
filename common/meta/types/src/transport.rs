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

use tokio::sync::mpsc;

use crate::Message;
use crate::SequencedMessage;
use collabmap_exception::Result;

/// The outcome of connecting to the delta transport: whether the object
/// already existed server-side, and the client id the server assigned us.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectResult {
    pub existing: bool,
    pub client_id: String,
}

/// A callback the transport may invoke to ask the engine for its current
/// `sequence_number`, e.g. when it needs to stamp an outbound batch. The
/// engine supplies this at `connect` time rather than the transport polling
/// the engine directly, keeping the dependency direction one-way.
pub type ReferenceSequenceNumberProvider = Arc<dyn Fn() -> u64 + Send + Sync>;

/// The delta transport: ships this client's messages to the central
/// sequencer and delivers the sequencer's total order back.
///
/// Out of scope for this crate's core: implementations live elsewhere and
/// are consumed only through this trait. A `testing` mock ships in
/// `collabmap-testing` for this crate's own test suite.
#[async_trait::async_trait]
pub trait DeltaTransport: Send + Sync {
    /// Connect (or reconnect) to the sequencer for object `id` of kind
    /// `kind`. `reference_sequence_number` is handed to the transport so it
    /// can answer `get_reference_sequence_number()` on demand without a
    /// callback into engine internals on every call.
    async fn connect(
        &self,
        id: &str,
        kind: &str,
        reference_sequence_number: ReferenceSequenceNumberProvider,
    ) -> Result<ConnectResult>;

    /// Submit one outbound message. Callers (the engine) are responsible for
    /// calling this in `client_sequence_number` order; the trait does not
    /// reorder or batch.
    async fn submit(&self, message: Message) -> Result<()>;

    /// Take ownership of the inbound channel of sequenced messages. Returns
    /// `None` if already taken (at most one consumer per connection, matching
    /// the engine's single logical execution context).
    fn take_receiver(&self) -> Option<mpsc::UnboundedReceiver<SequencedMessage>>;
}

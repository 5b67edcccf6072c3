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

//! The Replication Engine: owns sequence numbers, dispatches inbound
//! messages, reconciles acks, and applies operations to Map State.
//!
//! `CollabMap` is both the public entry point of this crate and the
//! collaborative object type it itself supplies to a Nested Object
//! Registry, so a map can hold another map as a value.

use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Weak;

use collabmap_exception::Error;
use collabmap_exception::Result;
use collabmap_types::CollaborativeObject;
use collabmap_types::DeltaTransport;
use collabmap_types::MapEvent;
use collabmap_types::Message;
use collabmap_types::MessageKind;
use collabmap_types::ObjectRegistry;
use collabmap_types::ObjectStorage;
use collabmap_types::Operation;
use collabmap_types::SequencedMessage;
use collabmap_types::StoredValue;
use collabmap_types::UserValue;
use tokio::sync::broadcast;
use tokio::sync::watch;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::config::EngineConfig;
use crate::map_state::MapState;
use crate::nested_cache::NestedObjectCache;
use crate::op_log::OperationLog;
use crate::snapshot;
use crate::snapshot::SnapshotEnvelope;
use crate::value_codec;

const KIND: &str = "map";

/// Counter backing `CollabMap::new_anonymous`'s generated ids.
static NEXT_ANONYMOUS_ID: AtomicU64 = AtomicU64::new(0);

/// Everything mutated from the engine's single logical execution context.
/// Guarded by one `tokio::sync::Mutex` rather than per-field locks: holding
/// it for the full duration of a local operation's submit is what gives us
/// "outbound submission order equals local issue order" for free, instead of
/// relying on cooperative-scheduling coincidence.
struct Inner {
    map: MapState,
    op_log: OperationLog,
    cache: NestedObjectCache,
    sequence_number: u64,
    minimum_sequence_number: u64,
    client_sequence_number: u64,
    client_id: Option<String>,
    transport: Option<Arc<dyn DeltaTransport>>,
    storage: Option<Arc<dyn ObjectStorage>>,
    registry: Option<Arc<dyn ObjectRegistry>>,
    poisoned: Option<Error>,
    receiver_task: Option<JoinHandle<()>>,
}

pub struct CollabMap {
    id: String,
    config: EngineConfig,
    attached: AtomicBool,
    duplicate_ack_count: AtomicU64,
    events: broadcast::Sender<MapEvent>,
    loaded_tx: watch::Sender<bool>,
    loaded_rx: watch::Receiver<bool>,
    self_weak: Weak<CollabMap>,
    inner: Mutex<Inner>,
}

impl CollabMap {
    /// Create a map in local mode: no transport connection, Map State empty.
    pub fn new(id: impl Into<String>, config: EngineConfig) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        let (loaded_tx, loaded_rx) = watch::channel(true);
        Arc::new_cyclic(|weak| CollabMap {
            id: id.into(),
            config,
            attached: AtomicBool::new(false),
            duplicate_ack_count: AtomicU64::new(0),
            events,
            loaded_tx,
            loaded_rx,
            self_weak: weak.clone(),
            inner: Mutex::new(Inner {
                map: MapState::new(),
                op_log: OperationLog::new(),
                cache: NestedObjectCache::new(),
                sequence_number: 0,
                minimum_sequence_number: 0,
                client_sequence_number: 0,
                client_id: None,
                transport: None,
                storage: None,
                registry: None,
                poisoned: None,
                receiver_task: None,
            }),
        })
    }

    pub fn with_default_config(id: impl Into<String>) -> Arc<Self> {
        Self::new(id, EngineConfig::default())
    }

    /// Create a map without an explicit id, generating one from
    /// `config.id_namespace` plus a process-wide counter. Handy for tests and
    /// small demos that don't care what the id actually is.
    pub fn new_anonymous(config: EngineConfig) -> Arc<Self> {
        let n = NEXT_ANONYMOUS_ID.fetch_add(1, Ordering::Relaxed);
        let id = format!("{}-{}", config.id_namespace, n);
        Self::new(id, config)
    }

    /// Subscribe to this map's change-event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<MapEvent> {
        self.events.subscribe()
    }

    /// Count of inbound own-client messages that did not match the
    /// Operation Log head. Exposed so a caller can detect a log/head desync
    /// the warning alone would not surface.
    pub fn duplicate_ack_count(&self) -> u64 {
        self.duplicate_ack_count.load(Ordering::Relaxed)
    }

    pub async fn sequence_number(&self) -> u64 {
        self.inner.lock().await.sequence_number
    }

    pub async fn operation_log_len(&self) -> usize {
        self.inner.lock().await.op_log.len()
    }

    fn check_poisoned(inner: &Inner) -> Result<()> {
        if let Some(e) = &inner.poisoned {
            return Err(Error::Poisoned(e.to_string()));
        }
        Ok(())
    }

    async fn await_loaded(&self) {
        let mut rx = self.loaded_rx.clone();
        while !*rx.borrow() {
            if rx.changed().await.is_err() {
                break;
            }
        }
    }

    pub async fn get(&self, key: &str) -> Result<Option<UserValue>> {
        self.await_loaded().await;
        let mut inner = self.inner.lock().await;
        Self::check_poisoned(&inner)?;
        let stored = match inner.map.get(key) {
            Some(v) => v.clone(),
            None => return Ok(None),
        };
        let value = match &stored {
            StoredValue::Plain(v) => UserValue::Plain(v.clone()),
            StoredValue::Reference { .. } => {
                let (transport, storage, registry) = Self::services_or_not_attached(&inner)?;
                value_codec::decode(&stored, &mut inner.cache, transport, storage, registry).await?
            }
        };
        Ok(Some(value))
    }

    pub async fn has(&self, key: &str) -> Result<bool> {
        self.await_loaded().await;
        let inner = self.inner.lock().await;
        Self::check_poisoned(&inner)?;
        Ok(inner.map.has(key))
    }

    pub async fn keys(&self) -> Result<Vec<String>> {
        self.await_loaded().await;
        let inner = self.inner.lock().await;
        Self::check_poisoned(&inner)?;
        Ok(inner.map.keys())
    }

    /// A `Reference` not already cached needs `transport`, `storage`, and
    /// `registry` to materialize; a map that has never attached has none of
    /// them.
    fn services_or_not_attached(
        inner: &Inner,
    ) -> Result<(Arc<dyn DeltaTransport>, Arc<dyn ObjectStorage>, Arc<dyn ObjectRegistry>)> {
        match (&inner.transport, &inner.storage, &inner.registry) {
            (Some(t), Some(s), Some(r)) => Ok((t.clone(), s.clone(), r.clone())),
            _ => Err(Error::NotAttached),
        }
    }

    pub async fn set(&self, key: impl Into<String>, value: impl Into<UserValue>) -> Result<()> {
        self.await_loaded().await;
        let key = key.into();
        let value = value.into();

        let mut inner = self.inner.lock().await;
        Self::check_poisoned(&inner)?;

        // Allocate cseq, append to the Operation Log, and apply to Map State
        // immediately and unconditionally, before anything below can
        // suspend: the lock is held continuously from here through the
        // eventual submit, so a concurrently issued second local operation
        // can never acquire a smaller cseq or reach the wire first.
        let stored = value_codec::encode(value, &mut inner.cache);
        let op = Operation::set(key, stored.clone());
        let (message, event) = Self::begin_local_operation(&mut inner, op);

        // Attach-before-submit: if this Set carries a reference to a still
        // local nested object and this map is itself attached, drive that
        // object's own attach() to completion before the outer message is
        // submitted, so a remote replica can never observe a dangling
        // reference. Still holding the lock acquired above, so a later
        // local operation cannot overtake this one's submit while this
        // await is pending.
        //
        // A nested `CollabMap` has no container runtime of its own to wire
        // it to our transport/storage/registry (out of scope for this
        // crate), so we do it ourselves via the `as_any` downcast: a
        // foreign collaborative object kind is expected to already carry
        // whatever services it needs and its zero-arg `attach()` suffices.
        // If this map is not itself attached yet, the reference is simply
        // left queued; `attach()`'s own Operation Log replay drives the
        // nested object then.
        if let StoredValue::Reference { id, .. } = &stored {
            if self.attached.load(Ordering::SeqCst) {
                if let Some(handle) = inner.cache.get(id) {
                    if handle.is_local() {
                        let (transport, storage, registry) = Self::services_or_not_attached(&inner)?;
                        Self::attach_reference_if_local(handle, transport, storage, registry)
                            .await?;
                    }
                }
            }
        }

        Self::submit_local_operation(&inner, message).await?;
        let _ = self.events.send(event);
        Ok(())
    }

    pub async fn delete(&self, key: impl Into<String>) -> Result<()> {
        self.await_loaded().await;
        let mut inner = self.inner.lock().await;
        Self::check_poisoned(&inner)?;
        let op = Operation::delete(key.into());
        self.process_local_operation(&mut inner, op).await
    }

    pub async fn clear(&self) -> Result<()> {
        self.await_loaded().await;
        let mut inner = self.inner.lock().await;
        Self::check_poisoned(&inner)?;
        self.process_local_operation(&mut inner, Operation::Clear).await
    }

    /// Allocate cseq, append to the Operation Log, and apply to Map State for
    /// `delete`/`clear`, whose values never carry a nested reference to wait
    /// on. Called with `inner` already locked; the lock is held across the
    /// (possibly suspending) transport submit so a second local operation
    /// issued concurrently cannot overtake this one on the wire.
    async fn process_local_operation(&self, inner: &mut Inner, op: Operation) -> Result<()> {
        let (message, event) = Self::begin_local_operation(inner, op);
        Self::submit_local_operation(inner, message).await?;
        let _ = self.events.send(event);
        Ok(())
    }

    /// Allocate `cseq`, append the message to the Operation Log, and apply
    /// the operation to Map State. This half of a local operation never
    /// suspends and must complete in full before anything that might yield
    /// the lock (a nested attach, a transport submit) begins.
    fn begin_local_operation(inner: &mut Inner, op: Operation) -> (Message, MapEvent) {
        let cseq = inner.client_sequence_number;
        inner.client_sequence_number += 1;

        let message = Message {
            client_sequence_number: cseq,
            reference_sequence_number: inner.sequence_number,
            op: op.clone(),
        };
        inner.op_log.push(message.clone());

        let event = Self::apply_to_map(inner, &op);
        (message, event)
    }

    /// Forward `message` to the transport, if attached. A no-op if this map
    /// has never attached: the message stays queued in the Operation Log
    /// until `attach` replays it.
    async fn submit_local_operation(inner: &Inner, message: Message) -> Result<()> {
        if let Some(transport) = inner.transport.clone() {
            transport.submit(message).await?;
        }
        Ok(())
    }

    /// Drive `handle` from local to attached if it still is one, wiring in
    /// `transport`/`storage`/`registry` ourselves for a nested `CollabMap`
    /// (downcast via `as_any`, see `set`'s doc comment) and trusting any
    /// other collaborative object kind to already carry what it needs.
    /// Shared by the immediate attach-before-submit path in `set` and the
    /// Operation Log replay in `attach`: a reference queued while still
    /// local must attach its target before the queued `Set` is ever
    /// submitted.
    async fn attach_reference_if_local(
        handle: Arc<dyn CollaborativeObject>,
        transport: Arc<dyn DeltaTransport>,
        storage: Arc<dyn ObjectStorage>,
        registry: Arc<dyn ObjectRegistry>,
    ) -> Result<()> {
        if !handle.is_local() {
            return Ok(());
        }
        if let Some(child) = handle.as_any().downcast_ref::<CollabMap>() {
            child.attach(transport, storage, registry).await
        } else {
            handle.attach().await
        }
    }

    fn apply_to_map(inner: &mut Inner, op: &Operation) -> MapEvent {
        match op.clone() {
            Operation::Set { key, value } => inner.map.set_core(key, value),
            Operation::Delete { key } => inner.map.delete_core(key),
            Operation::Clear => inner.map.clear_core(),
        }
    }

    /// Applies an inbound sequenced message: advances `sequence_number`,
    /// reconciles an own-client ack against the Operation Log head, or
    /// applies a remote peer's operation to Map State.
    fn process_remote_message(&self, inner: &mut Inner, incoming: SequencedMessage) -> Result<()> {
        let expected = inner.sequence_number + 1;
        if incoming.sequence_number != expected {
            let err = Error::SequenceGap { expected, got: incoming.sequence_number };
            inner.poisoned = Some(Error::SequenceGap { expected, got: incoming.sequence_number });
            return Err(err);
        }

        inner.sequence_number = incoming.sequence_number;
        inner.minimum_sequence_number = incoming.minimum_sequence_number;

        if incoming.kind != MessageKind::Operation {
            return Ok(());
        }

        let is_own = inner
            .client_id
            .as_deref()
            .map(|id| incoming.is_own(id))
            .unwrap_or(false);

        if is_own {
            match inner.op_log.peek_head() {
                Some(head) if head.client_sequence_number == incoming.client_sequence_number => {
                    inner.op_log.pop_head();
                }
                _ => {
                    self.duplicate_ack_count.fetch_add(1, Ordering::Relaxed);
                    if self.config.warn_on_duplicate_ack {
                        collabmap_tracing::tracing::warn!(
                            map_id = %self.id,
                            cseq = incoming.client_sequence_number,
                            "duplicate ack did not match operation log head"
                        );
                    }
                }
            }
            return Ok(());
        }

        let event = Self::apply_to_map(inner, &incoming.op);
        let _ = self.events.send(event);
        Ok(())
    }

    /// Bundles the transport, storage, and registry collaborators into one
    /// call: nothing in this implementation ever configures storage except
    /// at attach time, so "attached" and "has storage" stay synonymous and
    /// `NotAttached` keeps exactly one meaning. Recorded as an Open Question
    /// resolution in DESIGN.md.
    pub async fn attach(
        &self,
        transport: Arc<dyn DeltaTransport>,
        storage: Arc<dyn ObjectStorage>,
        registry: Arc<dyn ObjectRegistry>,
    ) -> Result<()> {
        {
            let inner = self.inner.lock().await;
            Self::check_poisoned(&inner)?;
            if inner.transport.is_some() {
                return Err(Error::AlreadyAttached);
            }
        }

        let _ = self.loaded_tx.send(false);

        let provider = self.reference_sequence_number_provider();
        let connect_result = transport.connect(&self.id, KIND, provider).await?;

        let mut inner = self.inner.lock().await;
        Self::check_poisoned(&inner)?;

        if connect_result.existing {
            let (map, seq) = snapshot::load_snapshot(&self.id, storage.as_ref()).await?;
            inner.map = map;
            inner.sequence_number = seq;
        }

        inner.client_id = Some(connect_result.client_id);
        inner.storage = Some(storage);
        inner.registry = Some(registry);
        inner.transport = Some(transport.clone());
        self.attached.store(true, Ordering::SeqCst);

        if let Some(mut rx) = transport.take_receiver() {
            if let Some(this) = self.self_weak.upgrade() {
                let task = tokio::spawn(async move {
                    while let Some(msg) = rx.recv().await {
                        let mut inner = this.inner.lock().await;
                        if Self::check_poisoned(&inner).is_err() {
                            break;
                        }
                        if let Err(e) = this.process_remote_message(&mut inner, msg) {
                            if e.is_fatal() {
                                break;
                            }
                        }
                    }
                });
                inner.receiver_task = Some(task);
            }
        }

        // Replay whatever is still outstanding in the Operation Log, in
        // order; entries leave the log only once their own ack arrives.
        // A queued `Set` referencing a nested object that is still local
        // (the reference was set before this map ever attached) must drive
        // that object's own attach to completion first, same as the
        // immediate path in `set`.
        let replay_transport = inner.transport.clone().ok_or(Error::NotAttached)?;
        let replay_storage = inner.storage.clone().ok_or(Error::NotAttached)?;
        let replay_registry = inner.registry.clone().ok_or(Error::NotAttached)?;
        let pending: Vec<Message> = inner.op_log.iter().cloned().collect();
        for message in pending {
            if let Operation::Set { value: StoredValue::Reference { id, .. }, .. } = &message.op {
                if let Some(handle) = inner.cache.get(id) {
                    Self::attach_reference_if_local(
                        handle,
                        replay_transport.clone(),
                        replay_storage.clone(),
                        replay_registry.clone(),
                    )
                    .await?;
                }
            }
            replay_transport.submit(message).await?;
        }

        drop(inner);
        let _ = self.loaded_tx.send(true);
        Ok(())
    }

    fn reference_sequence_number_provider(&self) -> collabmap_types::ReferenceSequenceNumberProvider {
        let weak = self.self_weak.clone();
        Arc::new(move || {
            weak.upgrade()
                .and_then(|this| this.inner.try_lock().ok().map(|g| g.sequence_number))
                .unwrap_or(0)
        })
    }

    pub fn is_local(&self) -> bool {
        !self.attached.load(Ordering::SeqCst)
    }

    pub fn id_str(&self) -> &str {
        &self.id
    }

    pub fn kind_str(&self) -> &str {
        KIND
    }

    pub async fn snapshot(&self) -> Result<SnapshotEnvelope> {
        self.await_loaded().await;
        let inner = self.inner.lock().await;
        Self::check_poisoned(&inner)?;
        let storage = inner.storage.clone().ok_or(Error::NotAttached)?;
        snapshot::write_snapshot(&self.id, inner.sequence_number, &inner.map, storage.as_ref())
            .await?;
        Ok(SnapshotEnvelope {
            sequence_number: inner.sequence_number,
            snapshot: inner.map.deep_copy(),
        })
    }
}

impl Drop for CollabMap {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.inner.try_lock() {
            if let Some(task) = inner.receiver_task.take() {
                task.abort();
            }
        }
    }
}

#[async_trait::async_trait]
impl CollaborativeObject for CollabMap {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> &str {
        KIND
    }

    fn is_local(&self) -> bool {
        CollabMap::is_local(self)
    }

    async fn attach(&self) -> Result<()> {
        // Reached only if some caller holds this `CollabMap` as an opaque
        // `Arc<dyn CollaborativeObject>` rather than a concrete `CollabMap`
        // (so the attach-before-submit downcast in `set` did not fire) and
        // it was, unusually, already given services some other way.
        let (transport, storage, registry) = {
            let inner = self.inner.lock().await;
            match (&inner.transport, &inner.storage, &inner.registry) {
                (Some(t), Some(s), Some(r)) => (t.clone(), s.clone(), r.clone()),
                _ => return Err(Error::NotAttached),
            }
        };
        self.attach(transport, storage, registry).await
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

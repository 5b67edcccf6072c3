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

use std::any::Any;

use collabmap_exception::Result;

/// A replicated data type bound to an identity, a type tag, and (once
/// attached) a transport.
///
/// This is the trait boundary the design notes call for in place of a
/// runtime capability probe: any value placed in a map as `UserValue::Object`
/// must implement it, so there is never a need to inspect a value's shape to
/// decide whether it is "collaborative".
#[async_trait::async_trait]
pub trait CollaborativeObject: Send + Sync {
    /// Stable identity, used as the `id` half of a `StoredValue::Reference`.
    fn id(&self) -> &str;

    /// Type tag used as the registry lookup key, the `kind` half of a
    /// `StoredValue::Reference`.
    fn kind(&self) -> &str;

    /// True iff this object has never been attached to a transport.
    fn is_local(&self) -> bool;

    /// Drive this object from local to attached, flushing any buffered
    /// operations. A no-op (`Ok(())`) if already attached.
    async fn attach(&self) -> Result<()>;

    /// Downcast hook, the same pattern the query engine's `Table` trait uses
    /// to recover a concrete type from a `dyn Trait` handle. The only
    /// consumer in this crate is the attach-before-submit path: a
    /// locally-created `CollabMap` nested inside another one is wired to its
    /// parent's own transport/storage/registry this way, since wiring a
    /// child's services from scratch is the outer container runtime's job
    /// (out of scope for this crate) and a map-in-map has no such runtime to
    /// call on.
    fn as_any(&self) -> &dyn Any;
}

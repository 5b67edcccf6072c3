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

//! Error types shared by every `collabmap-*` crate.
//!
//! This mirrors the role `common-exception` plays in the rest of the
//! workspace: one place that defines the error kinds a caller can match on,
//! plus an escape hatch (`Error::External`) for failures bubbled up from the
//! transport, storage, and registry collaborators, which are free to fail in
//! whatever way their own crates see fit.

use std::fmt;

/// Errors raised by the replication engine and its supporting components.
///
/// `SequenceGap` and `UnknownOperation` are invariant violations: once one is
/// returned, the engine that produced it must be treated as poisoned (see
/// `Error::Poisoned`). The remaining variants are ordinary caller errors and
/// do not affect the engine's ability to keep serving other calls.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("sequence gap: expected sequence_number {expected}, got {got}")]
    SequenceGap { expected: u64, got: u64 },

    #[error("unknown operation type: {0}")]
    UnknownOperation(String),

    #[error("no registry factory for kind {0}")]
    UnknownKind(String),

    #[error("map is already attached")]
    AlreadyAttached,

    #[error("map is not attached to storage")]
    NotAttached,

    #[error("engine is poisoned by a prior invariant violation: {0}")]
    Poisoned(String),

    #[error("transport error: {0}")]
    Transport(#[source] anyhow::Error),

    #[error("storage error: {0}")]
    Storage(#[source] anyhow::Error),

    #[error("snapshot decode error: {0}")]
    Snapshot(#[source] serde_json::Error),
}

impl Error {
    /// True for the two invariant violations that must halt the engine.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::SequenceGap { .. } | Error::UnknownOperation(_))
    }
}

/// Crate-wide result alias, the way `common_exception::Result` is used
/// throughout the grounding workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for attaching a lazily-built context message to a foreign
/// error and routing it into `Error::Transport` / `Error::Storage`.
///
/// Modeled on `common_exception::ToErrorCode::map_err_to_code`: a closure is
/// only invoked on the error path, so the context string is never formatted
/// on the happy path.
pub trait ToCollabError<T> {
    fn map_err_to_transport(self, context: impl FnOnce() -> String) -> Result<T>;
    fn map_err_to_storage(self, context: impl FnOnce() -> String) -> Result<T>;
}

impl<T, E> ToCollabError<T> for std::result::Result<T, E>
where E: fmt::Display + Send + Sync + 'static
{
    fn map_err_to_transport(self, context: impl FnOnce() -> String) -> Result<T> {
        self.map_err(|e| Error::Transport(anyhow::anyhow!("{}: {}", context(), e)))
    }

    fn map_err_to_storage(self, context: impl FnOnce() -> String) -> Result<T> {
        self.map_err(|e| Error::Storage(anyhow::anyhow!("{}: {}", context(), e)))
    }
}

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

//! Change events emitted by Map State, as a typed sum rather than an ad hoc
//! pub/sub string-keyed event name, per the design note that a strongly
//! typed implementation should prefer `Event = ValueChanged(key) | Clear`.

/// An event fired after Map State has been mutated, before control returns to
/// the caller of the triggering operation (local or remote).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MapEvent {
    /// Fired once for any `Set` or `Delete`, local or remote.
    ValueChanged { key: String },
    /// Fired once for any `Clear`.
    Clear,
}

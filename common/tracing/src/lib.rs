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

//! Thin wrapper over `tracing` + `tracing-subscriber`, the way
//! `common-tracing` is wrapped for the rest of the workspace. Unlike that
//! crate this one does not ship an OpenTelemetry/Jaeger exporter: this
//! library has no long-running server process of its own to export spans
//! from, only state-transition methods called from a host process that is
//! free to install its own subscriber.

use std::sync::Once;

pub use tracing;

static INIT: Once = Once::new();

/// Installs a global `fmt` subscriber reading its filter from `RUST_LOG`
/// (defaulting to `info`), idempotently. Intended for test setup and small
/// binaries embedding this crate; a full service should configure its own
/// subscriber instead of calling this.
pub fn init_default_subscriber() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
            .ok();
    });
}

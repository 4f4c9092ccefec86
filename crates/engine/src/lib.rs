// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sink-engine: Fact gathering, platform selection, and step execution

mod executor;
mod facts;
mod platform;
mod run;

pub use executor::{StepExecutor, StepResult, DEFAULT_RETRY_TIMEOUT, POLL_INTERVAL};
pub use facts::{export, FactError, FactGatherer};
pub use platform::{
    detect_distro_id, parse_os_release, select_distribution, select_platform, SelectError,
    OS_RELEASE_PATH,
};
pub use run::{run_document, RunError, RunOptions, RunReport};

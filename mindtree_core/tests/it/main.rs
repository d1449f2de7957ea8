// Copyright 2026 the Mindtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integration tests for `mindtree_core`.
//!
//! Organized as a single test binary:
//! - scenarios: clone, notification, and side-balancing behavior end to end
//! - invariants: property tests over random edit sequences

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("mindtree_core=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod helpers;
mod invariants;
mod scenarios;

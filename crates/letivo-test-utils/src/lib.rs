// SPDX-FileCopyrightText: 2026 Letivo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared test utilities.
//!
//! Lives in its own crate so both unit tests and the binary's end-to-end
//! tests can script provider behavior without touching the network.

pub mod mock_provider;

pub use mock_provider::{MockOutcome, MockProvider};

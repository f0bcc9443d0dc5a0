// SPDX-FileCopyrightText: 2026 Letivo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Module classification and complexity estimation.
//!
//! Both stages run before provider dispatch: the classifier picks the
//! subject module (with caching and in-flight de-duplication), and the
//! estimator picks the complexity tier that selects the routing chain.

pub mod classifier;
pub mod complexity;
pub mod patterns;

pub use classifier::ModuleClassifier;
pub use complexity::ComplexityEstimator;
pub use patterns::FALLBACK_MODULE;

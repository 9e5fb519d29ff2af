//! Common test utilities for kci-samples integration tests

#[allow(dead_code)]
pub mod fixtures;
#[allow(dead_code)]
pub mod kernelci;

#[allow(unused_imports)]
pub use fixtures::*;
pub use kernelci::*;

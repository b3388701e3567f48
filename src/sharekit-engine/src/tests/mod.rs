//! Comprehensive tests for sharekit-engine

#[cfg(test)]
pub mod pipeline_tests;

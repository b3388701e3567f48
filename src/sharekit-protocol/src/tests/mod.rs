//! Comprehensive tests for sharekit-protocol

#[cfg(test)]
pub mod target_tests;

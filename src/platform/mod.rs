//! Platform-specific implementations

// The procfs parsers only touch plain files, so they build on every target
// and can be exercised against fixture trees.
pub mod linux;

// Common utilities
pub mod common;

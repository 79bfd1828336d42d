//! Core monitoring types

pub mod cpu;
pub mod memory;
pub mod process;

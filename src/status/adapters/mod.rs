//! Adapter implementations for the status registry port.

pub mod memory;
pub mod postgres;

//! Adapter implementations for workspace ports.

pub mod cipher;
pub mod hasher;
pub mod memory;
pub mod postgres;
pub mod queue;

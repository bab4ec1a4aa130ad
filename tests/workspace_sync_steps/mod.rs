//! Step definitions for workspace sync behaviour scenarios.

mod given;
mod then;
mod when;
pub mod world;

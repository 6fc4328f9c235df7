//! Step definitions for edit lock scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;

//! Step definitions for missed deadline scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;

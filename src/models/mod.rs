//! Data models for the RoadTop mini-app.
//!
//! Field names are snake_case on the wire, matching the mini-app script.

mod level;
mod place;
mod user;

pub use level::*;
pub use place::*;
pub use user::*;

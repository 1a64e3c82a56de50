#![warn(clippy::pedantic)]

pub mod engine;
pub mod miniz;
pub mod status;

pub use engine::InflateEngine;
pub use miniz::MinizEngine;
pub use status::{EngineStatus, Step};

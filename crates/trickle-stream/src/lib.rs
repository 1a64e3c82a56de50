#![warn(clippy::pedantic)]

pub mod config;
pub mod context;
pub mod error;
pub mod reader;
pub mod stats;
pub mod writer;

mod driver;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::{DEFAULT_CHUNK_SIZE, DEFAULT_WINDOW_SIZE, StreamSizes, ZlibStream};
pub use context::{InputRequest, Mode, OutputDelivery, StreamContext};
pub use error::{ProtocolError, StreamError};
pub use reader::Feed;
pub use stats::StreamStats;
pub use trickle_engine::{EngineStatus, InflateEngine, MinizEngine, Step};

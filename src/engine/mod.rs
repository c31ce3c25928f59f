//! Engine composition: the facade object and its event feed.

pub mod engine;
pub mod events;

pub use engine::GameEngine;
pub use events::{EngineEvent, EventLog, EventRecord};

//! Core type definitions for the automation executor
//!
//! This module contains all fundamental types used throughout the crate:
//! address wrappers, controller input primitives, software classification
//! enums, record views, and error types.

mod address;
mod button;
mod error;
mod game;
mod record;

// Re-export all public types
pub use address::Address;
pub use button::{Button, Stick};
pub use error::{ChannelError, ChannelResult, ExecutorError, ExecutorResult};
pub use game::{ConsoleLanguage, DetectionMode, GameVariant, ScreenState, TextSpeed};
pub use record::{
    CreatureRecord, TrainerProfile, RECORD_CORE_SIZE, RECORD_SIZE, TRAINER_BLOCK_SIZE,
};

// Common type aliases
pub type Offset = u64;
pub type Size = usize;

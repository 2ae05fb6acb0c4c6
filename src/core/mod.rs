//! Core module containing fundamental types for the automation executor
//!
//! This module provides the foundational building blocks used throughout
//! the crate: address handling, controller input, record views, software
//! classification, and error types.

pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    Address,
    Button,
    ChannelError,
    CreatureRecord,
    ExecutorError,
    ExecutorResult,
    ScreenState,
    Stick,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");

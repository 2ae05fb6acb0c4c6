//! Automation executor for driving a SW/SH console over a remote debug channel
//!
//! Turns the primitive "read bytes / write bytes / press button" channel into
//! reliable, composable operations: screen-state detection, box storage
//! access, pointer-chain resolution, multi-step UI macros with rescue paths,
//! soft-ban recovery, and the spin-trade positional corrector.

pub mod boxes;
pub mod channel;
pub mod config;
pub mod core;
pub mod detect;
pub mod executor;
pub mod macros;
pub mod offsets;
pub mod pointer;
pub mod poll;
pub mod softban;
pub mod spin;

// Re-export main types from the core module
pub use crate::core::types::{
    Address, Button, ChannelError, ChannelResult, ConsoleLanguage, CreatureRecord, DetectionMode,
    ExecutorError, ExecutorResult, GameVariant, ScreenState, Stick, TextSpeed, TrainerProfile,
};

// Re-export the component entry points
pub use boxes::BoxSlotCodec;
pub use channel::{BotbaseChannel, DeviceChannel, MockChannel};
pub use detect::{DetectionSpec, ScreenStateDetector};
pub use executor::{DeviceExecutor, ExecutorSession};
pub use macros::UiMacroSequencer;
pub use pointer::PointerChain;
pub use softban::SoftBanGuard;
pub use spin::{SpinCache, SpinCoordinates, SpinTradeCorrector};

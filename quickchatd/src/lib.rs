//! Quickchat Daemon Library
//!
//! Core functionality for the controller quickchat daemon:
//! - Controller discovery and D-pad event reading
//! - Two-press gesture detection
//! - Shuffle-bag message variation and template rendering
//! - Recent-message cooldown tracking
//! - Chat delivery through a uinput virtual keyboard

pub mod cache;
pub mod chat;
pub mod config;
pub mod device;
pub mod gesture;
pub mod macro_engine;
pub mod picker;
pub mod template;
pub mod variations;

// Re-export common types
pub use quickchat_common::{Direction, Gesture, HistoryState, InputAction};

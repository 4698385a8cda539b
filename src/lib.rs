//! paco-8: a small fantasy-console core.
//!
//! The crate models a constrained-memory retro machine: a flat 32 KB RAM with
//! a packed two-pixels-per-byte screen window, a 16-colour palette, and the
//! drawing primitives that operate on it. The host (window, input, render
//! surface) lives in the binary and only consumes [`Console::flip`].

use thiserror::Error;

pub mod console;
pub mod memory;
pub mod palette;

pub use console::Console;
pub use memory::{Memory, RAM_SIZE, ROM_SIZE, SCREEN_BASE, SCREEN_SIZE};
pub use palette::{color_rgb, Rgb, PALETTE};

pub type Result<T> = std::result::Result<T, ConsoleError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConsoleError {
    #[error("{0}")]
    OutOfRange(String),
    #[error("color index {0} out of bounds")]
    InvalidColorIndex(u8),
}

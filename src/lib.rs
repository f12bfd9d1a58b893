/*
 * SPDX-FileCopyrightText: 2025 TerraModulus Team and Contributors
 * SPDX-License-Identifier: LGPL-3.0-only
 */

//! Ferricia Lifecycle
//!
//! Drives an [`App`] through the SDL 3 main callbacks. SDL owns the main loop and calls into
//! the four `extern "C"` entry points in [`trampoline`]; those forward to the `App` and fold
//! any error or panic into [`AppResult::Failure`] before returning to C.
//!
//! Most applications only need [`run`]:
//!
//! ```no_run
//! use ferricia_lifecycle::{run, App, AppResult, FerriciaResult};
//!
//! struct Hello;
//!
//! impl App for Hello {
//! 	type State = ();
//!
//! 	fn iterate(_state: Option<&()>) -> FerriciaResult<AppResult> {
//! 		Ok(AppResult::Success)
//! 	}
//! }
//!
//! fn main() -> std::process::ExitCode {
//! 	run::<Hello>()
//! }
//! ```

mod app;
mod config;
mod headless;
mod report;
mod runner;
pub mod trampoline;

pub use crate::app::{App, AppResult};
pub use crate::config::AppMetadata;
pub use crate::headless::{HeadlessRunner, Phase};
pub use crate::runner::{run, run_main, run_main_with_args, run_with_args, MainFn};
pub use sdl3::event::Event;

use derive_more::Display;
use sdl3::sys::error::SDL_GetError;
use std::backtrace::Backtrace;
use std::ffi::{CStr, NulError};

/// Error raised by application callbacks and by the runner itself.
///
/// A backtrace is captured on construction when enabled through `RUST_BACKTRACE` or
/// `RUST_LIB_BACKTRACE`; it is only used for diagnostics when the error is reported.
#[derive(Debug, Display)]
#[display("{message}")]
pub struct FerriciaError {
	message: String,
	backtrace: Backtrace,
}

impl FerriciaError {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
			backtrace: Backtrace::capture(),
		}
	}

	/// Takes the pending SDL error message of the calling thread.
	pub fn from_sdl() -> Self {
		let message = unsafe { SDL_GetError() };
		if message.is_null() {
			return Self::new("unknown SDL error");
		}
		Self::new(unsafe { CStr::from_ptr(message) }.to_string_lossy())
	}

	pub fn message(&self) -> &str {
		&self.message
	}

	/// Symbolic trace of where the error was created, if one was captured.
	pub fn trace(&self) -> Option<String> {
		report::render_trace(&self.backtrace)
	}
}

impl std::error::Error for FerriciaError {}

impl From<String> for FerriciaError {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}

impl From<&str> for FerriciaError {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}

impl From<sdl3::Error> for FerriciaError {
	fn from(value: sdl3::Error) -> Self {
		value.to_string().into()
	}
}

impl From<std::io::Error> for FerriciaError {
	fn from(value: std::io::Error) -> Self {
		value.to_string().into()
	}
}

impl From<NulError> for FerriciaError {
	fn from(value: NulError) -> Self {
		format!("string contains an interior NUL byte at {}", value.nul_position()).into()
	}
}

pub type FerriciaResult<T> = Result<T, FerriciaError>;

/*
 * SPDX-FileCopyrightText: 2025 TerraModulus Team and Contributors
 * SPDX-License-Identifier: LGPL-3.0-only
 */
use crate::config::AppMetadata;
use crate::report::log_failure;
use crate::FerriciaResult;
use sdl3::event::Event;
use sdl3::sys::init::{SDL_AppResult, SDL_APP_CONTINUE, SDL_APP_FAILURE, SDL_APP_SUCCESS};

/// Outcome of a single lifecycle phase, mirroring `SDL_AppResult`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppResult {
	/// Keep running.
	Continue,
	/// Stop and report success to the OS.
	Success,
	/// Stop and report failure to the OS.
	Failure,
}

impl AppResult {
	/// Whether the runtime stops after receiving this result.
	pub fn is_terminal(self) -> bool {
		self != AppResult::Continue
	}

	/// Process exit status SDL reports for this result.
	pub fn exit_code(self) -> i32 {
		match self {
			AppResult::Failure => 1,
			AppResult::Continue | AppResult::Success => 0,
		}
	}
}

impl From<AppResult> for SDL_AppResult {
	fn from(value: AppResult) -> Self {
		match value {
			AppResult::Continue => SDL_APP_CONTINUE,
			AppResult::Success => SDL_APP_SUCCESS,
			AppResult::Failure => SDL_APP_FAILURE,
		}
	}
}

/// Anything SDL hands back that is neither continue nor success is treated as a failure.
impl From<SDL_AppResult> for AppResult {
	fn from(value: SDL_AppResult) -> Self {
		if value == SDL_APP_CONTINUE {
			AppResult::Continue
		} else if value == SDL_APP_SUCCESS {
			AppResult::Success
		} else {
			AppResult::Failure
		}
	}
}

/// The four lifecycle callbacks of an application run by SDL.
///
/// Every callback is optional; an omitted one behaves as "nothing to do, keep going".
/// Implementors are usually unit structs, the data lives in [`App::State`].
///
/// `init`, `iterate` and `quit` run on the main thread. `event` may run on whichever thread
/// pushed the event, possibly while `iterate` is running, which is why the state is only ever
/// shared and must be `Sync`. Mutation goes through atomics or locks inside the state.
pub trait App: 'static {
	/// Data created by `init` and threaded through the remaining phases.
	type State: Sync + 'static;

	/// Metadata applied before SDL is entered.
	fn metadata() -> Option<AppMetadata> {
		None
	}

	/// Called once, first. Leaving `state` empty is allowed; the later phases then see `None`.
	///
	/// Whatever is stored in `state` is kept even if this fails, so that `quit` can release it.
	fn init(_state: &mut Option<Self::State>, _args: &[String]) -> FerriciaResult<AppResult> {
		Ok(AppResult::Continue)
	}

	/// Called repeatedly on the main thread, at a cadence chosen by SDL.
	fn iterate(_state: Option<&Self::State>) -> FerriciaResult<AppResult> {
		Ok(AppResult::Continue)
	}

	/// Called once per event.
	fn event(_state: Option<&Self::State>, _event: Event) -> FerriciaResult<AppResult> {
		Ok(AppResult::Continue)
	}

	/// Called exactly once, last, with the result that ended the run.
	/// The state is handed back for the application to dispose of.
	fn quit(_state: Option<Box<Self::State>>, _result: AppResult) {}

	/// Receives failures intercepted at the C boundary.
	fn report_failure(description: &str, trace: Option<&str>) {
		log_failure(description, trace);
	}
}

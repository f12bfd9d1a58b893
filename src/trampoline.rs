/*
 * SPDX-FileCopyrightText: 2025 TerraModulus Team and Contributors
 * SPDX-License-Identifier: LGPL-3.0-only
 */

//! C entry points handed to `SDL_EnterAppMainCallbacks`.
//!
//! Each trampoline is monomorphized per [`App`], so SDL receives plain function pointers while
//! the application keeps ordinary `Result` returning callbacks. Errors and panics never cross
//! into C: they are reported through [`App::report_failure`] and become
//! [`AppResult::Failure`], the only failure SDL can represent.
//!
//! The app state slot holds a `Box<App::State>` as a raw pointer from `app_init` until
//! `app_quit` takes it back.

use crate::app::{App, AppResult};
use crate::report::{current_trace, panic_message};
use crate::FerriciaResult;
use sdl3::event::Event;
use sdl3::sys::events::SDL_Event;
use sdl3::sys::init::SDL_AppResult;
use std::ffi::{c_char, c_int, c_void, CStr};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr::null_mut;

/// `SDL_AppInit` for `A`.
///
/// # Safety
///
/// `appstate` must be null or valid for writes. `argv` must be null or point to at least `argc`
/// entries, each null or a NUL-terminated string.
pub unsafe extern "C" fn app_init<A: App>(
	appstate: *mut *mut c_void,
	argc: c_int,
	argv: *mut *mut c_char,
) -> SDL_AppResult {
	let args = unsafe { decode_args(argc, argv) };
	let mut state = None;
	let result = guarded::<A>("init", || A::init(&mut state, &args));
	if !appstate.is_null() {
		unsafe { *appstate = state_into_raw(state) };
	}
	log::debug!("init returned {result:?}");
	result.into()
}

/// `SDL_AppIterate` for `A`.
///
/// # Safety
///
/// `appstate` must be the value stored by [`app_init::<A>`], not yet passed to [`app_quit`].
pub unsafe extern "C" fn app_iterate<A: App>(appstate: *mut c_void) -> SDL_AppResult {
	let state = unsafe { state_from_raw::<A::State>(appstate) };
	guarded::<A>("iterate", || A::iterate(state)).into()
}

/// `SDL_AppEvent` for `A`.
///
/// An event the decoder cannot represent is logged and skipped; the app never sees it.
///
/// # Safety
///
/// Same as [`app_iterate`]; `event` must be null or point to an initialized `SDL_Event`.
pub unsafe extern "C" fn app_event<A: App>(appstate: *mut c_void, event: *mut SDL_Event) -> SDL_AppResult {
	if event.is_null() {
		return AppResult::Continue.into();
	}
	let raw = unsafe { *event };
	let Ok(decoded) = catch_unwind(AssertUnwindSafe(|| Event::from_ll(raw))) else {
		log::warn!("Dropping undecodable SDL event of type {:#x}", unsafe { raw.r#type });
		return AppResult::Continue.into();
	};
	let state = unsafe { state_from_raw::<A::State>(appstate) };
	guarded::<A>("event", || A::event(state, decoded)).into()
}

/// `SDL_AppQuit` for `A`.
///
/// A panic inside [`App::quit`] is discarded; there is nobody left to report it to.
///
/// # Safety
///
/// Same as [`app_iterate`]; `appstate` must not be used again afterwards.
pub unsafe extern "C" fn app_quit<A: App>(appstate: *mut c_void, result: SDL_AppResult) {
	let state = unsafe { state_take_raw::<A::State>(appstate) };
	let result = AppResult::from(result);
	log::debug!("quit with {result:?}");
	let _ = catch_unwind(AssertUnwindSafe(|| A::quit(state, result)));
}

/// Runs one callback, folding an error or a panic into [`AppResult::Failure`].
fn guarded<A: App>(phase: &str, callback: impl FnOnce() -> FerriciaResult<AppResult>) -> AppResult {
	let (description, trace) = match catch_unwind(AssertUnwindSafe(callback)) {
		Ok(Ok(result)) => return result,
		Ok(Err(err)) => (format!("{phase} failed: {err}"), err.trace()),
		Err(payload) => (format!("{phase} panicked: {}", panic_message(&*payload)), current_trace()),
	};
	let _ = catch_unwind(AssertUnwindSafe(|| A::report_failure(&description, trace.as_deref())));
	AppResult::Failure
}

pub(crate) unsafe fn decode_args(argc: c_int, argv: *mut *mut c_char) -> Vec<String> {
	if argv.is_null() || argc <= 0 {
		return Vec::new();
	}
	(0..argc as usize)
		.map(|i| unsafe { *argv.add(i) })
		.filter(|arg| !arg.is_null())
		.map(|arg| unsafe { CStr::from_ptr(arg) }.to_string_lossy().into_owned())
		.collect()
}

fn state_into_raw<S>(state: Option<S>) -> *mut c_void {
	state.map_or(null_mut(), |state| Box::into_raw(Box::new(state)).cast())
}

unsafe fn state_from_raw<'a, S>(appstate: *mut c_void) -> Option<&'a S> {
	unsafe { appstate.cast::<S>().as_ref() }
}

unsafe fn state_take_raw<S>(appstate: *mut c_void) -> Option<Box<S>> {
	(!appstate.is_null()).then(|| unsafe { Box::from_raw(appstate.cast::<S>()) })
}

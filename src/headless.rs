/*
 * SPDX-FileCopyrightText: 2025 TerraModulus Team and Contributors
 * SPDX-License-Identifier: LGPL-3.0-only
 */

//! In-process stand-in for SDL's callback driver.
//!
//! Calls the very same trampolines SDL would, in the same order, without a window system or
//! SDL event pump. Events are queued by the caller as raw `SDL_Event`s. App metadata is not
//! applied here since SDL is never entered.

use crate::app::{App, AppResult};
use crate::runner::Argv;
use crate::trampoline::{app_event, app_init, app_iterate, app_quit};
use crate::{FerriciaError, FerriciaResult};
use sdl3::sys::events::SDL_Event;
use std::collections::VecDeque;
use std::ffi::c_void;
use std::marker::PhantomData;
use std::ptr::null_mut;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
	NotStarted,
	Running,
	Terminated,
}

pub struct HeadlessRunner<A: App> {
	argv: Argv,
	appstate: *mut c_void,
	phase: Phase,
	events: VecDeque<SDL_Event>,
	max_iterations: Option<u64>,
	iterations: u64,
	outcome: Option<AppResult>,
	_app: PhantomData<A>,
}

impl<A: App> HeadlessRunner<A> {
	pub fn new<I>(args: I) -> FerriciaResult<Self>
	where
		I: IntoIterator,
		I::Item: Into<Vec<u8>>,
	{
		Ok(Self {
			argv: Argv::new(args)?,
			appstate: null_mut(),
			phase: Phase::NotStarted,
			events: VecDeque::new(),
			max_iterations: None,
			iterations: 0,
			outcome: None,
			_app: PhantomData,
		})
	}

	/// Stops [`run`](Self::run) with [`AppResult::Success`] after `limit` iterations.
	pub fn with_max_iterations(mut self, limit: u64) -> Self {
		self.max_iterations = Some(limit);
		self
	}

	pub fn phase(&self) -> Phase {
		self.phase
	}

	pub fn iterations(&self) -> u64 {
		self.iterations
	}

	/// The result passed to quit, once terminated.
	pub fn outcome(&self) -> Option<AppResult> {
		self.outcome
	}

	/// Queues an event, delivered before the next iteration.
	pub fn push_event(&mut self, event: SDL_Event) {
		self.events.push_back(event);
	}

	pub fn init(&mut self) -> FerriciaResult<AppResult> {
		self.expect_phase(Phase::NotStarted, "init")?;
		let result = AppResult::from(unsafe {
			app_init::<A>(&mut self.appstate, self.argv.argc(), self.argv.as_mut_ptr())
		});
		if result.is_terminal() {
			self.terminate(result);
		} else {
			self.phase = Phase::Running;
		}
		Ok(result)
	}

	/// Delivers every queued event, then iterates once. The first result that is not
	/// [`AppResult::Continue`] terminates the app and is returned.
	pub fn step(&mut self) -> FerriciaResult<AppResult> {
		self.expect_phase(Phase::Running, "step")?;
		while let Some(mut event) = self.events.pop_front() {
			let result = AppResult::from(unsafe { app_event::<A>(self.appstate, &mut event) });
			if result.is_terminal() {
				self.terminate(result);
				return Ok(result);
			}
		}
		let result = AppResult::from(unsafe { app_iterate::<A>(self.appstate) });
		self.iterations += 1;
		if result.is_terminal() {
			self.terminate(result);
		}
		Ok(result)
	}

	/// Runs until the app stops itself or the iteration limit is reached, and returns the
	/// exit status SDL would report.
	pub fn run(&mut self) -> FerriciaResult<i32> {
		if self.phase == Phase::NotStarted {
			self.init()?;
		}
		while self.phase == Phase::Running {
			if self.max_iterations.is_some_and(|limit| self.iterations >= limit) {
				log::debug!("Iteration limit of {} reached", self.iterations);
				self.terminate(AppResult::Success);
				break;
			}
			self.step()?;
		}
		Ok(self.outcome.map_or(0, AppResult::exit_code))
	}

	fn terminate(&mut self, result: AppResult) {
		unsafe { app_quit::<A>(self.appstate, result.into()) };
		self.appstate = null_mut();
		self.phase = Phase::Terminated;
		self.outcome = Some(result);
		self.events.clear();
	}

	fn expect_phase(&self, expected: Phase, operation: &str) -> FerriciaResult<()> {
		if self.phase == expected {
			Ok(())
		} else {
			Err(FerriciaError::new(format!("cannot {operation} while {:?}", self.phase)))
		}
	}
}

/// A runner dropped mid-run still quits the app so its state is released.
impl<A: App> Drop for HeadlessRunner<A> {
	fn drop(&mut self) {
		if self.phase == Phase::Running {
			self.terminate(AppResult::Success);
		}
	}
}

/*
 * SPDX-FileCopyrightText: 2025 TerraModulus Team and Contributors
 * SPDX-License-Identifier: LGPL-3.0-only
 */

//! Counts frames until a target is reached or SDL reports a quit request.
//!
//! Usage: `frame-counter [FRAMES]`, 300 frames by default. `RUST_LOG=debug` shows every event.

use ferricia_lifecycle::{run, App, AppMetadata, AppResult, Event, FerriciaError, FerriciaResult};
use log::{debug, info};
use sdl3::sys::init::{SDL_Init, SDL_INIT_EVENTS};
use std::process::ExitCode;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::sleep;
use std::time::{Duration, Instant};

const DEFAULT_FRAMES: u64 = 300;
const FRAME_TIME: Duration = Duration::from_millis(16);

struct FrameCounter;

struct Counters {
	target: u64,
	started: Instant,
	frames: AtomicU64,
	events: AtomicU64,
}

impl App for FrameCounter {
	type State = Counters;

	fn metadata() -> Option<AppMetadata> {
		let metadata = AppMetadata::new("Frame Counter")
			.with_version(env!("CARGO_PKG_VERSION"))
			.with_identifier("terramodulus.ferricia.frame-counter");
		Some(metadata)
	}

	fn init(state: &mut Option<Counters>, args: &[String]) -> FerriciaResult<AppResult> {
		let target = match args.get(1) {
			Some(arg) => arg.parse::<u64>().map_err(|e| FerriciaError::new(format!("invalid frame count {arg:?}: {e}")))?,
			None => DEFAULT_FRAMES,
		};
		if !unsafe { SDL_Init(SDL_INIT_EVENTS) } {
			return Err(FerriciaError::from_sdl());
		}
		info!("Counting {target} frames");
		*state = Some(Counters {
			target,
			started: Instant::now(),
			frames: AtomicU64::new(0),
			events: AtomicU64::new(0),
		});
		Ok(AppResult::Continue)
	}

	fn iterate(state: Option<&Counters>) -> FerriciaResult<AppResult> {
		let counters = state.ok_or("frame counter was not initialized")?;
		let frame = counters.frames.fetch_add(1, Ordering::Relaxed) + 1;
		if frame >= counters.target {
			return Ok(AppResult::Success);
		}
		sleep(FRAME_TIME);
		Ok(AppResult::Continue)
	}

	fn event(state: Option<&Counters>, event: Event) -> FerriciaResult<AppResult> {
		if let Some(counters) = state {
			counters.events.fetch_add(1, Ordering::Relaxed);
		}
		match event {
			Event::Quit { .. } => {
				info!("Quit requested");
				Ok(AppResult::Success)
			}
			other => {
				debug!("{other:?}");
				Ok(AppResult::Continue)
			}
		}
	}

	fn quit(state: Option<Box<Counters>>, result: AppResult) {
		if let Some(counters) = state {
			info!(
				"{:?} after {} frames and {} events in {:.2?}",
				result,
				counters.frames.load(Ordering::Relaxed),
				counters.events.load(Ordering::Relaxed),
				counters.started.elapsed(),
			);
		}
	}
}

fn main() -> ExitCode {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
		.format_timestamp_millis()
		.init();
	run::<FrameCounter>()
}

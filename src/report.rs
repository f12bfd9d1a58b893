/*
 * SPDX-FileCopyrightText: 2025 TerraModulus Team and Contributors
 * SPDX-License-Identifier: LGPL-3.0-only
 */
use std::any::Any;
use std::backtrace::{Backtrace, BacktraceStatus};

/// Default sink for failures intercepted at the C boundary.
pub(crate) fn log_failure(description: &str, trace: Option<&str>) {
	log::error!("{description}");
	if let Some(trace) = trace {
		log::debug!("stack backtrace:\n{trace}");
	}
}

/// Renders `backtrace` if it was actually captured.
pub(crate) fn render_trace(backtrace: &Backtrace) -> Option<String> {
	match backtrace.status() {
		BacktraceStatus::Captured => Some(backtrace.to_string()),
		_ => None,
	}
}

/// Trace of the calling frame, subject to `RUST_BACKTRACE` like any other capture.
pub(crate) fn current_trace() -> Option<String> {
	render_trace(&Backtrace::capture())
}

/// Best effort description of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
	if let Some(message) = payload.downcast_ref::<&'static str>() {
		message
	} else if let Some(message) = payload.downcast_ref::<String>() {
		message.as_str()
	} else {
		"non-string panic payload"
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::panic::catch_unwind;

	#[test]
	fn reads_static_str_payloads() {
		let payload = catch_unwind(|| panic!("atlas overflow")).unwrap_err();
		assert_eq!(panic_message(&*payload), "atlas overflow");
	}

	#[test]
	fn reads_formatted_payloads() {
		let payload = catch_unwind(|| panic!("chunk {} missing", 12)).unwrap_err();
		assert_eq!(panic_message(&*payload), "chunk 12 missing");
	}

	#[test]
	fn forced_traces_are_rendered() {
		let trace = render_trace(&Backtrace::force_capture()).unwrap();
		assert!(!trace.is_empty());
		assert!(render_trace(&Backtrace::disabled()).is_none());
	}

	#[test]
	fn falls_back_for_other_payloads() {
		let payload = catch_unwind(|| std::panic::panic_any(7u32)).unwrap_err();
		assert_eq!(panic_message(&*payload), "non-string panic payload");
	}
}

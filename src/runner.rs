/*
 * SPDX-FileCopyrightText: 2025 TerraModulus Team and Contributors
 * SPDX-License-Identifier: LGPL-3.0-only
 */
use crate::app::App;
use crate::report::{current_trace, log_failure, panic_message};
use crate::trampoline::{app_event, app_init, app_iterate, app_quit, decode_args};
use crate::FerriciaResult;
use sdl3::sys::main::{SDL_EnterAppMainCallbacks, SDL_RunApp};
use std::env;
use std::ffi::{c_char, c_int, CString, OsString};
use std::panic::catch_unwind;
use std::process::ExitCode;
use std::ptr::null_mut;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

/// An ordinary `main` run by SDL without the callback lifecycle.
pub type MainFn = fn(&[String]) -> FerriciaResult<()>;

/// SDL's main entry points set up process wide state and may only be entered once.
static ENTERED: OnceFlag = OnceFlag::new();
static MAIN: OnceLock<MainFn> = OnceLock::new();

struct OnceFlag(AtomicBool);

impl OnceFlag {
	const fn new() -> Self {
		Self(AtomicBool::new(false))
	}

	fn claim(&self) -> FerriciaResult<()> {
		if self.0.swap(true, Ordering::AcqRel) {
			log::warn!("Refusing to enter SDL a second time");
			Err("SDL main has already been entered in this process".into())
		} else {
			Ok(())
		}
	}
}

/// C style argument vector, NULL terminated, kept alive while SDL runs.
pub(crate) struct Argv {
	_strings: Vec<CString>,
	pointers: Vec<*mut c_char>,
}

impl Argv {
	pub(crate) fn new<I>(args: I) -> FerriciaResult<Self>
	where
		I: IntoIterator,
		I::Item: Into<Vec<u8>>,
	{
		let strings = args.into_iter().map(CString::new).collect::<Result<Vec<_>, _>>()?;
		if c_int::try_from(strings.len()).is_err() {
			return Err(format!("{} arguments do not fit in argc", strings.len()).into());
		}
		let mut pointers = strings.iter().map(|s| s.as_ptr() as *mut c_char).collect::<Vec<_>>();
		pointers.push(null_mut());
		Ok(Self { _strings: strings, pointers })
	}

	pub(crate) fn argc(&self) -> c_int {
		(self.pointers.len() - 1) as c_int
	}

	pub(crate) fn as_mut_ptr(&mut self) -> *mut *mut c_char {
		self.pointers.as_mut_ptr()
	}
}

fn process_args() -> impl Iterator<Item = Vec<u8>> {
	env::args_os().map(OsString::into_encoded_bytes)
}

/// Hands control to SDL, which drives `A` until one of its phases stops the app.
/// Returns the exit status reported by SDL.
///
/// This must be the only thing `main` does; SDL may not return on some platforms.
pub fn run_with_args<A, I>(args: I) -> FerriciaResult<i32>
where
	A: App,
	I: IntoIterator,
	I::Item: Into<Vec<u8>>,
{
	let mut argv = Argv::new(args)?;
	if let Some(metadata) = A::metadata() {
		metadata.apply()?;
	}
	ENTERED.claim()?;
	log::debug!("Entering SDL main callbacks with {} arguments", argv.argc());
	let code = unsafe {
		SDL_EnterAppMainCallbacks(
			argv.argc(),
			argv.as_mut_ptr(),
			Some(app_init::<A>),
			Some(app_iterate::<A>),
			Some(app_event::<A>),
			Some(app_quit::<A>),
		)
	};
	log::debug!("SDL main callbacks finished with {code}");
	Ok(code)
}

/// [`run_with_args`] with the arguments of the current process.
pub fn run<A: App>() -> ExitCode {
	to_exit_code(run_with_args::<A, _>(process_args()), A::report_failure)
}

/// Runs `main` through `SDL_RunApp`. Returning normally exits with 0, an error or a panic is
/// logged and exits with 1.
pub fn run_main_with_args<I>(main: MainFn, args: I) -> FerriciaResult<i32>
where
	I: IntoIterator,
	I::Item: Into<Vec<u8>>,
{
	let mut argv = Argv::new(args)?;
	ENTERED.claim()?;
	let _ = MAIN.set(main);
	Ok(unsafe { SDL_RunApp(argv.argc(), argv.as_mut_ptr(), Some(main_trampoline), null_mut()) })
}

/// [`run_main_with_args`] with the arguments of the current process.
pub fn run_main(main: MainFn) -> ExitCode {
	to_exit_code(run_main_with_args(main, process_args()), log_failure)
}

unsafe extern "C" fn main_trampoline(argc: c_int, argv: *mut *mut c_char) -> c_int {
	let args = unsafe { decode_args(argc, argv) };
	match MAIN.get() {
		Some(main) => call_main(*main, &args),
		None => {
			log::error!("SDL started without a registered main function");
			1
		}
	}
}

fn call_main(main: MainFn, args: &[String]) -> c_int {
	let (description, trace) = match catch_unwind(|| main(args)) {
		Ok(Ok(())) => return 0,
		Ok(Err(err)) => (format!("main failed: {err}"), err.trace()),
		Err(payload) => (format!("main panicked: {}", panic_message(&*payload)), current_trace()),
	};
	log_failure(&description, trace.as_deref());
	1
}

fn to_exit_code(result: FerriciaResult<i32>, report: fn(&str, Option<&str>)) -> ExitCode {
	match result {
		Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
		Err(err) => {
			report(&format!("SDL could not be entered: {err}"), err.trace().as_deref());
			ExitCode::FAILURE
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::AppMetadata;
	use std::ffi::CStr;

	#[test]
	fn argv_is_null_terminated() {
		let mut argv = Argv::new(["ferricia", "--fullscreen"]).unwrap();
		assert_eq!(argv.argc(), 2);
		let ptr = argv.as_mut_ptr();
		unsafe {
			assert_eq!(CStr::from_ptr(*ptr).to_str().unwrap(), "ferricia");
			assert_eq!(CStr::from_ptr(*ptr.add(1)).to_str().unwrap(), "--fullscreen");
			assert!((*ptr.add(2)).is_null());
		}
	}

	#[test]
	fn argv_decodes_back_to_the_same_arguments() {
		let mut argv = Argv::new(vec![String::from("a b"), String::new()]).unwrap();
		let args = unsafe { decode_args(argv.argc(), argv.as_mut_ptr()) };
		assert_eq!(args, ["a b", ""]);
	}

	#[test]
	fn empty_argv_still_has_terminator() {
		let mut argv = Argv::new(Vec::<String>::new()).unwrap();
		assert_eq!(argv.argc(), 0);
		assert!(unsafe { *argv.as_mut_ptr() }.is_null());
	}

	#[test]
	fn argv_rejects_interior_nul() {
		assert!(Argv::new(["ok", "bro\0ken"]).is_err());
	}

	#[test]
	fn once_flag_can_only_be_claimed_once() {
		let flag = OnceFlag::new();
		assert!(flag.claim().is_ok());
		let err = flag.claim().unwrap_err();
		assert!(err.to_string().contains("already been entered"));
	}

	#[test]
	fn main_exit_codes() {
		assert_eq!(call_main(|_| Ok(()), &[]), 0);
		assert_eq!(call_main(|_| Err("no save directory".into()), &[]), 1);
		assert_eq!(call_main(|_| panic!("boom"), &[]), 1);
	}

	#[test]
	fn main_receives_arguments() {
		fn expects_two(args: &[String]) -> FerriciaResult<()> {
			match args {
				[first, second] if first == "Hello" && second == "World" => Ok(()),
				_ => Err(format!("unexpected arguments {args:?}").into()),
			}
		}
		let args = [String::from("Hello"), String::from("World")];
		assert_eq!(call_main(expects_two, &args), 0);
		assert_eq!(call_main(expects_two, &args[..1]), 1);
	}

	struct Misnamed;

	impl App for Misnamed {
		type State = ();

		fn metadata() -> Option<AppMetadata> {
			Some(AppMetadata::new("Terra\0Modulus"))
		}
	}

	#[test]
	fn entry_guard_is_only_consumed_by_a_real_entry() {
		let err = run_with_args::<Misnamed, _>(["terra"]).unwrap_err();
		assert!(err.to_string().contains("NUL"));
		let err = run_main_with_args(|_| Ok(()), ["ok", "bro\0ken"]).unwrap_err();
		assert!(err.to_string().contains("NUL"));
		assert!(!ENTERED.0.load(Ordering::Acquire));

		ENTERED.claim().unwrap();
		let err = run_main_with_args(|_| Ok(()), ["terra"]).unwrap_err();
		assert!(err.to_string().contains("already been entered"));
		assert!(MAIN.get().is_none());
		let err = run_with_args::<Misnamed, _>(["terra"]).unwrap_err();
		assert!(err.to_string().contains("NUL"));
	}

	thread_local! {
		static REPORTED: std::cell::RefCell<Vec<String>> = const { std::cell::RefCell::new(Vec::new()) };
	}

	fn record(description: &str, _trace: Option<&str>) {
		REPORTED.with_borrow_mut(|r| r.push(description.to_string()));
	}

	#[test]
	fn exit_code_reports_start_failures() {
		let _ = to_exit_code(Ok(0), record);
		assert!(REPORTED.with_borrow(Vec::is_empty));
		let _ = to_exit_code(Err("already entered".into()), record);
		REPORTED.with_borrow(|r| assert_eq!(r, &["SDL could not be entered: already entered"]));
	}
}

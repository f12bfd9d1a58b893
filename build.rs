/*
 * SPDX-FileCopyrightText: 2025 TerraModulus Team and Contributors
 * SPDX-License-Identifier: LGPL-3.0-only
 */
use std::env;

// SDL 3 is built as a shared library next to the artifacts, so binaries and
// test harnesses look it up relative to themselves.
fn main() {
	match env::var("CARGO_CFG_TARGET_OS").as_deref() {
		Ok("linux") => println!("cargo:rustc-link-arg=-Wl,-rpath,$ORIGIN"),
		Ok("macos") => println!("cargo:rustc-link-arg=-Wl,-rpath,@loader_path"),
		_ => {}
	}
	println!("cargo:rerun-if-changed=build.rs");
}

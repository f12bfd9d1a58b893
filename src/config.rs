/*
 * SPDX-FileCopyrightText: 2025 TerraModulus Team and Contributors
 * SPDX-License-Identifier: LGPL-3.0-only
 */
use crate::{FerriciaError, FerriciaResult};
use getset::Getters;
use sdl3::sys::init::SDL_SetAppMetadata;
use std::ffi::{c_char, CString};
use std::ptr::null;

/// Application metadata reported to SDL, used by e.g. the About dialog on macOS or audio
/// stream names on Linux.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct AppMetadata {
	#[get = "pub"]
	name: String,
	#[get = "pub"]
	version: Option<String>,
	/// Reverse domain name, e.g. `com.example.game`.
	#[get = "pub"]
	identifier: Option<String>,
}

impl AppMetadata {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			version: None,
			identifier: None,
		}
	}

	pub fn with_version(mut self, version: impl Into<String>) -> Self {
		self.version = Some(version.into());
		self
	}

	pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
		self.identifier = Some(identifier.into());
		self
	}

	/// Must be called before SDL is initialized; later calls have no effect on SDL.
	pub fn apply(&self) -> FerriciaResult<()> {
		let name = CString::new(self.name.as_str())?;
		let version = self.version.as_deref().map(CString::new).transpose()?;
		let identifier = self.identifier.as_deref().map(CString::new).transpose()?;
		if unsafe { SDL_SetAppMetadata(name.as_ptr(), opt_ptr(&version), opt_ptr(&identifier)) } {
			log::debug!("Applied app metadata for {}", self.name);
			Ok(())
		} else {
			Err(FerriciaError::from_sdl())
		}
	}
}

fn opt_ptr(value: &Option<CString>) -> *const c_char {
	value.as_ref().map_or(null(), |v| v.as_ptr())
}

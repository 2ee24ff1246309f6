// Copyright 2025 The Rustux Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Driver Configuration
//!
//! Settings for one IOCSR device node. They can be built in code or taken
//! from a boot command line in `key=value` form:
//!
//! ```text
//! iocsr.name=iocsr iocsr.major=0x100 iocsr.end=0xffff
//! ```
//!
//! - `iocsr.name` - device node and class name
//! - `iocsr.major` - fixed major number, `0` asks for a dynamic one
//! - `iocsr.end` - anchor for end-relative seeks
//!
//! Numbers may be decimal or `0x` hex. Keys outside `iocsr.` are ignored.

use alloc::string::{String, ToString};

use crate::dev::MAX_MAJOR;
use crate::err::{Error, Result};
use crate::seek::SPACE_END;

/// Default device node name
pub const DEFAULT_NAME: &str = "iocsr";

/// Device node configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Device node and class name
    pub name: String,

    /// Fixed major number, `None` for dynamic allocation
    pub major: Option<u32>,

    /// Anchor for `Whence::End`
    pub logical_end: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            major: None,
            logical_end: SPACE_END as u32,
        }
    }
}

impl Config {
    /// Use a different device name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Request a fixed major number
    pub fn with_major(mut self, major: u32) -> Self {
        self.major = Some(major);
        self
    }

    /// Move the anchor for end-relative seeks
    pub fn with_logical_end(mut self, logical_end: u32) -> Self {
        self.logical_end = logical_end;
        self
    }

    /// Parse a command line
    ///
    /// Unset keys keep their defaults; later occurrences win.
    pub fn from_cmdline(cmdline: &str) -> Result<Self> {
        let mut config = Self::default();

        for arg in cmdline.split_whitespace() {
            // A bare key behaves like "key="
            let (key, value) = arg.split_once('=').unwrap_or((arg, ""));
            match key {
                "iocsr.name" => config.name = value.to_string(),
                "iocsr.major" => {
                    config.major = match parse_number(value)? {
                        0 => None,
                        major => Some(major),
                    }
                }
                "iocsr.end" => config.logical_end = parse_number(value)?,
                _ => {}
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the settings can be registered
    pub fn validate(&self) -> Result {
        if self.name.is_empty() || self.name.contains('/') {
            return Err(Error::InvalidArgs);
        }
        if matches!(self.major, Some(major) if major == 0 || major > MAX_MAJOR) {
            return Err(Error::InvalidArgs);
        }
        Ok(())
    }
}

/// Parse a decimal or `0x` hex number
fn parse_number(value: &str) -> Result<u32> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse::<u32>(),
    };
    parsed.map_err(|_| Error::InvalidArgs)
}

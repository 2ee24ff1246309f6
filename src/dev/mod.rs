// Copyright 2025 The Rustux Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Character Device Glue
//!
//! Everything needed to publish the register stream as a device node:
//! major number registration, device classes and nodes, and the driver
//! object tying them to a register bus.
//!
//! # Design
//!
//! - Registration tables are plain values, usable as statics
//! - Every registration is a guard that releases itself when dropped
//! - A driver acquires chrdev, class and node in that order and releases
//!   them in reverse, on failure as well as on unload

use bitflags::bitflags;
use core::fmt;

mod chrdev;
mod class;
mod driver;

pub use chrdev::{ChrdevRegistration, ChrdevTable};
pub use class::{ClassRegistration, ClassTable, DeviceNode};
pub use driver::IocsrDriver;

/// Bits of a device number holding the minor
pub const MINOR_BITS: u32 = 20;

/// Minor number mask
pub const MINOR_MASK: u32 = (1 << MINOR_BITS) - 1;

/// Highest major number
pub const MAX_MAJOR: u32 = (1 << (32 - MINOR_BITS)) - 1;

/// Device number (major:minor)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DevT(u32);

impl DevT {
    /// Combine a major and a minor number
    pub const fn new(major: u32, minor: u32) -> Self {
        Self(((major & MAX_MAJOR) << MINOR_BITS) | (minor & MINOR_MASK))
    }

    /// Wrap an encoded device number
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Encoded device number
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Major number
    pub const fn major(self) -> u32 {
        self.0 >> MINOR_BITS
    }

    /// Minor number
    pub const fn minor(self) -> u32 {
        self.0 & MINOR_MASK
    }
}

impl fmt::Display for DevT {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.major(), self.minor())
    }
}

bitflags! {
    /// Access requested when opening the device
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OpenFlags: u32 {
        /// Read access
        const READ = 1 << 0;
        /// Write access
        const WRITE = 1 << 1;
        /// Non-blocking I/O (reads never block anyway)
        const NONBLOCK = 1 << 2;
    }
}

// POSIX open(2) flag bits
const O_ACCMODE: i32 = 0o3;
const O_WRONLY: i32 = 0o1;
const O_RDWR: i32 = 0o2;
const O_NONBLOCK: i32 = 0o4000;

impl OpenFlags {
    /// Translate `open(2)` flags
    pub fn from_posix(flags: i32) -> Self {
        let mut open = match flags & O_ACCMODE {
            O_WRONLY => OpenFlags::WRITE,
            O_RDWR => OpenFlags::READ | OpenFlags::WRITE,
            _ => OpenFlags::READ,
        };
        if flags & O_NONBLOCK != 0 {
            open |= OpenFlags::NONBLOCK;
        }
        open
    }
}

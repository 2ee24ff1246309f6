// Copyright 2025 The Rustux Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! IOCSR Byte-Stream Driver
//!
//! The LoongArch IO control and status registers are only reachable as
//! aligned 64-bit reads. This crate turns that register space into an
//! ordinary byte stream: a [`Session`] keeps a cursor, reads any number of
//! bytes at any offset, and seeks within the 32-bit address space.
//!
//! # Layout
//!
//! - [`reg`] - the aligned 64-bit access primitive and simulated register file
//! - [`translator`] - byte request to register read translation
//! - [`seek`] - cursor repositioning
//! - [`session`] - one open handle (cursor + bus)
//! - [`dev`] - character device registration and the driver lifecycle
//! - [`present`] - value formatting and register probing for tools
//! - [`config`] - driver configuration
//!
//! # Example
//!
//! ```
//! use iocsr::{RegisterFile, Session, Whence};
//!
//! let regs = RegisterFile::new();
//! regs.set(0x20, 0x1122_3344_5566_7788)?;
//!
//! let mut session = Session::new(&regs, u32::MAX);
//! session.seek(0x22, Whence::Set)?;
//! assert_eq!(session.read_vec(2)?, [0x66, 0x55]);
//! assert_eq!(session.position(), 0x24);
//! # Ok::<(), iocsr::Error>(())
//! ```

#![cfg_attr(not(any(feature = "std", test)), no_std)]

extern crate alloc;

// Logging macros must come first so every module can use them
#[macro_use]
mod trace;

pub mod config;
pub mod dev;
pub mod err;
pub mod present;
pub mod reg;
pub mod seek;
pub mod session;
pub mod translator;

// Re-export commonly used types
pub use config::Config;
pub use dev::{ChrdevTable, ClassTable, DevT, IocsrDriver, OpenFlags};
pub use err::{Error, Result};
pub use present::{format_bytes, format_value, parse_address, Width};
pub use reg::{register_bytes, register_value, NativeBus, RegisterBus, RegisterFile, REGISTER_SIZE};
pub use seek::{Whence, SPACE_END};
pub use session::Session;
pub use translator::{Chunk, ReadPlan};

#[cfg(feature = "std")]
pub use present::probe;

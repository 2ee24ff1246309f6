// Copyright 2025 The Rustux Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! IOCSR Session
//!
//! A session is one open handle on the register space: a cursor plus a
//! borrowed register bus. Sessions never share a cursor. Any number of
//! sessions can read the same bus at once; `&mut self` on `read` and `seek`
//! is all the serialization a single session needs.

use alloc::vec;
use alloc::vec::Vec;

use crate::err::Result;
use crate::reg::RegisterBus;
use crate::seek::{self, Whence};
use crate::translator;

/// One open handle on the register space
pub struct Session<'bus, B: RegisterBus + ?Sized> {
    /// Register bus shared with other sessions
    bus: &'bus B,

    /// Current byte offset
    cursor: u64,

    /// Anchor for `Whence::End`
    logical_end: u32,
}

impl<'bus, B: RegisterBus + ?Sized> Session<'bus, B> {
    /// Open a session at offset 0
    pub fn new(bus: &'bus B, logical_end: u32) -> Self {
        Self {
            bus,
            cursor: 0,
            logical_end,
        }
    }

    /// Current cursor
    #[inline]
    pub fn position(&self) -> u64 {
        self.cursor
    }

    /// Anchor used for `Whence::End` seeks
    #[inline]
    pub fn logical_end(&self) -> u32 {
        self.logical_end
    }

    /// Read `buf.len()` bytes at the cursor
    ///
    /// # Returns
    ///
    /// The number of bytes produced. The cursor advances by exactly that
    /// much. On failure the cursor does not move and no bytes are returned.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let produced = translator::read_at(self.bus, self.cursor, buf)?;
        self.cursor += produced as u64;
        Ok(produced)
    }

    /// Read `count` bytes at the cursor into a new buffer
    pub fn read_vec(&mut self, count: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; count];
        let produced = self.read(&mut buf)?;
        buf.truncate(produced);
        Ok(buf)
    }

    /// Move the cursor
    ///
    /// On failure the cursor is left where it was. Seeking never touches
    /// the bus.
    pub fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        let target = seek::resolve(self.cursor, offset, whence, self.logical_end)?;
        LDEBUGF!("seek {:?} {:+}: {:#x} -> {:#x}", whence, offset, self.cursor, target);
        self.cursor = target;
        Ok(target)
    }

    /// Close the session
    pub fn close(self) {
        LDEBUGF!("session closed at {:#x}", self.cursor);
    }
}

// ============================================================================
// std::io adapters
// ============================================================================

#[cfg(feature = "std")]
impl<B: RegisterBus + ?Sized> std::io::Read for Session<'_, B> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        Ok(Session::read(self, buf)?)
    }
}

/// Seeks follow the device's `lseek`, so `SeekFrom::End(n)` lands `n`
/// bytes *below* the logical end.
#[cfg(feature = "std")]
impl<B: RegisterBus + ?Sized> std::io::Seek for Session<'_, B> {
    fn seek(&mut self, pos: std::io::SeekFrom) -> std::io::Result<u64> {
        use crate::err::Error;
        use std::io::SeekFrom;

        let (offset, whence) = match pos {
            SeekFrom::Start(offset) => {
                (i64::try_from(offset).map_err(|_| Error::InvalidSeek)?, Whence::Set)
            }
            SeekFrom::Current(offset) => (offset, Whence::Cur),
            SeekFrom::End(offset) => (offset, Whence::End),
        };
        Ok(Session::seek(self, offset, whence)?)
    }
}

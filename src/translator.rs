// Copyright 2025 The Rustux Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Byte-Stream Translator
//!
//! Converts a byte request `(offset, count)` into aligned 64-bit register
//! reads and splices the requested bytes out of them.
//!
//! # Design
//!
//! A request is served in up to three phases:
//!
//! - **Head**: an unaligned offset reads the register containing it and
//!   keeps the bytes from the offset to the register end (or fewer, if the
//!   request is shorter)
//! - **Block**: while more than 8 bytes remain, whole registers are copied
//! - **Tail**: the last 1 to 8 bytes come from the low end of one register
//!
//! An aligned request that is a multiple of 8 sends its last register
//! through the tail phase. The bytes are the same either way.
//!
//! Planning ([`ReadPlan`]) is separate from execution ([`read_at`]) so the
//! exact register sequence can be inspected without a bus.

use core::ops::Range;

use crate::err::Result;
use crate::reg::{align_down, register_bytes, RegisterBus, REGISTER_SIZE};

const REG: usize = REGISTER_SIZE as usize;

/// Which translation phase produced a chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Head,
    Block,
    Tail,
}

/// One register read and the bytes kept from it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    /// Aligned register address
    pub register: u32,

    /// Index of the first kept byte within the register
    pub skip: usize,

    /// Number of bytes kept
    pub len: usize,

    /// Phase that emitted this chunk
    pub phase: Phase,
}

impl Chunk {
    /// Byte lanes of the register that land in the output
    #[inline]
    pub fn lanes(&self) -> Range<usize> {
        self.skip..self.skip + self.len
    }
}

/// Ordered register reads that serve one byte request
///
/// Register addresses are the cursor truncated to 32 bits, so a request
/// running past the top of the space wraps to register 0 the same way the
/// hardware address does.
#[derive(Debug, Clone)]
pub struct ReadPlan {
    cursor: u64,
    remaining: usize,
}

impl ReadPlan {
    /// Plan a read of `count` bytes starting at `cursor`
    pub fn new(cursor: u64, count: usize) -> Self {
        Self {
            cursor,
            remaining: count,
        }
    }

    /// Cursor after every chunk has been consumed
    pub fn end(&self) -> u64 {
        self.cursor + self.remaining as u64
    }
}

impl Iterator for ReadPlan {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        if self.remaining == 0 {
            return None;
        }

        let misalignment = (self.cursor % REG as u64) as usize;
        let (phase, skip, len) = if misalignment != 0 {
            (Phase::Head, misalignment, (REG - misalignment).min(self.remaining))
        } else if self.remaining > REG {
            (Phase::Block, 0, REG)
        } else {
            (Phase::Tail, 0, self.remaining)
        };

        let chunk = Chunk {
            register: align_down(self.cursor) as u32,
            skip,
            len,
            phase,
        };
        self.cursor += len as u64;
        self.remaining -= len;
        Some(chunk)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let mut plan = self.clone();
        let mut count = 0;
        // Head chunk first, then whole registers
        if plan.next().is_some() {
            count = 1 + plan.remaining.div_ceil(REG);
        }
        (count, Some(count))
    }
}

impl ExactSizeIterator for ReadPlan {}

/// Fill `buf` with the bytes starting at `offset`
///
/// Returns the number of bytes produced, always `buf.len()`. On a bus
/// failure the bytes already spliced are zeroed and the error is returned;
/// a partial result is never handed back.
pub fn read_at<B: RegisterBus + ?Sized>(bus: &B, offset: u64, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;

    for chunk in ReadPlan::new(offset, buf.len()) {
        let value = match bus.read_u64(chunk.register) {
            Ok(value) => value,
            Err(err) => {
                LWARNF!(
                    "read of {:#x} failed after {} of {} bytes: {}",
                    chunk.register,
                    filled,
                    buf.len(),
                    err
                );
                buf[..filled].fill(0);
                return Err(err);
            }
        };
        LTRACEF!("iocsr[{:#x}] = {:#018x}", chunk.register, value);

        let lanes = register_bytes(value);
        buf[filled..filled + chunk.len].copy_from_slice(&lanes[chunk.lanes()]);
        filled += chunk.len;
    }

    Ok(filled)
}

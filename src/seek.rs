// Copyright 2025 The Rustux Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Cursor Repositioning
//!
//! The register space has no size of its own. `End` seeks are anchored at
//! a logical end (the top of the 32-bit space unless configured otherwise)
//! and count downwards from it, so `End` with offset 0 lands on the last
//! addressable byte.

use crate::err::{Error, Result};

/// Highest valid cursor
pub const SPACE_END: u64 = u32::MAX as u64;

/// Seek origin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
    /// Absolute position (`SEEK_SET`)
    Set,

    /// Relative to the current cursor (`SEEK_CUR`)
    Cur,

    /// Logical end minus the offset (`SEEK_END`)
    End,
}

impl Whence {
    /// Decode a raw `whence` argument
    pub fn from_raw(raw: i32) -> Result<Self> {
        match raw {
            0 => Ok(Whence::Set),
            1 => Ok(Whence::Cur),
            2 => Ok(Whence::End),
            _ => Err(Error::InvalidArgs),
        }
    }
}

/// Compute the cursor a seek would produce
///
/// # Arguments
///
/// * `cursor` - Current cursor
/// * `offset` - Requested offset, negative values allowed
/// * `whence` - Seek origin
/// * `logical_end` - Anchor for `Whence::End`
///
/// # Returns
///
/// The new cursor, or `InvalidSeek` if it falls outside `0..=SPACE_END`.
pub fn resolve(cursor: u64, offset: i64, whence: Whence, logical_end: u32) -> Result<u64> {
    let target = match whence {
        Whence::Set => offset as i128,
        Whence::Cur => cursor as i128 + offset as i128,
        Whence::End => logical_end as i128 - offset as i128,
    };

    if target < 0 || target > SPACE_END as i128 {
        LDEBUGF!(
            "rejected seek {:?} {:+} from {:#x}: target {}",
            whence,
            offset,
            cursor,
            target
        );
        return Err(Error::InvalidSeek);
    }

    Ok(target as u64)
}

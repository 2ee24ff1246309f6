// Copyright 2025 The Rustux Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Register Presentation
//!
//! Helpers for tools that read a single register value through the device
//! node: access widths, hex formatting, address parsing and a one-shot
//! probe over any seekable reader.

use alloc::format;
use alloc::string::String;
use core::str::FromStr;

use crate::err::{Error, Result};
use crate::reg::register_value;

/// Access width of a probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Width {
    Byte = 1,
    Half = 2,
    #[default]
    Word = 4,
    Double = 8,
}

impl Width {
    /// Width in bytes
    pub const fn bytes(self) -> usize {
        self as usize
    }

    /// Mask covering the low `bytes()` bytes of a value
    pub const fn mask(self) -> u64 {
        match self {
            Width::Double => u64::MAX,
            _ => (1u64 << (self.bytes() * 8)) - 1,
        }
    }
}

impl TryFrom<usize> for Width {
    type Error = Error;

    fn try_from(bytes: usize) -> Result<Self> {
        match bytes {
            1 => Ok(Width::Byte),
            2 => Ok(Width::Half),
            4 => Ok(Width::Word),
            8 => Ok(Width::Double),
            _ => Err(Error::InvalidArgs),
        }
    }
}

impl FromStr for Width {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let bytes = text.trim().parse::<usize>().map_err(|_| Error::InvalidArgs)?;
        Width::try_from(bytes)
    }
}

/// Render the low `width` bytes of a value as zero-padded uppercase hex
///
/// ```
/// use iocsr::{format_value, Width};
///
/// assert_eq!(format_value(0x1234_5678, Width::Half), "0x5678");
/// ```
pub fn format_value(value: u64, width: Width) -> String {
    let digits = width.bytes() * 2;
    format!("0x{:0digits$X}", value & width.mask())
}

/// Render bytes read from the stream, lowest address first
///
/// The length picks the width and must be 1, 2, 4 or 8. The most
/// significant (highest address) byte is printed first.
pub fn format_bytes(bytes: &[u8]) -> Result<String> {
    let width = Width::try_from(bytes.len())?;
    let mut lanes = [0u8; 8];
    lanes[..bytes.len()].copy_from_slice(bytes);
    Ok(format_value(register_value(lanes), width))
}

/// Parse a hex address, with or without a `0x` prefix
pub fn parse_address(text: &str) -> Result<u32> {
    let text = text.trim();
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    u32::from_str_radix(digits, 16).map_err(|_| Error::InvalidArgs)
}

/// Read one value of `width` bytes at `address`
///
/// Seeks the device to `address` and issues a single read. Anything other
/// than exactly `width` bytes back is a `ShortRead`.
#[cfg(feature = "std")]
pub fn probe<D>(dev: &mut D, address: u32, width: Width) -> Result<u64>
where
    D: std::io::Read + std::io::Seek + ?Sized,
{
    use std::io::SeekFrom;

    dev.seek(SeekFrom::Start(address as u64))?;

    let mut lanes = [0u8; 8];
    let produced = dev.read(&mut lanes[..width.bytes()])?;
    if produced != width.bytes() {
        LWARNF!("probe of {:#x}: wanted {} bytes, got {}", address, width.bytes(), produced);
        return Err(Error::ShortRead);
    }
    Ok(register_value(lanes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_conversion() {
        assert_eq!(Width::try_from(1usize), Ok(Width::Byte));
        assert_eq!(Width::try_from(8usize), Ok(Width::Double));
        assert_eq!(Width::try_from(3usize), Err(Error::InvalidArgs));
        assert_eq!("2".parse::<Width>(), Ok(Width::Half));
        assert_eq!("16".parse::<Width>(), Err(Error::InvalidArgs));
        assert_eq!(Width::default(), Width::Word);
    }

    #[test]
    fn test_width_masks() {
        assert_eq!(Width::Byte.mask(), 0xff);
        assert_eq!(Width::Word.mask(), 0xffff_ffff);
        assert_eq!(Width::Double.mask(), u64::MAX);
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(0xab, Width::Byte), "0xAB");
        assert_eq!(format_value(0x5, Width::Half), "0x0005");
        assert_eq!(format_value(0xdead_beef_0000_0001, Width::Word), "0x00000001");
        assert_eq!(format_value(0xdead_beef, Width::Double), "0x00000000DEADBEEF");
    }

    #[test]
    fn test_format_bytes_msb_first() {
        assert_eq!(format_bytes(&[0x78, 0x56, 0x34, 0x12]), Ok("0x12345678".into()));
        assert_eq!(format_bytes(&[0x01]), Ok("0x01".into()));
        assert_eq!(
            format_bytes(&[1, 2, 3, 4, 5, 6, 7, 8]),
            Ok("0x0807060504030201".into())
        );
        assert_eq!(format_bytes(&[1, 2, 3]), Err(Error::InvalidArgs));
    }

    #[test]
    fn test_parse_address() {
        assert_eq!(parse_address("0x1000"), Ok(0x1000));
        assert_eq!(parse_address("0X1f"), Ok(0x1f));
        assert_eq!(parse_address("ffffffff"), Ok(u32::MAX));
        assert_eq!(parse_address("100000000"), Err(Error::InvalidArgs));
        assert_eq!(parse_address("zz"), Err(Error::InvalidArgs));
        assert_eq!(parse_address(""), Err(Error::InvalidArgs));
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_probe_short_read() {
        let mut dev = std::io::Cursor::new(vec![1u8, 2, 3]);
        assert_eq!(probe(&mut dev, 0, Width::Half), Ok(0x0201));
        assert_eq!(probe(&mut dev, 2, Width::Word), Err(Error::ShortRead));
    }
}

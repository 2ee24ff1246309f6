// Copyright 2025 The Rustux Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Driver Error Codes
//!
//! Status codes returned by the register bus, the translator, the seek
//! manager and the device glue. Every code maps onto the errno a character
//! device would hand back to userspace.

use core::fmt;

/// Result type for driver operations
pub type Result<T = ()> = core::result::Result<T, Error>;

// errno values used by the mapping below
const EIO: i32 = 5;
const EBUSY: i32 = 16;
const EEXIST: i32 = 17;
const ENODEV: i32 = 19;
const EINVAL: i32 = 22;
const EROFS: i32 = 30;

/// Driver error codes
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The register access primitive cannot be reached
    DeviceUnavailable = -1,

    /// A seek computed a cursor outside the 32-bit address space
    InvalidSeek = -2,

    /// Fewer bytes were produced than requested
    ShortRead = -3,

    /// Malformed argument
    InvalidArgs = -4,

    /// Write access to a read-only device
    NotSupported = -5,

    /// Name already registered
    AlreadyExists = -6,

    /// Major number unavailable
    Busy = -7,
}

impl Error {
    /// Convert a raw status code to an error
    ///
    /// Unknown codes collapse to `DeviceUnavailable`.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            -1 => Error::DeviceUnavailable,
            -2 => Error::InvalidSeek,
            -3 => Error::ShortRead,
            -4 => Error::InvalidArgs,
            -5 => Error::NotSupported,
            -6 => Error::AlreadyExists,
            -7 => Error::Busy,
            _ => Error::DeviceUnavailable,
        }
    }

    /// Convert to raw status code
    pub fn into_raw(self) -> i32 {
        self as i32
    }

    /// Positive errno a file operation would return for this error
    pub fn to_errno(self) -> i32 {
        match self {
            Error::DeviceUnavailable => ENODEV,
            Error::InvalidSeek | Error::InvalidArgs => EINVAL,
            Error::ShortRead => EIO,
            Error::NotSupported => EROFS,
            Error::AlreadyExists => EEXIST,
            Error::Busy => EBUSY,
        }
    }

    /// Map an errno (sign ignored) back to an error
    ///
    /// `EINVAL` is ambiguous between a bad seek and a bad argument; it maps
    /// to `InvalidSeek` because `lseek` is the only call on the device that
    /// reports it.
    pub fn from_errno(errno: i32) -> Self {
        match errno.abs() {
            ENODEV => Error::DeviceUnavailable,
            EINVAL => Error::InvalidSeek,
            EIO => Error::ShortRead,
            EROFS => Error::NotSupported,
            EEXIST => Error::AlreadyExists,
            EBUSY => Error::Busy,
            _ => Error::DeviceUnavailable,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::DeviceUnavailable => write!(f, "IOCSR device unavailable"),
            Error::InvalidSeek => write!(f, "Seek outside the IOCSR address space"),
            Error::ShortRead => write!(f, "Short read"),
            Error::InvalidArgs => write!(f, "Invalid arguments"),
            Error::NotSupported => write!(f, "Device is read-only"),
            Error::AlreadyExists => write!(f, "Already registered"),
            Error::Busy => write!(f, "Major number busy"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl From<Error> for std::io::Error {
    fn from(err: Error) -> Self {
        use std::io::ErrorKind;

        let kind = match err {
            Error::DeviceUnavailable => ErrorKind::NotFound,
            Error::InvalidSeek | Error::InvalidArgs => ErrorKind::InvalidInput,
            Error::ShortRead => ErrorKind::UnexpectedEof,
            Error::NotSupported => ErrorKind::Unsupported,
            Error::AlreadyExists => ErrorKind::AlreadyExists,
            Error::Busy => ErrorKind::Other,
        };
        std::io::Error::new(kind, err)
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        use std::io::ErrorKind;

        // An Error wrapped in an io::Error comes back unchanged
        if let Some(inner) = err.get_ref().and_then(|e| e.downcast_ref::<Error>()) {
            return *inner;
        }
        if let Some(errno) = err.raw_os_error() {
            return Error::from_errno(errno);
        }
        match err.kind() {
            ErrorKind::UnexpectedEof => Error::ShortRead,
            ErrorKind::InvalidInput => Error::InvalidArgs,
            ErrorKind::Unsupported => Error::NotSupported,
            _ => Error::DeviceUnavailable,
        }
    }
}

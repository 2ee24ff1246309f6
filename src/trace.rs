// Copyright 2025 The Rustux Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Driver Trace and Logging Support
//!
//! Thin wrappers over the `log` facade. With the `log` feature disabled
//! the arguments are still type-checked but nothing is emitted.

/// Per-access trace (register address and value)
macro_rules! LTRACEF {
    ($($arg:tt)*) => {
        #[cfg(feature = "log")]
        {
            ::log::trace!(target: "iocsr", $($arg)*);
        }
        #[cfg(not(feature = "log"))]
        {
            let _ = format_args!($($arg)*);
        }
    };
}

/// Cursor and plan level diagnostics
macro_rules! LDEBUGF {
    ($($arg:tt)*) => {
        #[cfg(feature = "log")]
        {
            ::log::debug!(target: "iocsr", $($arg)*);
        }
        #[cfg(not(feature = "log"))]
        {
            let _ = format_args!($($arg)*);
        }
    };
}

/// Lifecycle events (load, unload, registration)
macro_rules! LINFOF {
    ($($arg:tt)*) => {
        #[cfg(feature = "log")]
        {
            ::log::info!(target: "iocsr", $($arg)*);
        }
        #[cfg(not(feature = "log"))]
        {
            let _ = format_args!($($arg)*);
        }
    };
}

/// Failures surfaced to the caller
macro_rules! LWARNF {
    ($($arg:tt)*) => {
        #[cfg(feature = "log")]
        {
            ::log::warn!(target: "iocsr", $($arg)*);
        }
        #[cfg(not(feature = "log"))]
        {
            let _ = format_args!($($arg)*);
        }
    };
}

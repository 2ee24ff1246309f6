// Copyright 2025 The Rustux Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Character Device Registration
//!
//! Major numbers are handed out either on request or dynamically, from the
//! same ranges Linux uses: 254 down to 234, then 511 down to 384.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use core::ops::RangeInclusive;
use spin::Mutex;

use super::MAX_MAJOR;
use crate::err::{Error, Result};

/// Ranges searched (highest first) for a dynamic major
const DYNAMIC_MAJORS: [RangeInclusive<u32>; 2] = [234..=254, 384..=511];

/// Registered character devices, keyed by major
pub struct ChrdevTable {
    majors: Mutex<BTreeMap<u32, String>>,
}

impl ChrdevTable {
    /// Create an empty table
    pub const fn new() -> Self {
        Self {
            majors: Mutex::new(BTreeMap::new()),
        }
    }

    /// Register a character device
    ///
    /// # Arguments
    ///
    /// * `major` - Fixed major number, or `None` to allocate one
    /// * `name` - Driver name recorded against the major
    ///
    /// # Returns
    ///
    /// A guard that unregisters the major when dropped. Fails with `Busy`
    /// if the major is taken or no dynamic major is free.
    pub fn register(&self, major: Option<u32>, name: &str) -> Result<ChrdevRegistration<'_>> {
        let mut majors = self.majors.lock();

        let major = match major {
            Some(major) if major == 0 || major > MAX_MAJOR => return Err(Error::InvalidArgs),
            Some(major) if majors.contains_key(&major) => return Err(Error::Busy),
            Some(major) => major,
            None => DYNAMIC_MAJORS
                .iter()
                .flat_map(|range| range.clone().rev())
                .find(|candidate| !majors.contains_key(candidate))
                .ok_or(Error::Busy)?,
        };

        majors.insert(major, name.to_string());
        LINFOF!("chrdev {} registered with major {}", name, major);
        Ok(ChrdevRegistration { table: self, major })
    }

    /// Name registered against a major
    pub fn lookup(&self, major: u32) -> Option<String> {
        self.majors.lock().get(&major).cloned()
    }

    /// Number of registered majors
    pub fn len(&self) -> usize {
        self.majors.lock().len()
    }

    /// Check whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn unregister(&self, major: u32) {
        if let Some(name) = self.majors.lock().remove(&major) {
            LINFOF!("chrdev {} unregistered (major {})", name, major);
        }
    }
}

impl Default for ChrdevTable {
    fn default() -> Self {
        Self::new()
    }
}

/// A registered major number, released on drop
#[must_use = "dropping the registration releases the major"]
pub struct ChrdevRegistration<'t> {
    table: &'t ChrdevTable,
    major: u32,
}

impl ChrdevRegistration<'_> {
    /// Registered major number
    pub fn major(&self) -> u32 {
        self.major
    }
}

impl Drop for ChrdevRegistration<'_> {
    fn drop(&mut self) {
        self.table.unregister(self.major);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dynamic_majors_count_down() {
        let table = ChrdevTable::new();
        let first = table.register(None, "a").unwrap();
        let second = table.register(None, "b").unwrap();
        assert_eq!(first.major(), 254);
        assert_eq!(second.major(), 253);
        assert_eq!(table.lookup(254).as_deref(), Some("a"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_fixed_major() {
        let table = ChrdevTable::new();
        let reg = table.register(Some(10), "misc").unwrap();
        assert_eq!(reg.major(), 10);
        assert_eq!(table.register(Some(10), "other").err(), Some(Error::Busy));
        assert_eq!(table.register(Some(0), "zero").err(), Some(Error::InvalidArgs));
        assert_eq!(table.register(Some(4096), "big").err(), Some(Error::InvalidArgs));
    }

    #[test]
    fn test_drop_releases_major() {
        let table = ChrdevTable::new();
        {
            let _reg = table.register(None, "iocsr").unwrap();
            assert!(!table.is_empty());
        }
        assert!(table.is_empty());
        assert_eq!(table.register(None, "iocsr").unwrap().major(), 254);
    }

    #[test]
    fn test_dynamic_range_exhaustion() {
        let table = ChrdevTable::new();
        let mut held = alloc::vec::Vec::new();
        // 21 low majors plus 128 extended ones
        for _ in 0..(21 + 128) {
            held.push(table.register(None, "x").unwrap());
        }
        assert_eq!(held[20].major(), 234);
        assert_eq!(held[21].major(), 511);
        assert_eq!(held.last().map(|r| r.major()), Some(384));
        assert_eq!(table.register(None, "x").err(), Some(Error::Busy));
    }
}

// Copyright 2025 The Rustux Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Register Access Module
//!
//! The IOCSR space is read one aligned 64-bit register at a time. This
//! module owns that primitive ([`RegisterBus`]), its native LoongArch
//! implementation, a simulated register file for hosts without IOCSR, and
//! the explicit byte decomposition the translator splices with.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::sync::Arc;
use alloc::vec::Vec;
use spin::Mutex;

use crate::err::{Error, Result};

/// Width of one register in bytes
pub const REGISTER_SIZE: u32 = 8;

/// Check that an address names the start of a register
#[inline]
pub const fn is_aligned(addr: u64) -> bool {
    addr % REGISTER_SIZE as u64 == 0
}

/// Round an address down to the start of its register
#[inline]
pub const fn align_down(addr: u64) -> u64 {
    addr & !(REGISTER_SIZE as u64 - 1)
}

/// Split a register value into its 8 bytes, lowest address first
///
/// Byte `i` of the result is the byte found at `register + i` in the
/// stream. The order is fixed little-endian regardless of the host.
#[inline]
pub const fn register_bytes(value: u64) -> [u8; 8] {
    value.to_le_bytes()
}

/// Reassemble a register value from its bytes, lowest address first
///
/// Inverse of [`register_bytes`].
#[inline]
pub const fn register_value(bytes: [u8; 8]) -> u64 {
    u64::from_le_bytes(bytes)
}

// ============================================================================
// Register Bus
// ============================================================================

/// One aligned 64-bit read of the register space
///
/// Implementations may assume `aligned % 8 == 0`; the translator never asks
/// for anything else.
pub trait RegisterBus {
    /// Read the register starting at `aligned`
    fn read_u64(&self, aligned: u32) -> Result<u64>;
}

impl<T: RegisterBus + ?Sized> RegisterBus for &T {
    #[inline]
    fn read_u64(&self, aligned: u32) -> Result<u64> {
        (**self).read_u64(aligned)
    }
}

impl<T: RegisterBus + ?Sized> RegisterBus for Arc<T> {
    #[inline]
    fn read_u64(&self, aligned: u32) -> Result<u64> {
        (**self).read_u64(aligned)
    }
}

// ============================================================================
// Native Access
// ============================================================================

/// Native IOCSR access through `iocsrrd.d`
#[derive(Debug)]
pub struct NativeBus {
    _private: (),
}

impl NativeBus {
    /// Get a handle to the native register space
    ///
    /// Fails with `DeviceUnavailable` on anything but LoongArch64.
    ///
    /// # Safety
    ///
    /// `iocsrrd.d` is privileged. The caller must be running at PLV0, or
    /// every read through the returned bus will fault.
    pub unsafe fn probe() -> Result<Self> {
        if cfg!(target_arch = "loongarch64") {
            LINFOF!("native IOCSR bus available");
            Ok(Self { _private: () })
        } else {
            LWARNF!("no native IOCSR bus on this architecture");
            Err(Error::DeviceUnavailable)
        }
    }
}

impl RegisterBus for NativeBus {
    #[inline]
    fn read_u64(&self, aligned: u32) -> Result<u64> {
        debug_assert!(is_aligned(aligned as u64));
        read_reg64(aligned)
    }
}

/// Read a 64-bit IOCSR
#[cfg(target_arch = "loongarch64")]
#[inline]
fn read_reg64(addr: u32) -> Result<u64> {
    let value: u64;
    // A NativeBus only exists after probe() at PLV0
    unsafe {
        core::arch::asm!(
            "iocsrrd.d {0}, {1}",
            out(reg) value,
            in(reg) addr as u64,
            options(nostack, preserves_flags)
        );
    }
    Ok(value)
}

#[cfg(not(target_arch = "loongarch64"))]
#[inline]
fn read_reg64(_addr: u32) -> Result<u64> {
    Err(Error::DeviceUnavailable)
}

// ============================================================================
// Simulated Register File
// ============================================================================

/// In-memory register bank
///
/// Stands in for the hardware on hosts without IOCSR. Registers that were
/// never set read as zero, or as the fill function's value when one is
/// installed. Every access is logged, and individual registers can be made
/// to fail with `DeviceUnavailable`.
pub struct RegisterFile {
    inner: Mutex<RegisterFileInner>,
}

struct RegisterFileInner {
    /// Explicitly set registers
    regs: BTreeMap<u32, u64>,

    /// Value of registers that were never set
    fill: Option<fn(u32) -> u64>,

    /// Registers whose reads fail
    faults: BTreeSet<u32>,

    /// Aligned addresses read so far, in order
    accesses: Vec<u32>,
}

impl RegisterFile {
    /// Create an all-zero register file
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(RegisterFileInner {
                regs: BTreeMap::new(),
                fill: None,
                faults: BTreeSet::new(),
                accesses: Vec::new(),
            }),
        }
    }

    /// Create a register file whose unset registers read as `fill(address)`
    pub fn from_fn(fill: fn(u32) -> u64) -> Self {
        let file = Self::new();
        file.inner.lock().fill = Some(fill);
        file
    }

    /// Set one register
    pub fn set(&self, aligned: u32, value: u64) -> Result {
        if !is_aligned(aligned as u64) {
            return Err(Error::InvalidArgs);
        }
        self.inner.lock().regs.insert(aligned, value);
        Ok(())
    }

    /// Store bytes at an arbitrary offset, patching the registers they cover
    pub fn set_bytes(&self, offset: u32, bytes: &[u8]) -> Result {
        let mut inner = self.inner.lock();
        for (i, &byte) in bytes.iter().enumerate() {
            let addr = (offset as u64)
                .checked_add(i as u64)
                .filter(|a| *a <= u32::MAX as u64)
                .ok_or(Error::InvalidArgs)?;
            let register = align_down(addr) as u32;
            let current = inner.value_of(register);
            let mut lanes = register_bytes(current);
            lanes[(addr - register as u64) as usize] = byte;
            inner.regs.insert(register, register_value(lanes));
        }
        Ok(())
    }

    /// Make reads of one register fail with `DeviceUnavailable`
    pub fn fail_at(&self, aligned: u32) {
        self.inner.lock().faults.insert(aligned);
    }

    /// Remove every injected fault
    pub fn clear_faults(&self) {
        self.inner.lock().faults.clear();
    }

    /// Aligned addresses read so far, oldest first
    pub fn accesses(&self) -> Vec<u32> {
        self.inner.lock().accesses.clone()
    }

    /// Forget the access log
    pub fn clear_accesses(&self) {
        self.inner.lock().accesses.clear();
    }
}

impl RegisterFileInner {
    fn value_of(&self, aligned: u32) -> u64 {
        match self.regs.get(&aligned) {
            Some(value) => *value,
            None => self.fill.map_or(0, |fill| fill(aligned)),
        }
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterBus for RegisterFile {
    fn read_u64(&self, aligned: u32) -> Result<u64> {
        if !is_aligned(aligned as u64) {
            return Err(Error::InvalidArgs);
        }

        let mut inner = self.inner.lock();
        inner.accesses.push(aligned);
        if inner.faults.contains(&aligned) {
            return Err(Error::DeviceUnavailable);
        }
        Ok(inner.value_of(aligned))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_bytes_order() {
        let bytes = register_bytes(0x0807_0605_0403_0201);
        assert_eq!(bytes, [1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(register_value(bytes), 0x0807_0605_0403_0201);
    }

    #[test]
    fn test_alignment_helpers() {
        assert!(is_aligned(0));
        assert!(is_aligned(0x18));
        assert!(!is_aligned(0x1f));
        assert_eq!(align_down(0x1f), 0x18);
        assert_eq!(align_down(7), 0);
    }

    #[test]
    fn test_register_file_defaults_to_zero() {
        let regs = RegisterFile::new();
        assert_eq!(regs.read_u64(0x40), Ok(0));
        assert_eq!(regs.accesses(), [0x40]);
    }

    #[test]
    fn test_register_file_fill_and_set() {
        let regs = RegisterFile::from_fn(|addr| addr as u64 * 3);
        assert_eq!(regs.read_u64(0x10), Ok(0x30));
        regs.set(0x10, 7).unwrap();
        assert_eq!(regs.read_u64(0x10), Ok(7));
        assert_eq!(regs.set(0x11, 7), Err(Error::InvalidArgs));
    }

    #[test]
    fn test_register_file_rejects_unaligned_read() {
        let regs = RegisterFile::new();
        assert_eq!(regs.read_u64(4), Err(Error::InvalidArgs));
    }

    #[test]
    fn test_set_bytes_patches_registers() {
        let regs = RegisterFile::new();
        regs.set(0, 0xffff_ffff_ffff_ffff).unwrap();
        regs.set_bytes(6, &[0xaa, 0xbb, 0xcc]).unwrap();
        assert_eq!(regs.read_u64(0), Ok(0xbbaa_ffff_ffff_ffff));
        assert_eq!(regs.read_u64(8), Ok(0xcc));
        assert_eq!(regs.set_bytes(u32::MAX, &[1, 2]), Err(Error::InvalidArgs));
    }

    #[test]
    fn test_fault_injection() {
        let regs = RegisterFile::new();
        regs.fail_at(0x8);
        assert_eq!(regs.read_u64(0x8), Err(Error::DeviceUnavailable));
        regs.clear_faults();
        assert_eq!(regs.read_u64(0x8), Ok(0));
        assert_eq!(regs.accesses(), [0x8, 0x8]);
        regs.clear_accesses();
        assert!(regs.accesses().is_empty());
    }

    #[test]
    fn test_native_bus_elsewhere() {
        #[cfg(not(target_arch = "loongarch64"))]
        assert_eq!(unsafe { NativeBus::probe() }.err(), Some(Error::DeviceUnavailable));
    }
}

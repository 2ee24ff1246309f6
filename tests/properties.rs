// Copyright 2025 The Rustux Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Stream properties of the translator and seek manager, checked against a
//! simulated register file with distinct contents per register.

use iocsr::{register_bytes, Error, ReadPlan, RegisterFile, Session, Whence, SPACE_END};
use proptest::prelude::*;

fn scrambled(addr: u32) -> u64 {
    (addr as u64 ^ 0x5a5a_5a5a).wrapping_mul(0x9e37_79b9_7f4a_7c15)
}

fn regs() -> RegisterFile {
    RegisterFile::from_fn(scrambled)
}

fn read_at(regs: &RegisterFile, cursor: u32, count: usize) -> Vec<u8> {
    let mut session = Session::new(regs, u32::MAX);
    session.seek(cursor as i64, Whence::Set).unwrap();
    session.read_vec(count).unwrap()
}

proptest! {
    #[test]
    fn reread_after_seek_is_identical(cursor in 0u32..0xffff_0000, count in 1usize..256) {
        let regs = regs();
        let mut session = Session::new(&regs, u32::MAX);
        session.seek(cursor as i64, Whence::Set).unwrap();

        let first = session.read_vec(count).unwrap();
        session.seek(cursor as i64, Whence::Set).unwrap();
        let second = session.read_vec(count).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn split_reads_concatenate(cursor in 0u32..0xffff_0000, a in 0usize..96, b in 0usize..96) {
        let regs = regs();
        let whole = read_at(&regs, cursor, a + b);

        let mut session = Session::new(&regs, u32::MAX);
        session.seek(cursor as i64, Whence::Set).unwrap();
        let mut pieces = session.read_vec(a).unwrap();
        pieces.extend(session.read_vec(b).unwrap());
        prop_assert_eq!(whole, pieces);
    }

    #[test]
    fn cursor_advances_by_count(cursor in 0u32..0xffff_0000, count in 0usize..256) {
        let regs = regs();
        let mut session = Session::new(&regs, u32::MAX);
        session.seek(cursor as i64, Whence::Set).unwrap();
        let bytes = session.read_vec(count).unwrap();
        prop_assert_eq!(bytes.len(), count);
        prop_assert_eq!(session.position(), cursor as u64 + count as u64);
    }

    #[test]
    fn seek_round_trip(target in 0u64..=SPACE_END) {
        let regs = regs();
        let mut session = Session::new(&regs, u32::MAX);
        prop_assert_eq!(session.seek(target as i64, Whence::Set), Ok(target));
        prop_assert_eq!(session.read(&mut []), Ok(0));
        prop_assert_eq!(session.position(), target);
        prop_assert!(regs.accesses().is_empty());
    }

    #[test]
    fn bytes_match_their_registers(cursor in 0u32..0xffff_0000, count in 1usize..64) {
        let regs = regs();
        let bytes = read_at(&regs, cursor, count);
        for (i, byte) in bytes.iter().enumerate() {
            let addr = cursor as u64 + i as u64;
            let lanes = register_bytes(scrambled((addr & !7) as u32));
            prop_assert_eq!(*byte, lanes[(addr % 8) as usize]);
        }
    }

    #[test]
    fn every_access_is_aligned_and_planned(cursor in 0u32..0xffff_0000, count in 0usize..256) {
        let regs = regs();
        read_at(&regs, cursor, count);

        let accesses = regs.accesses();
        let planned: Vec<u32> = ReadPlan::new(cursor as u64, count).map(|c| c.register).collect();
        prop_assert!(accesses.iter().all(|a| a % 8 == 0));
        prop_assert_eq!(accesses, planned);
    }

    #[test]
    fn out_of_range_seek_keeps_cursor(start in 0u32..0x1000, back in 1i64..0x10000) {
        let regs = regs();
        let mut session = Session::new(&regs, u32::MAX);
        session.seek(start as i64, Whence::Set).unwrap();
        let offset = -(start as i64) - back;
        prop_assert_eq!(session.seek(offset, Whence::Cur), Err(Error::InvalidSeek));
        prop_assert_eq!(session.position(), start as u64);
    }
}

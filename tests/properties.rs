//! Property-based tests for the combiner and the crib dragger.

use cribdrag::xor::attack::{crib_drag, is_printable};
use cribdrag::xor::combine;
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_combine_is_bytewise_xor(a in prop::collection::vec(any::<u8>(), 0..64),
                                    b in prop::collection::vec(any::<u8>(), 0..64)) {
        let combined = combine(&a, &b);
        prop_assert_eq!(combined.len(), a.len().min(b.len()));
        for (i, byte) in combined.iter().enumerate() {
            prop_assert_eq!(*byte, a[i] ^ b[i]);
        }
    }

    #[test]
    fn prop_combine_is_symmetric(a in prop::collection::vec(any::<u8>(), 0..64),
                                 b in prop::collection::vec(any::<u8>(), 0..64)) {
        prop_assert_eq!(combine(&a, &b), combine(&b, &a));
    }

    #[test]
    fn prop_combine_is_self_inverse(a in prop::collection::vec(any::<u8>(), 0..64),
                                    b in prop::collection::vec(any::<u8>(), 0..64)) {
        let n = a.len().min(b.len());
        prop_assert_eq!(combine(&combine(&a, &b), &b), a[..n].to_vec());
    }

    #[test]
    fn prop_crib_drag_offsets_ascending_and_printable(buf in prop::collection::vec(any::<u8>(), 0..128),
                                                      crib in prop::collection::vec(any::<u8>(), 1..8)) {
        let matches = crib_drag(&buf, &crib).unwrap();
        if crib.len() > buf.len() {
            prop_assert!(matches.is_empty());
        } else {
            prop_assert!(matches.len() <= buf.len() - crib.len() + 1);
        }
        prop_assert!(matches.windows(2).all(|w| w[0].offset < w[1].offset));
        for m in &matches {
            prop_assert!(m.text.bytes().all(is_printable));
            let expected = combine(&buf[m.offset..m.offset + crib.len()], &crib);
            prop_assert_eq!(m.text.as_bytes(), expected.as_slice());
        }
    }

    #[test]
    fn prop_crib_drag_tests_every_offset(len in 1usize..128, crib in "[ -~]{1,8}") {
        // A zero buffer returns the printable crib at every offset
        let buf = vec![0u8; len];
        let matches = crib_drag(&buf, crib.as_bytes()).unwrap();
        let expected = (len + 1).saturating_sub(crib.len());
        prop_assert_eq!(matches.len(), expected);
        prop_assert!(matches.iter().enumerate().all(|(i, m)| m.offset == i && m.text == crib));
    }

    #[test]
    fn prop_known_plaintext_reveals_partner(p1 in "[ -~]{1,64}", p2 in "[ -~]{1,64}",
                                            key in prop::collection::vec(any::<u8>(), 64)) {
        let c1 = combine(p1.as_bytes(), &key);
        let c2 = combine(p2.as_bytes(), &key);
        let c1_xor_c2 = combine(&c1, &c2);
        let n = c1_xor_c2.len();
        let matches = crib_drag(&c1_xor_c2, &p1.as_bytes()[..n]).unwrap();
        prop_assert_eq!(matches[0].offset, 0);
        prop_assert_eq!(matches[0].text.as_bytes(), &p2.as_bytes()[..n]);
    }
}

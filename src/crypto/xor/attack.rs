use snafu::ensure;

use crate::crypto::xor::combine;
use crate::util::{Error, InvalidCribSnafu};

/// A window of a combined sequence that decoded to printable text under a crib.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub offset: usize,
    pub text: String,
}

pub fn is_printable(b: u8) -> bool {
    (32..=126).contains(&b)
}

// Slides `crib` over every offset of `buf` in ascending order and keeps the
// windows whose XOR with the crib is entirely printable ASCII. Every hit is
// reported, repeated text included; nothing here judges plausibility.
pub fn crib_drag(buf: &[u8], crib: &[u8]) -> Result<Vec<Match>, Error> {
    ensure!(!crib.is_empty(), InvalidCribSnafu);
    if crib.len() > buf.len() {
        return Ok(Vec::new());
    }
    let matches = buf.windows(crib.len())
        .enumerate()
        .filter_map(|(offset, window)| {
            let candidate = combine(window, crib);
            if !candidate.iter().all(|&b| is_printable(b)) {
                return None;
            }
            // Printable ASCII is always valid UTF-8
            String::from_utf8(candidate).ok()
                .map(|text| Match { offset, text })
        })
        .collect();
    Ok(matches)
}

#[cfg(test)]
fn offsets(matches: &[Match]) -> Vec<usize> {
    matches.iter().map(|m| m.offset).collect()
}

#[test]
fn test_crib_drag_identity() {
    // Against an all-zero combination the crib comes back unchanged
    let c1 = hex!("414243");
    let c2 = hex!("414243");
    let combined = combine(&c1, &c2);
    assert_eq!(vec![0u8; 3], combined);
    let result = crib_drag(&combined, b"ABC").unwrap();
    assert_eq!(vec![Match { offset: 0, text: "ABC".to_string() }], result);
}

#[test]
fn test_crib_drag_tests_every_offset() {
    let buf = vec![0u8; 10];
    let result = crib_drag(&buf, b"abc").unwrap();
    assert_eq!((0..=7).collect::<Vec<usize>>(), offsets(&result));
    assert!(result.iter().all(|m| m.text == "abc"));

    let exact = crib_drag(&buf[..3], b"abc").unwrap();
    assert_eq!(vec![0], offsets(&exact));
}

#[test]
fn test_crib_drag_longer_than_buffer() {
    let buf = vec![0u8; 3];
    assert_eq!(Vec::<Match>::new(), crib_drag(&buf, b"abcd").unwrap());
    assert_eq!(Vec::<Match>::new(), crib_drag(&[], b"a").unwrap());
}

#[test]
fn test_crib_drag_rejects_empty_crib() {
    let buf = vec![0u8; 3];
    assert!(matches!(crib_drag(&buf, b""), Err(Error::InvalidCrib { .. })));
}

#[test]
fn test_crib_drag_filters_non_printable() {
    // 'A' ^ 0x41 = 0x00 at offset 2, 'A' ^ 0x5f = 0x1e and ' ' ^ 0x5f = 0x7f at offset 6
    let buf = hex!("0000410000005f00");
    let result = crib_drag(&buf, b"A").unwrap();
    assert_eq!(vec![0, 1, 3, 4, 5, 7], offsets(&result));

    let result_2 = crib_drag(&buf, b" ").unwrap();
    assert_eq!(vec![0, 1, 2, 3, 4, 5, 7], offsets(&result_2));
    assert_eq!("a", result_2[2].text);

    for m in result.iter().chain(result_2.iter()) {
        assert!(m.text.bytes().all(is_printable));
    }
}

#[test]
fn test_crib_drag_printable_bounds() {
    assert!(!is_printable(31));
    assert!(is_printable(32));
    assert!(is_printable(126));
    assert!(!is_printable(127));
    assert!(!is_printable(0xff));
}

#[test]
fn test_crib_drag_keeps_repeated_text() {
    let buf = vec![0u8; 4];
    let result = crib_drag(&buf, b"ab").unwrap();
    assert_eq!(3, result.len());
    assert!(result.iter().all(|m| m.text == "ab"));
    assert_eq!(vec![0, 1, 2], offsets(&result));
}

#[test]
fn test_crib_drag_recovers_other_plaintext() {
    let p1 = b"Now she lifts her pale forearms";
    let p2 = b"and thoroughly washes her face.";
    let key = crate::util::generate_random_bytes(p1.len());
    let c1 = combine(p1, &key);
    let c2 = combine(p2, &key);
    let c1_xor_c2 = combine(&c1, &c2);

    let result = crib_drag(&c1_xor_c2, p1).unwrap();
    assert_eq!(vec![Match { offset: 0, text: String::from_utf8(p2.to_vec()).unwrap() }], result);

    // A fragment of one plaintext at its true offset reveals the other
    let result_2 = crib_drag(&c1_xor_c2, b"forearms").unwrap();
    assert!(result_2.contains(&Match { offset: 23, text: "er face.".to_string() }));
}

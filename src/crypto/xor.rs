use itertools::Itertools;

use crate::store::{Ciphertext, CiphertextStore};

pub mod attack;

// Bytes past the end of the shorter buffer have no partner and are dropped
pub fn combine(buf1: &[u8], buf2: &[u8]) -> Vec<u8> {
    buf1.iter()
        .zip(buf2.iter())
        .map(|(x,y)| x ^ y)
        .collect()
}

#[test]
fn test_combine() {
    let case_buf1 = hex!("1c0111001f010100061a024b53535009181c");
    let case_buf2 = hex!("686974207468652062756c6c277320657965");
    let expected = hex!("746865206b696420646f6e277420706c6179");
    let result = combine(&case_buf1, &case_buf2);
    assert_eq!(result, expected);
}

#[test]
fn test_combine_truncates_to_shorter() {
    let long = hex!("ffffffffff");
    let short = hex!("0f0f");
    assert_eq!(vec![0xf0, 0xf0], combine(&long, &short));
    assert_eq!(vec![0xf0, 0xf0], combine(&short, &long));
    assert!(combine(&long, &[]).is_empty());
}

#[test]
fn test_combine_cancels_shared_keystream() {
    let p1 = b"attack at dawn";
    let p2 = b"defend at dusk";
    let key = crate::util::generate_random_bytes(p1.len());
    let c1 = combine(p1, &key);
    let c2 = combine(p2, &key);
    assert_eq!(combine(p1, p2), combine(&c1, &c2));
}

/// The XOR of two ciphertexts, named after the pair that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combination {
    pub left: String,
    pub right: String,
    pub bytes: Vec<u8>,
}

impl Combination {
    pub fn new(left: &Ciphertext, right: &Ciphertext) -> Self {
        if left.bytes.len() != right.bytes.len() {
            tracing::debug!(
                left = %left.name,
                right = %right.name,
                left_len = left.bytes.len(),
                right_len = right.bytes.len(),
                "ciphertext lengths differ, truncating combination"
            );
        }
        Self {
            left: left.name.clone(),
            right: right.name.clone(),
            bytes: combine(&left.bytes, &right.bytes),
        }
    }

    pub fn label(&self) -> String {
        format!("{}_XOR_{}", self.left, self.right)
    }
}

// Every unordered pair, ordered by the store index of the left then the right
// member: (0,1), (0,2), ..., (1,2), ...
pub fn pairwise_combinations(store: &CiphertextStore) -> Vec<Combination> {
    store.iter()
        .tuple_combinations()
        .map(|(a, b)| Combination::new(a, b))
        .collect()
}

#[cfg(test)]
use crate::store::Encoding;

#[test]
fn test_pairwise_combinations() {
    let store = CiphertextStore::load([("C1", "414243"), ("C2", "414243"), ("C3", "000102")], Encoding::Hex).unwrap();
    let combinations = pairwise_combinations(&store);
    let labels: Vec<String> = combinations.iter().map(|c| c.label()).collect();
    assert_eq!(vec!["C1_XOR_C2", "C1_XOR_C3", "C2_XOR_C3"], labels);
    assert_eq!(vec![0u8; 3], combinations[0].bytes);
    assert_eq!(b"ACA".to_vec(), combinations[1].bytes);
    assert_eq!(combinations[1].bytes, combinations[2].bytes);
}

#[test]
fn test_pairwise_combinations_count() {
    let store = CiphertextStore::load(
        [("a", "01"), ("b", "02"), ("c", "0304"), ("d", "05")],
        Encoding::Hex,
    ).unwrap();
    let combinations = pairwise_combinations(&store);
    let labels: Vec<String> = combinations.iter().map(|c| c.label()).collect();
    assert_eq!(
        vec!["a_XOR_b", "a_XOR_c", "a_XOR_d", "b_XOR_c", "b_XOR_d", "c_XOR_d"],
        labels,
    );
    // c is two bytes long but every partner is one byte
    assert!(combinations.iter().all(|c| c.bytes.len() == 1));
}

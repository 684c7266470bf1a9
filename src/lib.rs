#[cfg(test)]
#[macro_use] extern crate hex_literal;

mod util;
mod crypto;
pub mod store;
pub mod scenario;
pub mod report;
pub mod pipeline;

pub use util::*;
pub use crypto::*;
pub use store::{Ciphertext, CiphertextStore, Encoding};
pub use scenario::{CribEntry, Scenario};
pub use pipeline::{Pipeline, RunSummary};

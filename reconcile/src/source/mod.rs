//! Input sources for one dataset.
//!
//! - **Raw store** ([`ntriples`]): the ground-truth N-Triples file
//! - **Encoded tables** ([`encoded`]): entity-ID table and per-split edge tables

pub mod encoded;
pub mod ntriples;

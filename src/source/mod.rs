//! Upstream data source
//!
//! Everything the core needs from the outside world goes through one
//! capability: fetch a named resource, get a JSON payload back or a
//! [`FetchError`](crate::error::FetchError).
//!
//! ```text
//! Fetcher (trait) ── HttpFetcher   reqwest + bearer token + timeout
//!                 └─ MemoryFetcher scripted payloads for tests and demos
//!     ↓
//! records: typed decoding of numbers / users / posts / comments
//! ```

pub mod fetcher;
pub mod memory;
pub mod records;

pub use fetcher::{Fetcher, HttpFetcher};
pub use memory::MemoryFetcher;
pub use records::{Post, User};

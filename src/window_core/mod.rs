//! Window Core - Deduplicating Number Windows
//!
//! Keeps one fixed-capacity, insertion-ordered set of numbers per category
//! and reports what each request changed.
//!
//! # Architecture
//!
//! ```text
//! GET /numbers/:category → Category (p | f | e | r)
//!     ↓
//! NumberAggregator → Fetcher (bounded timeout, failure = no new numbers)
//!     ↓
//! WindowStore::merge (dedup, FIFO eviction, pre/post snapshots)
//!     ↓
//! NumbersResponse { windowPrevState, windowCurrState, numbers, avg }
//! ```

pub mod category;
pub mod numbers;
pub mod store;

pub use category::Category;
pub use numbers::{NumberAggregator, NumbersResponse};
pub use store::{WindowStore, WindowUpdate};

//! Rank Core - Social Analytics Rankings
//!
//! Derives small top-N rankings from the upstream social API and memoises
//! them for a fixed TTL.
//!
//! # Architecture
//!
//! ```text
//! GET /users            GET /posts?type=popular|latest
//!     ↓                     ↓
//! RankEngine ── RankCache (topUsers, posts_popular, posts_latest)
//!     ↓ miss
//! users → per-user posts (concurrent fan-out)
//!     ↓                     ↓ popular only
//! sort by post count      per-post comment counts (concurrent fan-out)
//!     ↓                     ↓
//! top 5 (stable)          max-tie filter, first 5 / id-desc, first 5
//! ```

pub mod cache;
pub mod engine;
pub mod query;

pub use cache::RankCache;
pub use engine::{RankEngine, RankedPost, RankedResult, RankedUser, Ranking, TOP_N};
pub use query::{PostQuery, TOP_USERS_KEY};

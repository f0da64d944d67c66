//! Ranking computations over freshly fetched social data

use super::cache::RankCache;
use super::query::{PostQuery, TOP_USERS_KEY};
use crate::error::AggregatorResult;
use crate::source::records::{fetch_comment_count, fetch_user_posts, fetch_users};
use crate::source::{Fetcher, Post};
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Maximum number of entries in any ranking
pub const TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedUser {
    pub user_id: String,
    pub user_name: String,
    pub post_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedPost {
    #[serde(flatten)]
    pub post: Post,
    /// Only populated for `popular` rankings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Ranking {
    Users(Vec<RankedUser>),
    Posts(Vec<RankedPost>),
}

/// A computed ranking together with the cache slot it lives in
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedResult {
    pub key: String,
    pub expires_at: DateTime<Utc>,
    pub entries: Ranking,
}

impl RankedResult {
    fn new(key: String, entries: Ranking, ttl: Duration) -> Self {
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            key,
            expires_at,
            entries,
        }
    }
}

/// Top-N rankings of users and posts, memoised in a [`RankCache`]
///
/// Fan-out fetches run concurrently and are all-or-nothing: a single failed
/// sub-fetch aborts the computation and leaves the cache untouched.
pub struct RankEngine {
    fetcher: Arc<dyn Fetcher>,
    cache: RankCache<RankedResult>,
}

impl RankEngine {
    pub fn new(fetcher: Arc<dyn Fetcher>, cache_ttl: Duration) -> Self {
        Self {
            fetcher,
            cache: RankCache::new(cache_ttl),
        }
    }

    pub fn cache(&self) -> &RankCache<RankedResult> {
        &self.cache
    }

    /// Users with the most posts, ties kept in upstream order
    pub async fn top_users(&self) -> AggregatorResult<RankedResult> {
        if let Some(hit) = self.cache.get(TOP_USERS_KEY) {
            log::debug!("📦 cache hit: {}", TOP_USERS_KEY);
            return Ok(hit);
        }

        let ranked = self.compute_top_users().await.map_err(|e| {
            log::warn!("❌ Failed to rank top users: {}", e);
            e
        })?;

        let result = RankedResult::new(
            TOP_USERS_KEY.to_string(),
            Ranking::Users(ranked),
            self.cache.ttl(),
        );
        self.cache.set(TOP_USERS_KEY, result.clone());
        Ok(result)
    }

    /// Rank posts for a raw `type` parameter
    ///
    /// Unknown types are rejected before anything is fetched.
    pub async fn posts(&self, query: &str) -> AggregatorResult<RankedResult> {
        let query: PostQuery = query.parse()?;
        self.posts_for(query).await
    }

    pub async fn posts_for(&self, query: PostQuery) -> AggregatorResult<RankedResult> {
        let key = query.cache_key();
        if let Some(hit) = self.cache.get(&key) {
            log::debug!("📦 cache hit: {}", key);
            return Ok(hit);
        }

        let ranked = self.compute_posts(query).await.map_err(|e| {
            log::warn!("❌ Failed to rank {} posts: {}", query, e);
            e
        })?;

        let result = RankedResult::new(key.clone(), Ranking::Posts(ranked), self.cache.ttl());
        self.cache.set(&key, result.clone());
        Ok(result)
    }

    async fn compute_top_users(&self) -> AggregatorResult<Vec<RankedUser>> {
        let fetcher = self.fetcher.as_ref();
        let users = fetch_users(fetcher).await?;

        let post_counts = try_join_all(users.iter().map(|user| async move {
            fetch_user_posts(fetcher, &user.id).await.map(|posts| posts.len())
        }))
        .await?;

        let mut ranked: Vec<RankedUser> = users
            .into_iter()
            .zip(post_counts)
            .map(|(user, post_count)| RankedUser {
                user_id: user.id,
                user_name: user.name,
                post_count,
            })
            .collect();

        // Stable: equal counts keep upstream order
        ranked.sort_by(|a, b| b.post_count.cmp(&a.post_count));
        ranked.truncate(TOP_N);

        log::debug!("🏆 ranked {} users", ranked.len());
        Ok(ranked)
    }

    async fn compute_posts(&self, query: PostQuery) -> AggregatorResult<Vec<RankedPost>> {
        let posts = self.fetch_all_posts().await?;

        let ranked = match query {
            PostQuery::Popular => {
                let fetcher = self.fetcher.as_ref();
                let comment_counts =
                    try_join_all(posts.iter().map(|post| fetch_comment_count(fetcher, post.id)))
                        .await?;
                most_commented(posts, comment_counts)
            }
            PostQuery::Latest => latest(posts),
        };

        log::debug!("🏆 ranked {} {} posts", ranked.len(), query);
        Ok(ranked)
    }

    /// Every user's posts, flattened in user order
    async fn fetch_all_posts(&self) -> AggregatorResult<Vec<Post>> {
        let fetcher = self.fetcher.as_ref();
        let users = fetch_users(fetcher).await?;

        let per_user =
            try_join_all(users.iter().map(|user| fetch_user_posts(fetcher, &user.id))).await?;

        Ok(per_user.into_iter().flatten().collect())
    }
}

/// Posts tied for the highest comment count, in encounter order, capped at [`TOP_N`]
///
/// Never backfilled with lower counts.
fn most_commented(posts: Vec<Post>, comment_counts: Vec<usize>) -> Vec<RankedPost> {
    let Some(&max) = comment_counts.iter().max() else {
        return Vec::new();
    };

    posts
        .into_iter()
        .zip(comment_counts)
        .filter(|(_, count)| *count == max)
        .take(TOP_N)
        .map(|(post, count)| RankedPost {
            post,
            comment_count: Some(count),
        })
        .collect()
}

fn latest(mut posts: Vec<Post>) -> Vec<RankedPost> {
    posts.sort_by(|a, b| b.id.cmp(&a.id));
    posts
        .into_iter()
        .take(TOP_N)
        .map(|post| RankedPost {
            post,
            comment_count: None,
        })
        .collect()
}

//! Typed views over upstream payloads

use super::fetcher::Fetcher;
use crate::error::FetchError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Upstream user: opaque id plus display name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
}

/// Upstream post
///
/// Only `id` is interpreted. Every other field is carried through untouched
/// so ranked output mirrors what the upstream returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Deserialize)]
struct NumbersPayload {
    #[serde(default)]
    numbers: Vec<Value>,
}

#[derive(Deserialize)]
struct UsersPayload {
    users: Map<String, Value>,
}

#[derive(Deserialize)]
struct PostsPayload {
    #[serde(default)]
    posts: Vec<Post>,
}

#[derive(Deserialize)]
struct CommentsPayload {
    #[serde(default)]
    comments: Vec<Value>,
}

fn decode<T: DeserializeOwned>(resource: &str, payload: Value) -> Result<T, FetchError> {
    serde_json::from_value(payload).map_err(|e| FetchError::Decode {
        resource: resource.to_string(),
        cause: e.to_string(),
    })
}

/// Fetch a `{"numbers": [...]}` resource
///
/// Elements that are not integers are skipped one by one; the rest of the
/// batch is kept.
pub async fn fetch_numbers(fetcher: &dyn Fetcher, resource: &str) -> Result<Vec<i64>, FetchError> {
    let payload: NumbersPayload = decode(resource, fetcher.fetch(resource).await?)?;

    let mut numbers = Vec::with_capacity(payload.numbers.len());
    for value in payload.numbers {
        match value.as_i64() {
            Some(n) => numbers.push(n),
            None => log::debug!("skipping non-integer value {} from {}", value, resource),
        }
    }
    Ok(numbers)
}

/// Array-index-like key: canonical decimal below 2^32 - 1
fn array_index(key: &str) -> Option<u32> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    if !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse::<u32>().ok().filter(|&n| n != u32::MAX)
}

/// Fetch the user directory in object-property order
///
/// Integer-like ids come first in ascending numeric order, every other id
/// follows in document order. This is the iteration order upstream clients
/// observe for a JSON object, and ranking ties are broken by it.
pub async fn fetch_users(fetcher: &dyn Fetcher) -> Result<Vec<User>, FetchError> {
    let resource = "users";
    let payload: UsersPayload = decode(resource, fetcher.fetch(resource).await?)?;

    let mut users: Vec<User> = payload
        .users
        .into_iter()
        .map(|(id, name)| {
            let name = match name {
                Value::String(s) => s,
                other => other.to_string(),
            };
            User { id, name }
        })
        .collect();

    // Stable: named ids keep document order behind the indexed ones
    users.sort_by_key(|user| match array_index(&user.id) {
        Some(index) => (0, index),
        None => (1, 0),
    });
    Ok(users)
}

pub async fn fetch_user_posts(fetcher: &dyn Fetcher, user_id: &str) -> Result<Vec<Post>, FetchError> {
    let resource = format!("users/{}/posts", user_id);
    let payload: PostsPayload = decode(&resource, fetcher.fetch(&resource).await?)?;
    Ok(payload.posts)
}

pub async fn fetch_comment_count(fetcher: &dyn Fetcher, post_id: u64) -> Result<usize, FetchError> {
    let resource = format!("posts/{}/comments", post_id);
    let payload: CommentsPayload = decode(&resource, fetcher.fetch(&resource).await?)?;
    Ok(payload.comments.len())
}

//! Ranking query selectors and their cache keys

use crate::error::AggregatorError;
use std::fmt;
use std::str::FromStr;

/// Cache key of the top-users ranking
pub const TOP_USERS_KEY: &str = "topUsers";

/// How `/posts` ranks the flattened post list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostQuery {
    /// Every post tied for the highest comment count
    Popular,
    /// Highest post ids first (ids assumed monotonic upstream)
    Latest,
}

impl PostQuery {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostQuery::Popular => "popular",
            PostQuery::Latest => "latest",
        }
    }

    pub fn cache_key(&self) -> String {
        format!("posts_{}", self.as_str())
    }
}

impl FromStr for PostQuery {
    type Err = AggregatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "popular" => Ok(PostQuery::Popular),
            "latest" => Ok(PostQuery::Latest),
            other => Err(AggregatorError::InvalidQueryType(other.to_string())),
        }
    }
}

impl fmt::Display for PostQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_keys() {
        assert_eq!(PostQuery::Popular.cache_key(), "posts_popular");
        assert_eq!(PostQuery::Latest.cache_key(), "posts_latest");
    }

    #[test]
    fn test_parse() {
        assert_eq!("latest".parse::<PostQuery>().unwrap(), PostQuery::Latest);
        assert!(matches!(
            "Popular".parse::<PostQuery>(),
            Err(AggregatorError::InvalidQueryType(_))
        ));
        assert!(matches!(
            "".parse::<PostQuery>(),
            Err(AggregatorError::InvalidQueryType(_))
        ));
    }
}

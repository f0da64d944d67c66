//! Number categories served by the upstream API

use crate::error::AggregatorError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Prime,
    Fibonacci,
    Even,
    Random,
}

impl Category {
    /// Short code used in request paths
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Prime => "p",
            Category::Fibonacci => "f",
            Category::Even => "e",
            Category::Random => "r",
        }
    }

    /// Upstream resource id holding this category's numbers
    pub fn resource(&self) -> &'static str {
        match self {
            Category::Prime => "primes",
            Category::Fibonacci => "fibo",
            Category::Even => "even",
            Category::Random => "rand",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Category::Prime => 0,
            Category::Fibonacci => 1,
            Category::Even => 2,
            Category::Random => 3,
        }
    }

    pub fn all() -> [Category; 4] {
        [
            Category::Prime,
            Category::Fibonacci,
            Category::Even,
            Category::Random,
        ]
    }
}

impl FromStr for Category {
    type Err = AggregatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "p" => Ok(Category::Prime),
            "f" => Ok(Category::Fibonacci),
            "e" => Ok(Category::Even),
            "r" => Ok(Category::Random),
            other => Err(AggregatorError::InvalidCategory(other.to_string())),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

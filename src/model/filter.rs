use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::todo::Todo;

/// Which todos the list view shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Completed,
    Uncompleted,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown filter '{0}' (expected all, completed or uncompleted)")]
pub struct ParseFilterError(String);

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Completed, Filter::Uncompleted];

    pub fn matches(self, todo: &Todo) -> bool {
        match self {
            Filter::All => true,
            Filter::Completed => todo.completed,
            Filter::Uncompleted => !todo.completed,
        }
    }

    /// Next filter in select order, wrapping around
    pub fn cycle(self) -> Filter {
        match self {
            Filter::All => Filter::Completed,
            Filter::Completed => Filter::Uncompleted,
            Filter::Uncompleted => Filter::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Completed => "Completed",
            Filter::Uncompleted => "Uncompleted",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Completed => "completed",
            Filter::Uncompleted => "uncompleted",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Filter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Filter::All),
            "completed" | "done" => Ok(Filter::Completed),
            "uncompleted" | "open" => Ok(Filter::Uncompleted),
            other => Err(ParseFilterError(other.to_string())),
        }
    }
}

//! Participant category (the "sex" field of a roster entry).

use crate::InputError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The category a participant is registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Men,
    Women,
    Other,
}

impl Category {
    /// Returns the canonical lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Men => "men",
            Category::Women => "women",
            Category::Other => "other",
        }
    }
}

impl FromStr for Category {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "men" => Ok(Category::Men),
            "women" => Ok(Category::Women),
            "other" => Ok(Category::Other),
            _ => Err(InputError::UnknownCategory(s.to_string())),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

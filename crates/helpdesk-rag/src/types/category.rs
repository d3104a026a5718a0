//! Triage categories

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Closed set of triage labels
///
/// Every query is assigned exactly one category; text that matches none of
/// the routed labels falls back to `General`. The same value scopes both the
/// retrieval filter and the answer's instructed persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Networking,
    Hardware,
    Security,
    General,
}

impl Category {
    /// The non-default labels, in routing priority order. The first label
    /// found as a substring of the router model's output wins.
    pub const ROUTED: [Category; 3] = [Category::Networking, Category::Hardware, Category::Security];

    /// All labels, including the `general` fallback
    pub const ALL: [Category; 4] = [
        Category::Networking,
        Category::Hardware,
        Category::Security,
        Category::General,
    ];

    /// Lowercase label as stored in chunk metadata
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Networking => "networking",
            Category::Hardware => "hardware",
            Category::Security => "security",
            Category::General => "general",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "networking" => Ok(Category::Networking),
            "hardware" => Ok(Category::Hardware),
            "security" => Ok(Category::Security),
            "general" => Ok(Category::General),
            other => Err(Error::config(format!("Unknown category: {}", other))),
        }
    }
}

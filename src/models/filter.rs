use serde::{Deserialize, Serialize};
use std::fmt;

/// Named task filter shown in the filter bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Filter {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "school")]
    School,
    #[serde(rename = "personal")]
    Personal,
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "dueSoon")]
    DueSoon,
    #[serde(rename = "overdue")]
    Overdue,
}

impl Filter {
    /// Display order of the filter bar.
    pub const ALL: [Filter; 7] = [
        Filter::All,
        Filter::School,
        Filter::Personal,
        Filter::Pending,
        Filter::Completed,
        Filter::DueSoon,
        Filter::Overdue,
    ];

    /// Stable key, same spelling as the persisted UI state.
    pub fn key(&self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::School => "school",
            Filter::Personal => "personal",
            Filter::Pending => "pending",
            Filter::Completed => "completed",
            Filter::DueSoon => "dueSoon",
            Filter::Overdue => "overdue",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Filter::All => "All Tasks",
            Filter::School => "School",
            Filter::Personal => "Personal",
            Filter::Pending => "Pending",
            Filter::Completed => "Completed",
            Filter::DueSoon => "Due Soon",
            Filter::Overdue => "Overdue",
        }
    }

    /// Parse a filter name. Unknown names fall back to `All`.
    ///
    /// Accepts the camelCase keys plus kebab/snake spellings so the CLI can
    /// take `due-soon`.
    pub fn parse(name: &str) -> Filter {
        let normalized: String = name
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "school" => Filter::School,
            "personal" => Filter::Personal,
            "pending" => Filter::Pending,
            "completed" => Filter::Completed,
            "duesoon" => Filter::DueSoon,
            "overdue" => Filter::Overdue,
            _ => Filter::All,
        }
    }

    /// Position in the filter bar.
    pub fn index(&self) -> usize {
        Filter::ALL.iter().position(|f| f == self).unwrap_or(0)
    }

    pub fn next(&self) -> Filter {
        Filter::ALL[(self.index() + 1) % Filter::ALL.len()]
    }

    pub fn prev(&self) -> Filter {
        let len = Filter::ALL.len();
        Filter::ALL[(self.index() + len - 1) % len]
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

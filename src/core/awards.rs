//! Award milestones over the number of completed tasks.

use serde::{Deserialize, Serialize};

use crate::models::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Award {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub requirement: u64,
}

/// Milestones in ascending order of requirement.
pub const AWARDS: [Award; 8] = [
    Award {
        id: "first-step",
        name: "First Step",
        description: "Complete your first task",
        requirement: 1,
    },
    Award {
        id: "getting-started",
        name: "Getting Started",
        description: "Complete 10 tasks",
        requirement: 10,
    },
    Award {
        id: "task-master",
        name: "Task Master",
        description: "Complete 100 tasks",
        requirement: 100,
    },
    Award {
        id: "productivity-hero",
        name: "Productivity Hero",
        description: "Complete 500 tasks",
        requirement: 500,
    },
    Award {
        id: "legendary-achiever",
        name: "Legendary Achiever",
        description: "Complete 1,000 tasks",
        requirement: 1_000,
    },
    Award {
        id: "ultimate-legend",
        name: "Ultimate Legend",
        description: "Complete 10,000 tasks",
        requirement: 10_000,
    },
    Award {
        id: "cosmic-master",
        name: "Cosmic Master",
        description: "Complete 100,000 tasks",
        requirement: 100_000,
    },
    Award {
        id: "godlike-entity",
        name: "Godlike Entity",
        description: "Complete 1,000,000 tasks",
        requirement: 1_000_000,
    },
];

/// Where the completion counter comes from.
///
/// - `Live`: completed tasks currently in the list. Deleting or reopening a
///   completed task lowers it.
/// - `Lifetime`: every not-completed -> completed transition ever recorded.
///   Never decreases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AwardCounting {
    #[default]
    Live,
    Lifetime,
}

impl std::fmt::Display for AwardCounting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AwardCounting::Live => f.write_str("live"),
            AwardCounting::Lifetime => f.write_str("lifetime"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AwardProgress {
    pub award: &'static Award,
    pub achieved: bool,
    /// `min(counter / requirement, 1.0)`
    pub progress: f64,
}

impl AwardProgress {
    pub fn percent(&self) -> u16 {
        (self.progress * 100.0).floor() as u16
    }
}

/// Number of completed tasks in the current list.
pub fn live_completed(tasks: &[Task]) -> u64 {
    tasks.iter().filter(|t| t.completed).count() as u64
}

pub fn progress(counter: u64) -> Vec<AwardProgress> {
    AWARDS
        .iter()
        .map(|award| AwardProgress {
            award,
            achieved: counter >= award.requirement,
            progress: (counter as f64 / award.requirement as f64).min(1.0),
        })
        .collect()
}

pub fn achieved_count(counter: u64) -> usize {
    AWARDS.iter().filter(|a| counter >= a.requirement).count()
}

/// First award not yet achieved.
pub fn next_award(counter: u64) -> Option<&'static Award> {
    AWARDS.iter().find(|a| counter < a.requirement)
}

/// "You've achieved 2 out of 8 awards • 12 tasks completed"
pub fn summary(counter: u64) -> String {
    format!(
        "You've achieved {} out of {} awards • {} tasks completed",
        achieved_count(counter),
        AWARDS.len(),
        group_thousands(counter)
    )
}

/// `1234567` -> `1,234,567`
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_ascending() {
        assert!(AWARDS.windows(2).all(|w| w[0].requirement < w[1].requirement));
    }

    #[test]
    fn test_achieved_at_threshold() {
        assert_eq!(achieved_count(0), 0);
        assert_eq!(achieved_count(1), 1);
        assert_eq!(achieved_count(9), 1);
        assert_eq!(achieved_count(10), 2);
        assert_eq!(achieved_count(1_000_000), 8);
    }

    #[test]
    fn test_progress_is_capped() {
        let rows = progress(50);
        assert!(rows[0].achieved);
        assert_eq!(rows[0].progress, 1.0);
        assert!(!rows[2].achieved);
        assert_eq!(rows[2].progress, 0.5);
        assert_eq!(rows[2].percent(), 50);
        assert_eq!(rows[3].progress, 0.1);
    }

    #[test]
    fn test_next_award() {
        assert_eq!(next_award(0).map(|a| a.id), Some("first-step"));
        assert_eq!(next_award(10).map(|a| a.id), Some("task-master"));
        assert_eq!(next_award(2_000_000), None);
    }

    #[test]
    fn test_summary_text() {
        assert_eq!(
            summary(1234),
            "You've achieved 5 out of 8 awards • 1,234 tasks completed"
        );
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000_000), "1,000,000");
    }
}

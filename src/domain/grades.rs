//! Grading domain types
//!
//! Grades are keyed by question id and carry the reviewer's follow-up tasks.

use serde::{Deserialize, Serialize};

pub const MAX_SCORE: u8 = 5;

/// Follow-up task status; any status may move to any other
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Open,
    Review,
    Attention,
    Done,
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Open
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Open => write!(f, "open"),
            TaskStatus::Review => write!(f, "review"),
            TaskStatus::Attention => write!(f, "attention"),
            TaskStatus::Done => write!(f, "done"),
        }
    }
}

/// Reviewer follow-up task
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub status: TaskStatus,
}

/// Grade for one question
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Grade {
    #[serde(default)]
    pub score: u8,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Grade {
    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn open_tasks(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.status != TaskStatus::Done)
            .count()
    }
}

/// Partial grade edit
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GradePatch {
    #[serde(default)]
    pub score: Option<u8>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl GradePatch {
    pub fn score(score: u8) -> Self {
        Self {
            score: Some(score),
            comment: None,
        }
    }

    pub fn comment(comment: impl Into<String>) -> Self {
        Self {
            score: None,
            comment: Some(comment.into()),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        match self.score {
            Some(score) if score > MAX_SCORE => {
                Err(format!("score must be between 0 and {}, got {}", MAX_SCORE, score))
            }
            _ => Ok(()),
        }
    }
}

/// Naive total: the plain sum of scores.
///
/// Question weights are not applied.
pub fn total_score<'a, I>(grades: I) -> u32
where
    I: IntoIterator<Item = &'a Grade>,
{
    grades.into_iter().map(|g| u32::from(g.score)).sum()
}

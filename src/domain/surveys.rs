//! Survey and client domain types

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::questions::Question;

pub type SurveyId = u64;
pub type ClientId = u64;

pub const UNTITLED_TITLE: &str = "Untitled Survey";
pub const INITIAL_VERSION: &str = "1.0";

/// Survey definition; owns its ordered questions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Survey {
    pub id: SurveyId,
    pub title: String,
    pub version: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Survey {
    pub fn new(id: SurveyId, title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            version: version.into(),
            questions: Vec::new(),
        }
    }

    pub fn blank(id: SurveyId) -> Self {
        Self::new(id, UNTITLED_TITLE, INITIAL_VERSION)
    }

    pub fn with_questions(mut self, questions: Vec<Question>) -> Self {
        self.questions = questions;
        self
    }

    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    pub fn position(&self, question_id: &str) -> Option<usize> {
        self.questions.iter().position(|q| q.id == question_id)
    }

    pub fn contains(&self, question_id: &str) -> bool {
        self.position(question_id).is_some()
    }

    /// First question id that appears more than once, if any.
    pub fn duplicate_question_id(&self) -> Option<&str> {
        let mut seen = HashSet::new();
        self.questions
            .iter()
            .map(|q| q.id.as_str())
            .find(|id| !seen.insert(*id))
    }
}

/// Partial edit of survey metadata
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SurveyMetaPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// Client organisation answering surveys
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
}

impl Client {
    pub fn new(id: ClientId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

//! Derived completion status types
//!
//! Nothing here is stored; the model computes it from response coverage.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::grades::Grade;
use super::questions::Question;
use super::responses::Answer;
use super::surveys::{ClientId, SurveyId};

/// Completion classification of a (client, survey) pair
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Completion {
    NotStarted,
    InProgress,
    /// Fully answered; awaiting grading
    Complete,
}

impl Completion {
    pub fn classify(answered: usize, total: usize) -> Self {
        if answered == 0 {
            Self::NotStarted
        } else if answered < total {
            Self::InProgress
        } else {
            Self::Complete
        }
    }
}

/// `round(100 * answered / total)`, or 0 for an empty survey.
pub fn percent_complete(answered: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let answered = answered.min(total);
    // Half rounds up
    ((200 * answered + total) / (2 * total)) as u8
}

/// One row of the in-progress or needs-grading lists
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatusEntry {
    pub client_id: ClientId,
    pub client_name: String,
    pub survey_id: SurveyId,
    pub survey_title: String,
    pub answered: usize,
    pub total: usize,
    pub percent: u8,
    pub last_updated: Option<DateTime<Utc>>,
}

/// Status lists in client order, then survey order
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct StatusLists {
    pub in_progress: Vec<StatusEntry>,
    pub needs_grading: Vec<StatusEntry>,
}

/// Grading dashboard payload
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Dashboard {
    #[serde(flatten)]
    pub statuses: StatusLists,
    pub total_score: u32,
}

/// Review row: a question with its answer and grade, if any
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReviewItem<'a> {
    pub question: &'a Question,
    pub answer: Option<&'a Answer>,
    pub grade: Option<&'a Grade>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounds_half_up() {
        assert_eq!(percent_complete(0, 4), 0);
        assert_eq!(percent_complete(2, 4), 50);
        assert_eq!(percent_complete(3, 4), 75);
        assert_eq!(percent_complete(1, 3), 33);
        assert_eq!(percent_complete(2, 3), 67);
        assert_eq!(percent_complete(1, 8), 13);
        assert_eq!(percent_complete(4, 4), 100);
    }

    #[test]
    fn empty_survey_is_zero_percent() {
        assert_eq!(percent_complete(0, 0), 0);
    }

    #[test]
    fn classification() {
        assert_eq!(Completion::classify(0, 4), Completion::NotStarted);
        assert_eq!(Completion::classify(2, 4), Completion::InProgress);
        assert_eq!(Completion::classify(4, 4), Completion::Complete);
    }
}

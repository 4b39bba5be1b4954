//! Response domain types
//!
//! Answers are stored per (client, survey) sheet and checked against the
//! question they answer before they are written.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::questions::{Question, QuestionFormat};
use super::surveys::{ClientId, SurveyId};

/// Answer value; its shape depends on the question type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Answer {
    YesNo(bool),
    Rating(u32),
    Text(String),
    Choices(BTreeSet<String>),
}

impl Answer {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn choices<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Choices(values.into_iter().map(Into::into).collect())
    }

    fn shape(&self) -> &'static str {
        match self {
            Self::YesNo(_) => "boolean",
            Self::Rating(_) => "integer",
            Self::Text(_) => "string",
            Self::Choices(_) => "set of strings",
        }
    }

    /// Check this value against the question it answers.
    pub fn validate(&self, question: &Question) -> Result<(), String> {
        let mismatch = |expected: &str| {
            Err(format!(
                "question {} expects a {}, got a {}",
                question.id,
                expected,
                self.shape()
            ))
        };

        match (&question.format, self) {
            (
                QuestionFormat::Single { options } | QuestionFormat::Select { options },
                Self::Text(choice),
            ) => {
                if options.iter().any(|o| o == choice) {
                    Ok(())
                } else {
                    Err(format!(
                        "{:?} is not an option of question {}",
                        choice, question.id
                    ))
                }
            }
            (QuestionFormat::Single { .. } | QuestionFormat::Select { .. }, _) => {
                mismatch("string")
            }
            (QuestionFormat::Multi { options }, Self::Choices(picked)) => {
                match picked.iter().find(|p| !options.contains(*p)) {
                    Some(stray) => Err(format!(
                        "{:?} is not an option of question {}",
                        stray, question.id
                    )),
                    None => Ok(()),
                }
            }
            (QuestionFormat::Multi { .. }, _) => mismatch("set of strings"),
            (QuestionFormat::Rating { scale }, Self::Rating(n)) => {
                if (1..=*scale).contains(n) {
                    Ok(())
                } else {
                    Err(format!(
                        "rating {} for question {} is outside 1..={}",
                        n, question.id, scale
                    ))
                }
            }
            (QuestionFormat::Rating { .. }, _) => mismatch("integer"),
            (QuestionFormat::Text, Self::Text(body)) => {
                if body.trim().is_empty() {
                    Err(format!("answer to question {} is blank", question.id))
                } else {
                    Ok(())
                }
            }
            (QuestionFormat::Text, _) => mismatch("string"),
            (QuestionFormat::YesNo, Self::YesNo(_)) => Ok(()),
            (QuestionFormat::YesNo, _) => mismatch("boolean"),
        }
    }
}

/// One client's answers to one survey
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponseSheet {
    pub client_id: ClientId,
    pub survey_id: SurveyId,
    #[serde(default)]
    pub answers: BTreeMap<String, Answer>,
    /// Clock time of the last answer change
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl ResponseSheet {
    pub fn new(client_id: ClientId, survey_id: SurveyId) -> Self {
        Self {
            client_id,
            survey_id,
            answers: BTreeMap::new(),
            last_updated: None,
        }
    }

    pub fn answer(&self, question_id: &str) -> Option<&Answer> {
        self.answers.get(question_id)
    }

    /// Distinct questions of `questions` that have an answer.
    pub fn answered_count(&self, questions: &[Question]) -> usize {
        questions
            .iter()
            .filter(|q| self.answers.contains_key(&q.id))
            .count()
    }
}

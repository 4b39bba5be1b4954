//! Question domain types
//!
//! A question's type, options and rating scale travel together in
//! [`QuestionFormat`], so options exist only for choice questions and a scale
//! only for ratings.

use serde::{Deserialize, Serialize};

/// Options given to a question that becomes a choice question without any.
pub const DEFAULT_OPTIONS: [&str; 2] = ["Option A", "Option B"];

/// Scale given to a question that becomes a rating.
pub const DEFAULT_SCALE: u32 = 5;

/// Smallest rating scale the editor accepts.
pub const MIN_SCALE: u32 = 2;

/// Question type without its payload
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Single,
    Multi,
    Rating,
    Text,
    YesNo,
    Select,
}

impl QuestionType {
    pub fn has_options(&self) -> bool {
        matches!(self, Self::Single | Self::Multi | Self::Select)
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuestionType::Single => write!(f, "single"),
            QuestionType::Multi => write!(f, "multi"),
            QuestionType::Rating => write!(f, "rating"),
            QuestionType::Text => write!(f, "text"),
            QuestionType::YesNo => write!(f, "yesno"),
            QuestionType::Select => write!(f, "select"),
        }
    }
}

/// Question type together with its options or scale
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum QuestionFormat {
    Single { options: Vec<String> },
    Multi { options: Vec<String> },
    Rating { scale: u32 },
    Text,
    YesNo,
    Select { options: Vec<String> },
}

impl QuestionFormat {
    pub fn question_type(&self) -> QuestionType {
        match self {
            Self::Single { .. } => QuestionType::Single,
            Self::Multi { .. } => QuestionType::Multi,
            Self::Rating { .. } => QuestionType::Rating,
            Self::Text => QuestionType::Text,
            Self::YesNo => QuestionType::YesNo,
            Self::Select { .. } => QuestionType::Select,
        }
    }

    pub fn options(&self) -> Option<&[String]> {
        match self {
            Self::Single { options } | Self::Multi { options } | Self::Select { options } => {
                Some(options)
            }
            _ => None,
        }
    }

    pub fn scale(&self) -> Option<u32> {
        match self {
            Self::Rating { scale } => Some(*scale),
            _ => None,
        }
    }

    /// Switch to another type, keeping options between choice types.
    pub fn convert_to(&self, target: QuestionType) -> QuestionFormat {
        let options = || {
            self.options()
                .map(|o| o.to_vec())
                .unwrap_or_else(|| DEFAULT_OPTIONS.iter().map(|s| s.to_string()).collect())
        };
        match target {
            QuestionType::Single => Self::Single { options: options() },
            QuestionType::Multi => Self::Multi { options: options() },
            QuestionType::Select => Self::Select { options: options() },
            QuestionType::Rating => Self::Rating {
                scale: self.scale().unwrap_or(DEFAULT_SCALE),
            },
            QuestionType::Text => Self::Text,
            QuestionType::YesNo => Self::YesNo,
        }
    }

    fn options_mut(&mut self) -> Option<&mut Vec<String>> {
        match self {
            Self::Single { options } | Self::Multi { options } | Self::Select { options } => {
                Some(options)
            }
            _ => None,
        }
    }
}

/// Survey question
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Question {
    pub id: String,
    pub label: String,
    #[serde(flatten)]
    pub format: QuestionFormat,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub required: bool,
}

impl Question {
    pub fn new(id: impl Into<String>, label: impl Into<String>, format: QuestionFormat) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            format,
            weight: 0.0,
            required: false,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn question_type(&self) -> QuestionType {
        self.format.question_type()
    }

    /// Case-insensitive label match on a trimmed query; blank matches everything.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        needle.is_empty() || self.label.to_lowercase().contains(&needle)
    }

    /// Apply an editor patch, returning the edited copy.
    ///
    /// Options are trimmed with blanks dropped; at least one must remain.
    pub fn patched(&self, patch: &QuestionPatch) -> Result<Question, String> {
        let mut next = self.clone();

        if let Some(label) = &patch.label {
            next.label = label.clone();
        }
        if let Some(required) = patch.required {
            next.required = required;
        }
        if let Some(weight) = patch.weight {
            if !weight.is_finite() || weight < 0.0 {
                return Err(format!("weight must be a non-negative number, got {}", weight));
            }
            next.weight = weight;
        }
        if let Some(target) = patch.question_type {
            if target != next.question_type() {
                next.format = next.format.convert_to(target);
            }
        }
        if let Some(options) = &patch.options {
            let cleaned: Vec<String> = options
                .iter()
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
            if cleaned.is_empty() && next.format.options().is_some() {
                return Err(format!(
                    "{} questions need at least one option",
                    next.question_type()
                ));
            }
            match next.format.options_mut() {
                Some(slot) => *slot = cleaned,
                None => {
                    return Err(format!(
                        "{} questions do not take options",
                        next.question_type()
                    ))
                }
            }
        }
        if let Some(scale) = patch.scale {
            match &mut next.format {
                QuestionFormat::Rating { scale: slot } => {
                    if scale < MIN_SCALE {
                        return Err(format!("rating scale must be at least {}", MIN_SCALE));
                    }
                    *slot = scale;
                }
                other => {
                    return Err(format!(
                        "{} questions do not take a scale",
                        other.question_type()
                    ))
                }
            }
        }

        Ok(next)
    }
}

/// Editor input for a new question; the id is generated
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionDraft {
    pub label: String,
    #[serde(flatten)]
    pub format: QuestionFormat,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub required: bool,
}

/// Partial question edit
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuestionPatch {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub required: Option<bool>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default, rename = "type")]
    pub question_type: Option<QuestionType>,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub scale: Option<u32>,
}

/// Direction for reordering a question
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MoveDirection {
    Up,
    Down,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn select(id: &str) -> Question {
        Question::new(
            id,
            "Secure Configurations baseline",
            QuestionFormat::Select {
                options: vec!["CIS L1".into(), "CIS L2".into(), "Other".into()],
            },
        )
    }

    #[test]
    fn deserializes_flat_json_shape() {
        let q: Question = serde_json::from_str(
            r#"{"id":"q3","type":"rating","label":"Patching","scale":5,"weight":15,"required":true}"#,
        )
        .unwrap();
        assert_eq!(q.format, QuestionFormat::Rating { scale: 5 });
        assert_eq!(q.weight, 15.0);
        assert!(q.required);

        let yes: Question = serde_json::from_str(r#"{"id":"q1","type":"yesno","label":"HW"}"#).unwrap();
        assert_eq!(yes.question_type(), QuestionType::YesNo);
        assert!(!yes.required);
    }

    #[test]
    fn type_change_keeps_options_between_choice_types() {
        let q = select("q4");
        let patched = q
            .patched(&QuestionPatch {
                question_type: Some(QuestionType::Multi),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(patched.format.options(), q.format.options());
    }

    #[test]
    fn type_change_defaults_options_and_scale() {
        let q = Question::new("q2", "Notes", QuestionFormat::Text);
        let as_select = q.format.convert_to(QuestionType::Select);
        assert_eq!(
            as_select.options().unwrap(),
            &["Option A".to_string(), "Option B".to_string()]
        );
        assert_eq!(q.format.convert_to(QuestionType::Rating).scale(), Some(DEFAULT_SCALE));
        assert_eq!(select("q4").format.convert_to(QuestionType::Text), QuestionFormat::Text);
    }

    #[test]
    fn options_are_trimmed_and_blanks_dropped() {
        let patched = select("q4")
            .patched(&QuestionPatch {
                options: Some(vec![" CIS L1 ".into(), "".into(), "  ".into(), "Custom".into()]),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(
            patched.format.options().unwrap(),
            &["CIS L1".to_string(), "Custom".to_string()]
        );
    }

    #[test]
    fn all_blank_options_are_rejected() {
        let q = select("q4");
        let err = q
            .patched(&QuestionPatch {
                options: Some(vec!["".into(), "   ".into()]),
                ..Default::default()
            })
            .unwrap_err();
        assert!(err.contains("at least one option"));
    }

    #[test]
    fn options_on_text_question_are_rejected() {
        let q = Question::new("q2", "Notes", QuestionFormat::Text);
        let err = q
            .patched(&QuestionPatch {
                options: Some(vec!["a".into()]),
                ..Default::default()
            })
            .unwrap_err();
        assert!(err.contains("text"));
    }

    #[test]
    fn tiny_scale_is_rejected() {
        let q = Question::new("q3", "Patching", QuestionFormat::Rating { scale: 5 });
        assert!(q
            .patched(&QuestionPatch {
                scale: Some(1),
                ..Default::default()
            })
            .is_err());
    }

    #[test]
    fn label_search_is_trimmed_and_case_insensitive() {
        let q = select("q4");
        assert!(q.matches("  secure "));
        assert!(q.matches(""));
        assert!(!q.matches("vulnerability"));
    }
}

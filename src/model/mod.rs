//! Survey response model
//!
//! Holds clients, surveys, responses and grades for one session and computes
//! derived status from them. Every operation validates before it mutates, so
//! a rejected call leaves the model exactly as it was.

mod editor;
mod grading;
mod responses;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use crate::domain::{Client, ClientId, Grade, ResponseSheet, Survey, SurveyId, MAX_SCORE};
use crate::error::{ModelError, ModelResult};
use crate::services::{Clock, IdGenerator};

/// Plain data form of the model, as persisted
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ModelSnapshot {
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub surveys: Vec<Survey>,
    #[serde(default)]
    pub responses: Vec<ResponseSheet>,
    /// Keyed by question id
    #[serde(default)]
    pub grades: BTreeMap<String, Grade>,
}

pub struct SurveyResponseModel {
    clients: Vec<Client>,
    surveys: Vec<Survey>,
    responses: BTreeMap<(ClientId, SurveyId), ResponseSheet>,
    grades: BTreeMap<String, Grade>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl SurveyResponseModel {
    pub fn new(ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self {
            clients: Vec::new(),
            surveys: Vec::new(),
            responses: BTreeMap::new(),
            grades: BTreeMap::new(),
            ids,
            clock,
        }
    }

    /// Rebuild a model, rejecting snapshots that break any model invariant.
    pub fn from_snapshot(
        snapshot: ModelSnapshot,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
    ) -> ModelResult<Self> {
        let mut model = Self::new(ids, clock);

        for client in snapshot.clients {
            model.insert_client(client)?;
        }
        for survey in snapshot.surveys {
            model.insert_survey(survey)?;
        }

        for sheet in snapshot.responses {
            model.require_client(sheet.client_id)?;
            let survey = model.require_survey(sheet.survey_id)?;
            for (question_id, answer) in &sheet.answers {
                let question = survey.question(question_id).ok_or_else(|| {
                    not_found(format!(
                        "question {} in survey {}",
                        question_id, sheet.survey_id
                    ))
                })?;
                answer.validate(question).map_err(invalid)?;
            }
            let key = (sheet.client_id, sheet.survey_id);
            if model.responses.contains_key(&key) {
                return Err(invalid(format!(
                    "duplicate responses for client {} survey {}",
                    sheet.client_id, sheet.survey_id
                )));
            }
            model.responses.insert(key, sheet);
        }

        for (question_id, grade) in snapshot.grades {
            model.require_question(&question_id)?;
            if let Some(task_id) = duplicate_task_id(&grade) {
                return Err(invalid(format!(
                    "duplicate task {} under question {}",
                    task_id, question_id
                )));
            }
            if grade.score > MAX_SCORE {
                return Err(invalid(format!(
                    "score {} under question {} exceeds {}",
                    grade.score, question_id, MAX_SCORE
                )));
            }
            model.grades.insert(question_id, grade);
        }

        tracing::debug!(
            clients = model.clients.len(),
            surveys = model.surveys.len(),
            sheets = model.responses.len(),
            grades = model.grades.len(),
            "Model restored from snapshot"
        );

        Ok(model)
    }

    pub fn snapshot(&self) -> ModelSnapshot {
        ModelSnapshot {
            clients: self.clients.clone(),
            surveys: self.surveys.clone(),
            responses: self.responses.values().cloned().collect(),
            grades: self.grades.clone(),
        }
    }

    /// Register a client; ids must be unique.
    pub fn insert_client(&mut self, client: Client) -> ModelResult<()> {
        if self.client(client.id).is_some() {
            return Err(invalid(format!("client {} already exists", client.id)));
        }
        self.clients.push(client);
        Ok(())
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn client(&self, client_id: ClientId) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == client_id)
    }

    pub fn surveys(&self) -> &[Survey] {
        &self.surveys
    }

    pub fn survey(&self, survey_id: SurveyId) -> Option<&Survey> {
        self.surveys.iter().find(|s| s.id == survey_id)
    }

    pub fn sheet(&self, client_id: ClientId, survey_id: SurveyId) -> Option<&ResponseSheet> {
        self.responses.get(&(client_id, survey_id))
    }

    pub fn grades(&self) -> &BTreeMap<String, Grade> {
        &self.grades
    }

    pub fn grade(&self, question_id: &str) -> Option<&Grade> {
        self.grades.get(question_id)
    }

    /// Every question id known to any survey.
    pub fn question_ids(&self) -> impl Iterator<Item = &str> {
        let mut seen = HashSet::new();
        self.surveys
            .iter()
            .flat_map(|s| s.questions.iter())
            .map(|q| q.id.as_str())
            .filter(move |id| seen.insert(*id))
    }

    fn require_client(&self, client_id: ClientId) -> ModelResult<&Client> {
        self.client(client_id)
            .ok_or_else(|| not_found(format!("client {}", client_id)))
    }

    fn require_survey(&self, survey_id: SurveyId) -> ModelResult<&Survey> {
        self.survey(survey_id)
            .ok_or_else(|| not_found(format!("survey {}", survey_id)))
    }

    fn require_survey_mut(&mut self, survey_id: SurveyId) -> ModelResult<&mut Survey> {
        self.surveys
            .iter_mut()
            .find(|s| s.id == survey_id)
            .ok_or_else(|| not_found(format!("survey {}", survey_id)))
    }

    /// Grades are keyed by bare question id; the id must exist in some survey.
    fn require_question(&self, question_id: &str) -> ModelResult<()> {
        if self.surveys.iter().any(|s| s.contains(question_id)) {
            Ok(())
        } else {
            Err(not_found(format!("question {}", question_id)))
        }
    }
}

fn duplicate_task_id(grade: &Grade) -> Option<&str> {
    let mut seen = HashSet::new();
    grade
        .tasks
        .iter()
        .map(|t| t.id.as_str())
        .find(|id| !seen.insert(*id))
}

fn invalid(msg: impl Into<String>) -> ModelError {
    let err = ModelError::validation(msg);
    tracing::warn!(code = err.error_code(), error = %err, "Operation rejected");
    err
}

fn not_found(msg: impl Into<String>) -> ModelError {
    let err = ModelError::not_found(msg);
    tracing::warn!(code = err.error_code(), error = %err, "Operation rejected");
    err
}

//! Loads and saves the model through a [`Store`].
//!
//! Layout: `clients`, `surveys` and `responses` hold whole collections;
//! grades live under one `grade:<questionId>` key each.

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument};

use super::store::{keys, Store, StoreExt, StoreResult};
use super::{Clock, IdGenerator};
use crate::domain::{Client, Grade, ResponseSheet, Survey};
use crate::error::ModelResult;
use crate::model::{ModelSnapshot, SurveyResponseModel};

#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn Store>,
}

impl Repository {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Write each part of `defaults` whose key is absent. Returns the number
    /// of keys written; existing data is never overwritten.
    #[instrument(skip_all)]
    pub fn seed_defaults(&self, defaults: &ModelSnapshot) -> StoreResult<usize> {
        let mut written = 0;

        written += usize::from(self.store.put_if_absent(keys::CLIENTS, &defaults.clients)?);
        written += usize::from(self.store.put_if_absent(keys::SURVEYS, &defaults.surveys)?);
        written += usize::from(
            self.store
                .put_if_absent(keys::RESPONSES, &defaults.responses)?,
        );
        for (question_id, grade) in &defaults.grades {
            written += usize::from(self.store.put_if_absent(&keys::grade(question_id), grade)?);
        }

        info!(written, "Seeded default survey data");
        Ok(written)
    }

    /// Rebuild the model from the store. Missing keys load as empty.
    #[instrument(skip_all)]
    pub fn load(
        &self,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
    ) -> ModelResult<SurveyResponseModel> {
        let clients: Vec<Client> = self.store.get(keys::CLIENTS)?.unwrap_or_default();
        let surveys: Vec<Survey> = self.store.get(keys::SURVEYS)?.unwrap_or_default();
        let responses: Vec<ResponseSheet> = self.store.get(keys::RESPONSES)?.unwrap_or_default();

        let mut grades: BTreeMap<String, Grade> = BTreeMap::new();
        for survey in &surveys {
            for question in &survey.questions {
                if grades.contains_key(&question.id) {
                    continue;
                }
                if let Some(grade) = self.load_grade(&question.id)? {
                    grades.insert(question.id.clone(), grade);
                }
            }
        }

        let model = SurveyResponseModel::from_snapshot(
            ModelSnapshot {
                clients,
                surveys,
                responses,
                grades,
            },
            ids,
            clock,
        )?;

        info!(
            clients = model.clients().len(),
            surveys = model.surveys().len(),
            grades = model.grades().len(),
            "Survey data loaded"
        );
        Ok(model)
    }

    /// Write every part of the model.
    #[instrument(skip_all)]
    pub fn save(&self, model: &SurveyResponseModel) -> StoreResult<()> {
        let snapshot = model.snapshot();
        self.store.put(keys::CLIENTS, &snapshot.clients)?;
        self.store.put(keys::SURVEYS, &snapshot.surveys)?;
        self.store.put(keys::RESPONSES, &snapshot.responses)?;
        for (question_id, grade) in &snapshot.grades {
            self.save_grade(question_id, grade)?;
        }
        info!(grades = snapshot.grades.len(), "Survey data saved");
        Ok(())
    }

    pub fn load_grade(&self, question_id: &str) -> StoreResult<Option<Grade>> {
        self.store.get(&keys::grade(question_id))
    }

    pub fn save_grade(&self, question_id: &str, grade: &Grade) -> StoreResult<()> {
        self.store.put(&keys::grade(question_id), grade)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Answer, GradePatch};
    use crate::model::fixtures::{clock, model};
    use crate::services::{MemoryStore, SequentialIdGenerator};
    use pretty_assertions::assert_eq;

    fn repo() -> (Arc<MemoryStore>, Repository) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), Repository::new(store))
    }

    fn defaults() -> ModelSnapshot {
        let mut m = model();
        m.record_answer(1, 101, "q1", Answer::YesNo(true)).unwrap();
        m.set_grade("q1", GradePatch::score(4)).unwrap();
        m.set_grade("q3", GradePatch::score(2)).unwrap();
        m.snapshot()
    }

    #[test]
    fn empty_store_loads_empty_model() {
        let (_, repo) = repo();
        let m = repo
            .load(Arc::new(SequentialIdGenerator::new("t")), clock())
            .unwrap();
        assert!(m.clients().is_empty());
        assert!(m.surveys().is_empty());
    }

    #[test]
    fn seeding_writes_only_absent_keys() {
        let (store, repo) = repo();
        let custom = Grade {
            score: 1,
            comment: "graded by hand".into(),
            tasks: vec![],
        };
        repo.save_grade("q1", &custom).unwrap();

        let written = repo.seed_defaults(&defaults()).unwrap();
        // clients, surveys, responses, grade:q3
        assert_eq!(written, 4);
        assert_eq!(repo.load_grade("q1").unwrap(), Some(custom));

        let again = repo.seed_defaults(&defaults()).unwrap();
        assert_eq!(again, 0);
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn save_then_load_round_trips() {
        let (_, repo) = repo();
        let mut original = model();
        original.record_answer(2, 101, "q3", Answer::Rating(5)).unwrap();
        original.add_task("q3", "Weekly authenticated scans").unwrap();
        repo.save(&original).unwrap();

        let loaded = repo
            .load(Arc::new(SequentialIdGenerator::new("t")), clock())
            .unwrap();
        assert_eq!(loaded.snapshot(), original.snapshot());
    }

    #[test]
    fn total_is_stable_across_save_and_load_after_question_removal() {
        let (_, repo) = repo();
        let mut m = model();
        m.set_grade("q1", GradePatch::score(4)).unwrap();
        m.set_grade("q4", GradePatch::score(5)).unwrap();
        repo.save(&m).unwrap();

        m.remove_question(101, "q4").unwrap();
        repo.save(&m).unwrap();

        let loaded = repo
            .load(Arc::new(SequentialIdGenerator::new("t")), clock())
            .unwrap();
        assert_eq!(m.total_score(), 4);
        assert_eq!(loaded.total_score(), m.total_score());
        assert_eq!(loaded.snapshot(), m.snapshot());
    }
}

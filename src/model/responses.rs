use tracing::debug;

use super::{invalid, not_found, SurveyResponseModel};
use crate::domain::{
    percent_complete, Answer, Client, ClientId, Completion, Question, ResponseSheet, ReviewItem,
    StatusEntry, StatusLists, Survey, SurveyId,
};
use crate::error::ModelResult;

impl SurveyResponseModel {
    /// Record (or overwrite) a respondent's answer.
    ///
    /// Writing the value already stored changes nothing, including the
    /// sheet's `last_updated`.
    pub fn record_answer(
        &mut self,
        client_id: ClientId,
        survey_id: SurveyId,
        question_id: &str,
        value: Answer,
    ) -> ModelResult<()> {
        self.require_client(client_id)?;
        {
            let survey = self.require_survey(survey_id)?;
            let question = survey.question(question_id).ok_or_else(|| {
                not_found(format!("question {} in survey {}", question_id, survey_id))
            })?;
            value.validate(question).map_err(invalid)?;
        }

        let now = self.clock.now();
        let sheet = self
            .responses
            .entry((client_id, survey_id))
            .or_insert_with(|| ResponseSheet::new(client_id, survey_id));

        if sheet.answer(question_id) == Some(&value) {
            debug!(client_id, survey_id, question_id, "Answer unchanged");
            return Ok(());
        }

        sheet.answers.insert(question_id.to_string(), value);
        sheet.last_updated = Some(now);

        debug!(
            client_id,
            survey_id,
            question_id,
            answered = sheet.answers.len(),
            "Answer recorded"
        );

        Ok(())
    }

    /// Percent of the survey's questions this client has answered.
    pub fn compute_progress(&self, client_id: ClientId, survey_id: SurveyId) -> ModelResult<u8> {
        self.require_client(client_id)?;
        let survey = self.require_survey(survey_id)?;
        let answered = self.answered(client_id, survey);
        Ok(percent_complete(answered, survey.questions.len()))
    }

    /// Split started (client, survey) pairs into in-progress and needs-grading.
    ///
    /// Pairs with no answers are skipped. Order follows `clients`, then `surveys`.
    pub fn list_statuses(&self, clients: &[Client], surveys: &[Survey]) -> StatusLists {
        let mut lists = StatusLists::default();

        for client in clients {
            for survey in surveys {
                let answered = self.answered(client.id, survey);
                let total = survey.questions.len();

                let target = match Completion::classify(answered, total) {
                    Completion::NotStarted => continue,
                    Completion::InProgress => &mut lists.in_progress,
                    Completion::Complete => &mut lists.needs_grading,
                };

                target.push(StatusEntry {
                    client_id: client.id,
                    client_name: client.name.clone(),
                    survey_id: survey.id,
                    survey_title: survey.title.clone(),
                    answered,
                    total,
                    percent: percent_complete(answered, total),
                    last_updated: self
                        .sheet(client.id, survey.id)
                        .and_then(|s| s.last_updated),
                });
            }
        }

        lists
    }

    /// [`list_statuses`](Self::list_statuses) over every known client and survey.
    pub fn statuses(&self) -> StatusLists {
        self.list_statuses(&self.clients, &self.surveys)
    }

    pub fn client_answer(
        &self,
        client_id: ClientId,
        survey_id: SurveyId,
        question_id: &str,
    ) -> Option<&Answer> {
        self.sheet(client_id, survey_id)
            .and_then(|s| s.answer(question_id))
    }

    /// First question, in survey order, still lacking an answer.
    pub fn first_unanswered(
        &self,
        client_id: ClientId,
        survey_id: SurveyId,
    ) -> ModelResult<Option<&Question>> {
        self.require_client(client_id)?;
        let survey = self.require_survey(survey_id)?;
        let sheet = self.sheet(client_id, survey_id);
        Ok(survey
            .questions
            .iter()
            .find(|q| sheet.and_then(|s| s.answer(&q.id)).is_none()))
    }

    /// Every question of the survey with the client's answer and the grade.
    pub fn review(&self, client_id: ClientId, survey_id: SurveyId) -> ModelResult<Vec<ReviewItem<'_>>> {
        self.require_client(client_id)?;
        let survey = self.require_survey(survey_id)?;
        Ok(survey
            .questions
            .iter()
            .map(|question| ReviewItem {
                question,
                answer: self.client_answer(client_id, survey_id, &question.id),
                grade: self.grade(&question.id),
            })
            .collect())
    }

    fn answered(&self, client_id: ClientId, survey: &Survey) -> usize {
        self.sheet(client_id, survey.id)
            .map(|s| s.answered_count(&survey.questions))
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::{Answer, Client, GradePatch};
    use crate::model::fixtures::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rejects_unknown_question_without_side_effects() {
        let mut m = model();
        let err = m
            .record_answer(1, 101, "s1", Answer::YesNo(true))
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(m.sheet(1, 101).is_none());
    }

    #[test]
    fn rejects_unknown_client_and_survey() {
        let mut m = model();
        assert!(m.record_answer(9, 101, "q1", Answer::YesNo(true)).unwrap_err().is_not_found());
        assert!(m.record_answer(1, 999, "q1", Answer::YesNo(true)).unwrap_err().is_not_found());
        assert!(m.compute_progress(1, 999).unwrap_err().is_not_found());
    }

    #[test]
    fn shape_mismatch_keeps_previous_answer() {
        let mut m = model();
        m.record_answer(1, 101, "q4", Answer::text("CIS L1")).unwrap();
        let err = m
            .record_answer(1, 101, "q4", Answer::choices(["CIS L1"]))
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(m.client_answer(1, 101, "q4"), Some(&Answer::text("CIS L1")));
    }

    #[test]
    fn overwrite_replaces_value() {
        let mut m = model();
        m.record_answer(1, 101, "q3", Answer::Rating(2)).unwrap();
        m.record_answer(1, 101, "q3", Answer::Rating(4)).unwrap();
        assert_eq!(m.client_answer(1, 101, "q3"), Some(&Answer::Rating(4)));
        assert_eq!(m.sheet(1, 101).unwrap().answers.len(), 1);
    }

    #[test]
    fn empty_survey_progress_is_zero_and_never_listed() {
        let m = model();
        assert_eq!(m.compute_progress(1, 102).unwrap(), 0);
        let lists = m.statuses();
        assert!(lists.in_progress.is_empty());
        assert!(lists.needs_grading.is_empty());
    }

    #[test]
    fn statuses_follow_client_then_survey_order() {
        let mut m = model();
        m.record_answer(2, 101, "q1", Answer::YesNo(false)).unwrap();
        m.record_answer(1, 101, "q2", Answer::text("Windows only")).unwrap();

        let lists = m.statuses();
        let order: Vec<u64> = lists.in_progress.iter().map(|e| e.client_id).collect();
        assert_eq!(order, vec![1, 2]);
        assert_eq!(lists.in_progress[0].percent, 25);
        assert_eq!(lists.in_progress[0].last_updated, Some(clock().0));

        // Caller-supplied order wins
        let reversed = [Client::new(2, "Fabrikam Inc."), Client::new(1, "Contoso Ltd.")];
        let lists = m.list_statuses(&reversed, m.surveys());
        let order: Vec<u64> = lists.in_progress.iter().map(|e| e.client_id).collect();
        assert_eq!(order, vec![2, 1]);
    }

    #[test]
    fn first_unanswered_walks_survey_order() {
        let mut m = model();
        assert_eq!(m.first_unanswered(1, 101).unwrap().map(|q| q.id.as_str()), Some("q1"));
        m.record_answer(1, 101, "q1", Answer::YesNo(true)).unwrap();
        m.record_answer(1, 101, "q3", Answer::Rating(3)).unwrap();
        assert_eq!(m.first_unanswered(1, 101).unwrap().map(|q| q.id.as_str()), Some("q2"));
    }

    #[test]
    fn review_pairs_answers_with_grades() {
        let mut m = model();
        m.record_answer(1, 101, "q1", Answer::YesNo(true)).unwrap();
        m.set_grade("q1", GradePatch::score(4)).unwrap();

        let review = m.review(1, 101).unwrap();
        assert_eq!(review.len(), 4);
        assert_eq!(review[0].answer, Some(&Answer::YesNo(true)));
        assert_eq!(review[0].grade.map(|g| g.score), Some(4));
        assert_eq!(review[1].answer, None);
        assert_eq!(review[1].grade, None);
    }
}

use tracing::info;

use super::{invalid, not_found, SurveyResponseModel};
use crate::domain::{
    MoveDirection, Question, QuestionDraft, QuestionFormat, QuestionPatch, Survey, SurveyId,
    SurveyMetaPatch, MIN_SCALE,
};
use crate::error::ModelResult;

impl SurveyResponseModel {
    /// Add a fully formed survey. Survey ids and question ids must be unique.
    pub fn insert_survey(&mut self, survey: Survey) -> ModelResult<()> {
        if self.survey(survey.id).is_some() {
            return Err(invalid(format!("survey {} already exists", survey.id)));
        }
        if let Some(dup) = survey.duplicate_question_id() {
            return Err(invalid(format!(
                "question id {} appears twice in survey {}",
                dup, survey.id
            )));
        }
        for question in &survey.questions {
            check_format(&question.format)?;
        }
        self.surveys.push(survey);
        Ok(())
    }

    /// Create a blank survey and return its id.
    pub fn create_survey(&mut self) -> SurveyId {
        let id = self.next_survey_id();
        self.surveys.push(Survey::blank(id));
        info!(survey_id = id, "Survey created");
        id
    }

    /// Copy a survey under a new id; copied questions get fresh ids.
    pub fn duplicate_survey(&mut self, survey_id: SurveyId) -> ModelResult<SurveyId> {
        let source = self.require_survey(survey_id)?;
        let title = format!("{} (Copy)", source.title);
        let version = source.version.clone();
        let questions = source.questions.clone();

        let id = self.next_survey_id();
        let questions = questions
            .into_iter()
            .map(|q| Question {
                id: self.ids.next_id(),
                ..q
            })
            .collect();
        self.surveys
            .push(Survey::new(id, title, version).with_questions(questions));

        info!(source_id = survey_id, survey_id = id, "Survey duplicated");
        Ok(id)
    }

    pub fn update_survey_meta(
        &mut self,
        survey_id: SurveyId,
        patch: SurveyMetaPatch,
    ) -> ModelResult<&Survey> {
        let survey = self.require_survey_mut(survey_id)?;
        if let Some(title) = patch.title {
            survey.title = title;
        }
        if let Some(version) = patch.version {
            survey.version = version;
        }
        Ok(survey)
    }

    /// Append a question and return its generated id.
    pub fn add_question(&mut self, survey_id: SurveyId, draft: QuestionDraft) -> ModelResult<String> {
        self.require_survey(survey_id)?;
        check_format(&draft.format)?;
        if !draft.weight.is_finite() || draft.weight < 0.0 {
            return Err(invalid(format!(
                "weight must be a non-negative number, got {}",
                draft.weight
            )));
        }

        let id = self.ids.next_id();
        let question = Question {
            id: id.clone(),
            label: draft.label,
            format: draft.format,
            weight: draft.weight,
            required: draft.required,
        };
        self.require_survey_mut(survey_id)?.questions.push(question);

        info!(survey_id, question_id = %id, "Question added");
        Ok(id)
    }

    /// Edit a question. Answers the edited question no longer accepts are
    /// discarded, which stamps the affected sheets' `last_updated`.
    pub fn update_question(
        &mut self,
        survey_id: SurveyId,
        question_id: &str,
        patch: QuestionPatch,
    ) -> ModelResult<&Question> {
        let survey = self.require_survey(survey_id)?;
        let index = survey.position(question_id).ok_or_else(|| {
            not_found(format!("question {} in survey {}", question_id, survey_id))
        })?;
        let edited = survey.questions[index].patched(&patch).map_err(invalid)?;

        let now = self.clock.now();
        let mut dropped = 0;
        for sheet in self
            .responses
            .values_mut()
            .filter(|s| s.survey_id == survey_id)
        {
            let stale = sheet
                .answer(question_id)
                .map_or(false, |a| a.validate(&edited).is_err());
            if stale {
                sheet.answers.remove(question_id);
                sheet.last_updated = Some(now);
                dropped += 1;
            }
        }
        if dropped > 0 {
            info!(survey_id, question_id, dropped, "Discarded answers invalidated by edit");
        }

        let survey = self.require_survey_mut(survey_id)?;
        survey.questions[index] = edited;
        Ok(&survey.questions[index])
    }

    /// Delete a question along with every answer to it in this survey.
    ///
    /// The question's grade goes too once no survey contains the id.
    pub fn remove_question(&mut self, survey_id: SurveyId, question_id: &str) -> ModelResult<Question> {
        let now = self.clock.now();
        let survey = self.require_survey_mut(survey_id)?;
        let index = survey.position(question_id).ok_or_else(|| {
            not_found(format!("question {} in survey {}", question_id, survey_id))
        })?;
        let removed = survey.questions.remove(index);

        for sheet in self
            .responses
            .values_mut()
            .filter(|s| s.survey_id == survey_id)
        {
            if sheet.answers.remove(question_id).is_some() {
                sheet.last_updated = Some(now);
            }
        }

        let graded = !self.surveys.iter().any(|s| s.contains(question_id))
            && self.grades.remove(question_id).is_some();

        info!(survey_id, question_id, graded, "Question removed");
        Ok(removed)
    }

    /// Swap a question with its neighbour. Returns false at either end.
    pub fn move_question(
        &mut self,
        survey_id: SurveyId,
        question_id: &str,
        direction: MoveDirection,
    ) -> ModelResult<bool> {
        let survey = self.require_survey_mut(survey_id)?;
        let index = survey.position(question_id).ok_or_else(|| {
            not_found(format!("question {} in survey {}", question_id, survey_id))
        })?;

        let target = match direction {
            MoveDirection::Up => index.checked_sub(1),
            MoveDirection::Down => Some(index + 1).filter(|&i| i < survey.questions.len()),
        };
        match target {
            Some(target) => {
                survey.questions.swap(index, target);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Questions whose label contains the trimmed query, ignoring case.
    pub fn search_questions(&self, survey_id: SurveyId, query: &str) -> ModelResult<Vec<&Question>> {
        let survey = self.require_survey(survey_id)?;
        Ok(survey.questions.iter().filter(|q| q.matches(query)).collect())
    }

    fn next_survey_id(&self) -> SurveyId {
        self.surveys.iter().map(|s| s.id).max().unwrap_or(0) + 1
    }
}

fn check_format(format: &QuestionFormat) -> ModelResult<()> {
    match format {
        QuestionFormat::Rating { scale } if *scale < MIN_SCALE => Err(invalid(format!(
            "rating scale must be at least {}",
            MIN_SCALE
        ))),
        _ => Ok(()),
    }
}

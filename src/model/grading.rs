use tracing::info;

use super::{invalid, not_found, SurveyResponseModel};
use crate::domain::{total_score, Dashboard, Grade, GradePatch, Task, TaskStatus};
use crate::error::ModelResult;

impl SurveyResponseModel {
    /// Merge a partial score/comment into a question's grade, creating it if needed.
    pub fn set_grade(&mut self, question_id: &str, patch: GradePatch) -> ModelResult<&Grade> {
        self.require_question(question_id)?;
        patch.validate().map_err(invalid)?;

        let grade = self.grades.entry(question_id.to_string()).or_default();
        if let Some(score) = patch.score {
            grade.score = score;
        }
        if let Some(comment) = patch.comment {
            grade.comment = comment;
        }

        tracing::debug!(question_id, score = grade.score, "Grade updated");
        Ok(grade)
    }

    /// Append an open follow-up task under a question.
    pub fn add_task(&mut self, question_id: &str, text: &str) -> ModelResult<Task> {
        let text = text.trim();
        if text.is_empty() {
            return Err(invalid("task text must not be blank"));
        }
        self.require_question(question_id)?;

        let task = Task {
            id: self.ids.next_id(),
            text: text.to_string(),
            status: TaskStatus::Open,
        };
        self.grades
            .entry(question_id.to_string())
            .or_default()
            .tasks
            .push(task.clone());

        info!(question_id, task_id = %task.id, "Task added");
        Ok(task)
    }

    /// Set a task's status. Any status may follow any other.
    pub fn update_task_status(
        &mut self,
        question_id: &str,
        task_id: &str,
        status: TaskStatus,
    ) -> ModelResult<()> {
        let task = self
            .grades
            .get_mut(question_id)
            .and_then(|g| g.tasks.iter_mut().find(|t| t.id == task_id))
            .ok_or_else(|| {
                not_found(format!("task {} under question {}", task_id, question_id))
            })?;

        let previous = task.status;
        task.status = status;

        info!(question_id, task_id, from = %previous, to = %status, "Task status changed");
        Ok(())
    }

    /// Remove a task; unknown ids are a no-op. Returns whether anything was removed.
    pub fn remove_task(&mut self, question_id: &str, task_id: &str) -> bool {
        let Some(grade) = self.grades.get_mut(question_id) else {
            return false;
        };
        let before = grade.tasks.len();
        grade.tasks.retain(|t| t.id != task_id);
        let removed = grade.tasks.len() != before;

        if removed {
            info!(question_id, task_id, "Task removed");
        }
        removed
    }

    pub fn tasks(&self, question_id: &str) -> &[Task] {
        self.grade(question_id)
            .map(|g| g.tasks.as_slice())
            .unwrap_or(&[])
    }

    /// Naive total over every recorded grade; weights are not applied.
    pub fn total_score(&self) -> u32 {
        total_score(self.grades.values())
    }

    pub fn dashboard(&self) -> Dashboard {
        Dashboard {
            statuses: self.statuses(),
            total_score: self.total_score(),
        }
    }
}

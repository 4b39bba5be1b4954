//! Demo data: three clients, two cyber-hygiene surveys, a mix of finished and
//! partial responses, and reviewer grades for the first survey.
//!
//! Everything goes through the model's own operations, so the seed is
//! validated like any other input.

use std::sync::Arc;

use crate::domain::{Answer, Client, GradePatch, Question, QuestionFormat, Survey, TaskStatus};
use crate::error::ModelResult;
use crate::model::{ModelSnapshot, SurveyResponseModel};
use crate::services::{Clock, IdGenerator};

pub fn demo_clients() -> Vec<Client> {
    vec![
        Client::new(1, "Contoso Ltd."),
        Client::new(2, "Fabrikam Inc."),
        Client::new(3, "Northwind Traders"),
    ]
}

pub fn demo_surveys() -> Vec<Survey> {
    vec![
        Survey::new(101, "Cyber Hygiene v1.2", "1.2").with_questions(vec![
            Question::new("q1", "Inventory and Control of Hardware Assets", QuestionFormat::YesNo)
                .with_weight(10.0)
                .required(),
            Question::new(
                "q2",
                "Inventory and Control of Software Assets (notes)",
                QuestionFormat::Text,
            )
            .with_weight(10.0),
            Question::new(
                "q3",
                "Continuous Vulnerability Management (1-5)",
                QuestionFormat::Rating { scale: 5 },
            )
            .with_weight(15.0)
            .required(),
            Question::new(
                "q4",
                "Secure Configurations baseline",
                QuestionFormat::Select {
                    options: strings(&["CIS L1", "CIS L2", "Other"]),
                },
            )
            .with_weight(15.0)
            .required(),
        ]),
        Survey::new(102, "Cyber Hygiene v1.3 (Pilot)", "1.3").with_questions(vec![
            Question::new(
                "s1",
                "What best describes your device inventory practice?",
                QuestionFormat::Single {
                    options: strings(&[
                        "We track some devices informally",
                        "We maintain a spreadsheet",
                        "We use an asset tool with auto discovery",
                        "We have real-time CMDB and decommission flows",
                    ]),
                },
            )
            .required(),
            Question::new(
                "s2",
                "Which software inventory sources do you use?",
                QuestionFormat::Multi {
                    options: strings(&["MDM", "SCCM/Intune", "Jamf", "EDR/AV", "Other"]),
                },
            ),
            Question::new(
                "s3",
                "Patch cadence effectiveness",
                QuestionFormat::Rating { scale: 5 },
            ),
            Question::new(
                "s4",
                "Briefly describe your vulnerability remediation workflow",
                QuestionFormat::Text,
            ),
        ]),
    ]
}

/// Build the demo model with the given collaborators.
pub fn demo_model(
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
) -> ModelResult<SurveyResponseModel> {
    let mut model = SurveyResponseModel::new(ids, clock);
    for client in demo_clients() {
        model.insert_client(client)?;
    }
    for survey in demo_surveys() {
        model.insert_survey(survey)?;
    }

    // Contoso: 101 complete, 102 in progress
    model.record_answer(1, 101, "q1", Answer::YesNo(true))?;
    model.record_answer(
        1,
        101,
        "q2",
        Answer::text("Partial. Software inventory tracked only for Windows fleet."),
    )?;
    model.record_answer(1, 101, "q3", Answer::Rating(4))?;
    model.record_answer(1, 101, "q4", Answer::text("CIS L1"))?;
    model.record_answer(1, 102, "s1", Answer::text("We maintain a spreadsheet"))?;
    model.record_answer(1, 102, "s2", Answer::choices(["MDM", "EDR/AV"]))?;
    model.record_answer(1, 102, "s3", Answer::Rating(3))?;

    // Fabrikam: 101 half done
    model.record_answer(2, 101, "q1", Answer::YesNo(false))?;
    model.record_answer(2, 101, "q2", Answer::text("Not tracked."))?;

    // Northwind: 101 complete
    model.record_answer(3, 101, "q1", Answer::YesNo(true))?;
    model.record_answer(
        3,
        101,
        "q2",
        Answer::text("SaaS inventory plus endpoints collected via agent."),
    )?;
    model.record_answer(3, 101, "q3", Answer::Rating(5))?;
    model.record_answer(3, 101, "q4", Answer::text("CIS L2"))?;

    grade(
        &mut model,
        "q1",
        4,
        "Good maturity; move toward automated discovery for full coverage.",
        &[
            ("Evaluate auto-discovery with Lansweeper/CMDB", TaskStatus::Open),
            ("Add decommission checklist to SOP", TaskStatus::Review),
        ],
    )?;
    grade(
        &mut model,
        "q2",
        3,
        "Coverage is partial; unify sources via MDM + EDR for accuracy.",
        &[("Roll out MDM to remaining endpoints", TaskStatus::Attention)],
    )?;
    grade(
        &mut model,
        "q3",
        2,
        "Patch SLAs frequently missed; implement weekly cadence for crit vulns.",
        &[
            ("Define SLAs (7/30/90) by severity", TaskStatus::Open),
            ("Add SLA alerts to Slack", TaskStatus::Open),
        ],
    )?;
    grade(
        &mut model,
        "q4",
        5,
        "Clear workflow with ticketing + validation. Strong evidence provided.",
        &[],
    )?;

    Ok(model)
}

/// Demo data in store form, for seeding.
pub fn demo_snapshot(ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> ModelResult<ModelSnapshot> {
    Ok(demo_model(ids, clock)?.snapshot())
}

fn grade(
    model: &mut SurveyResponseModel,
    question_id: &str,
    score: u8,
    comment: &str,
    tasks: &[(&str, TaskStatus)],
) -> ModelResult<()> {
    model.set_grade(
        question_id,
        GradePatch {
            score: Some(score),
            comment: Some(comment.to_string()),
        },
    )?;
    for (text, status) in tasks {
        let task = model.add_task(question_id, text)?;
        if *status != TaskStatus::Open {
            model.update_task_status(question_id, &task.id, *status)?;
        }
    }
    Ok(())
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::clock;
    use crate::services::SequentialIdGenerator;
    use pretty_assertions::assert_eq;

    #[test]
    fn demo_dashboard() {
        let model = demo_model(Arc::new(SequentialIdGenerator::new("task")), clock()).unwrap();
        let dashboard = model.dashboard();

        let pairs = |entries: &Vec<crate::domain::StatusEntry>| {
            entries
                .iter()
                .map(|e| (e.client_id, e.survey_id, e.percent))
                .collect::<Vec<_>>()
        };
        assert_eq!(pairs(&dashboard.statuses.in_progress), vec![(1, 102, 75), (2, 101, 50)]);
        assert_eq!(pairs(&dashboard.statuses.needs_grading), vec![(1, 101, 100), (3, 101, 100)]);
        assert_eq!(dashboard.total_score, 14);
        assert_eq!(model.tasks("q2")[0].status, TaskStatus::Attention);
    }
}

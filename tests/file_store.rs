//! Seeding and reloading through the on-disk JSON store.

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use std::sync::Arc;

use survey_admin::domain::{Answer, GradePatch};
use survey_admin::seed;
use survey_admin::services::{FixedClock, JsonFileStore, Repository, SequentialIdGenerator};

fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock(Utc.with_ymd_and_hms(2026, 1, 5, 8, 0, 0).unwrap()))
}

#[test]
fn edits_survive_reopening_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("survey-admin.json");

    {
        let repo = Repository::new(Arc::new(JsonFileStore::open(&path).unwrap()));
        let defaults =
            seed::demo_snapshot(Arc::new(SequentialIdGenerator::new("seed")), clock()).unwrap();
        assert!(repo.seed_defaults(&defaults).unwrap() > 0);

        let mut model = repo
            .load(Arc::new(SequentialIdGenerator::new("a")), clock())
            .unwrap();
        model
            .record_answer(2, 101, "q3", Answer::Rating(2))
            .unwrap();
        model.set_grade("q2", GradePatch::comment("Needs Mac coverage")).unwrap();
        repo.save(&model).unwrap();
    }

    let repo = Repository::new(Arc::new(JsonFileStore::open(&path).unwrap()));
    // Seeding an already populated store writes nothing
    let defaults =
        seed::demo_snapshot(Arc::new(SequentialIdGenerator::new("seed")), clock()).unwrap();
    assert_eq!(repo.seed_defaults(&defaults).unwrap(), 0);

    let model = repo
        .load(Arc::new(SequentialIdGenerator::new("b")), clock())
        .unwrap();
    assert_eq!(model.compute_progress(2, 101).unwrap(), 75);
    assert_eq!(model.grade("q2").unwrap().comment, "Needs Mac coverage");
    assert_eq!(model.grade("q2").unwrap().score, 3);
    assert_eq!(model.total_score(), 14);
}

use qviz_core::{
    progress::{Achievement, ProgressRecord, ProgressTotals, PROGRESS_KEY},
    store::KvStore,
};

fn store() -> KvStore {
    let store = KvStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
}

#[test]
fn empty_store_plus_one_concept_learned() {
    let store = store();
    assert_eq!(store.get(PROGRESS_KEY).unwrap(), None);

    let record = store.record_concept_learned().expect("record");
    assert_eq!(record.concepts_learned, 1);
    assert!(record.simulations_completed.is_empty());
    assert_eq!(record.quizzes_completed, 0);
    assert_eq!(record.last_quiz_score, (0, 0));
    assert_eq!(record.ai_questions_asked, 0);

    assert_eq!(store.load_progress().unwrap(), record);
}

#[test]
fn record_round_trips_through_storage() {
    let store = store();
    let mut record = ProgressRecord::default();
    record.concept_learned();
    record.concept_learned();
    record.simulation_completed("tunneling");
    record.simulation_completed("double-slit");
    record.quiz_completed(2, 3);
    record.ai_question_asked();

    store.save_progress(&record).unwrap();
    assert_eq!(store.load_progress().unwrap(), record);

    let json = serde_json::to_string(&record).unwrap();
    let back: ProgressRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(back, record);
}

#[test]
fn stored_json_uses_camel_case_keys() {
    let mut record = ProgressRecord::default();
    record.quiz_completed(2, 3);
    let json: serde_json::Value = serde_json::to_value(&record).unwrap();
    assert_eq!(json["lastQuizScore"], serde_json::json!([2, 3]));
    assert_eq!(json["quizzesCompleted"], 1);
    assert!(json.get("conceptsLearned").is_some());
    assert!(json.get("aiQuestionsAsked").is_some());
    assert!(json["simulationsCompleted"].is_array());
}

#[test]
fn corrupt_record_defaults_instead_of_failing() {
    let store = store();
    store.set(PROGRESS_KEY, "{not json").unwrap();
    assert_eq!(store.load_progress().unwrap(), ProgressRecord::default());

    store.set(PROGRESS_KEY, "[1,2,3]").unwrap();
    assert_eq!(store.load_progress().unwrap(), ProgressRecord::default());

    // Corruption never blocks new progress.
    let record = store.record_ai_question().unwrap();
    assert_eq!(record.ai_questions_asked, 1);
}

#[test]
fn partial_record_defaults_each_field_independently() {
    let raw = r#"{"conceptsLearned": 4, "quizzesCompleted": "three", "simulationsCompleted": 2}"#;
    let record = ProgressRecord::parse_lenient(raw);
    assert_eq!(record.concepts_learned, 4);
    assert_eq!(record.quizzes_completed, 0);
    assert!(record.simulations_completed.is_empty());
    assert_eq!(record.ai_questions_asked, 0);
}

#[test]
fn completing_the_same_simulation_twice_counts_once() {
    let store = store();
    store.record_simulation_completed("tunneling").unwrap();
    let record = store.record_simulation_completed("tunneling").unwrap();
    assert_eq!(record.simulations_completed.len(), 1);
}

#[test]
fn quiz_records_last_score() {
    let store = store();
    store.record_quiz(1, 3).unwrap();
    let record = store.record_quiz(3, 3).unwrap();
    assert_eq!(record.quizzes_completed, 2);
    assert_eq!(record.last_quiz_score, (3, 3));
}

#[test]
fn overall_progress_and_achievements() {
    let totals = ProgressTotals::default();
    assert_eq!(totals.concepts, 10);
    let empty = ProgressRecord::default();
    assert_eq!(empty.overall_progress(totals), 0);
    assert!(empty.achievements(totals).is_empty());

    let mut record = ProgressRecord::default();
    for _ in 0..6 {
        record.concept_learned();
    }
    record.simulation_completed("tunneling");
    record.simulation_completed("double-slit");
    record.quiz_completed(2, 3);
    for _ in 0..5 {
        record.ai_question_asked();
    }
    // 6/10 concepts: 24 + 20 + 6.67 + 5
    assert_eq!(record.overall_progress(totals), 56);
    assert_eq!(
        record.achievements(totals),
        vec![
            Achievement::ConceptExplorer,
            Achievement::SimulationMaster,
            Achievement::QuizTaker,
            Achievement::CuriousLearner,
            Achievement::QuantumStudent,
        ]
    );
}

#[test]
fn maxed_out_record_is_a_scholar() {
    let totals = ProgressTotals::default();
    let mut record = ProgressRecord::default();
    for _ in 0..10 {
        record.concept_learned();
        record.quiz_completed(3, 3);
        record.ai_question_asked();
    }
    for id in ["tunneling", "double-slit", "schrodinger-cat"] {
        record.simulation_completed(id);
    }
    assert_eq!(record.overall_progress(totals), 100);
    let achievements = record.achievements(totals);
    assert!(achievements.contains(&Achievement::QuantumScholar));
    assert_eq!(Achievement::QuantumScholar.label(), "Quantum Scholar");
}

#[test]
fn file_backed_store_survives_reopen() {
    let path = std::env::temp_dir().join(format!("qviz-progress-{}.db", uuid::Uuid::new_v4()));
    let path = path.to_string_lossy().to_string();
    {
        let store = KvStore::open_migrated(&path).expect("open");
        store.record_concept_learned().unwrap();
        let again = store.reopen().expect("reopen");
        assert_eq!(again.load_progress().unwrap().concepts_learned, 1);
    }
    let store = KvStore::open_migrated(&path).expect("reopen from disk");
    assert_eq!(store.load_progress().unwrap().concepts_learned, 1);
    let _ = std::fs::remove_file(&path);
}

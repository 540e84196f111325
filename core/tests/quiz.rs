use qviz_core::{
    error::VizError,
    quiz::{Quiz, QUESTIONS},
    store::KvStore,
};

fn answer_all(quiz: &mut Quiz, answers: [usize; 3]) -> qviz_core::quiz::QuizResult {
    let mut result = None;
    for answer in answers {
        assert!(quiz.select(answer));
        quiz.submit().expect("submit");
        result = quiz.next();
    }
    result.expect("quiz finished")
}

#[test]
fn perfect_run_scores_every_question() {
    let mut quiz = Quiz::new();
    let correct = [QUESTIONS[0].correct, QUESTIONS[1].correct, QUESTIONS[2].correct];
    let result = answer_all(&mut quiz, correct);
    assert_eq!((result.score, result.total), (3, 3));
    assert_eq!(result.verdict(), "Perfect! You're a quantum master!");
    assert_eq!(quiz.progress_percent(), 100.0);
}

#[test]
fn last_answer_is_counted_once() {
    let mut quiz = Quiz::new();
    let result = answer_all(&mut quiz, [0, 1, 2]);
    assert_eq!(result.score, 2);
    assert_eq!(result.verdict(), "Keep learning! Quantum physics takes time to master.");
}

#[test]
fn submit_requires_a_selection() {
    let mut quiz = Quiz::new();
    assert!(matches!(quiz.submit(), Err(VizError::NoAnswerSelected)));
}

#[test]
fn answer_is_locked_once_revealed() {
    let mut quiz = Quiz::new();
    quiz.select(0);
    assert!(!quiz.submit().unwrap());
    assert!(!quiz.select(1), "selection is frozen while the explanation shows");
    assert_eq!(quiz.selected(), Some(0));
    assert_eq!(quiz.score(), 0);
}

#[test]
fn next_waits_for_the_explanation() {
    let mut quiz = Quiz::new();
    quiz.select(1);
    assert!(quiz.next().is_none());
    assert_eq!(quiz.index(), 0);
    quiz.submit().unwrap();
    assert!(quiz.next().is_none());
    assert_eq!(quiz.index(), 1);
    assert!(quiz.selected().is_none());
}

#[test]
fn out_of_range_selection_is_ignored() {
    let mut quiz = Quiz::new();
    assert!(!quiz.select(4));
    assert!(quiz.selected().is_none());
}

#[test]
fn reset_starts_over_and_result_feeds_progress() {
    let mut quiz = Quiz::new();
    let result = answer_all(&mut quiz, [1, 1, 2]);
    quiz.reset();
    assert_eq!(quiz.index(), 0);
    assert!(quiz.result().is_none());

    let store = KvStore::in_memory().unwrap();
    store.migrate().unwrap();
    let record = store.record_quiz(result.score, result.total).unwrap();
    assert_eq!(record.quizzes_completed, 1);
    assert_eq!(record.last_quiz_score, (3, 3));
}

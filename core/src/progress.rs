//! Learning progress: persisted counters and the report derived from them.
//!
//! RULES:
//!   - Counters only grow. Nothing in the application decrements them.
//!   - Parsing never fails: each field that is missing or malformed
//!     falls back to its default on its own, and the rest survive.

use crate::concept::ConceptId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Storage key for the serialized record.
pub const PROGRESS_KEY: &str = "quantum-learning-stats";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub concepts_learned:      u32,
    /// Ids of concepts whose simulation ran to completion.
    pub simulations_completed: BTreeSet<String>,
    pub quizzes_completed:     u32,
    /// (score, total) of the most recent quiz.
    pub last_quiz_score:       (u32, u32),
    pub ai_questions_asked:    u32,
}

impl ProgressRecord {
    /// Parse a stored record, defaulting field by field.
    pub fn parse_lenient(raw: &str) -> Self {
        let value: Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("progress record unreadable, starting fresh: {e}");
                return Self::default();
            }
        };
        let Some(obj) = value.as_object() else {
            log::warn!("progress record is not an object, starting fresh");
            return Self::default();
        };

        let mut record = Self::default();
        if let Some(v) = obj.get("conceptsLearned") {
            record.concepts_learned = field(v, "conceptsLearned");
        }
        if let Some(v) = obj.get("simulationsCompleted") {
            record.simulations_completed = field(v, "simulationsCompleted");
        }
        if let Some(v) = obj.get("quizzesCompleted") {
            record.quizzes_completed = field(v, "quizzesCompleted");
        }
        if let Some(v) = obj.get("lastQuizScore") {
            record.last_quiz_score = field(v, "lastQuizScore");
        }
        if let Some(v) = obj.get("aiQuestionsAsked") {
            record.ai_questions_asked = field(v, "aiQuestionsAsked");
        }
        record
    }

    // ── Mutators ───────────────────────────────────────────────

    pub fn concept_learned(&mut self) {
        self.concepts_learned = self.concepts_learned.saturating_add(1);
    }

    /// Mark a simulation completed. Returns false if it already was.
    pub fn simulation_completed(&mut self, concept: &str) -> bool {
        self.simulations_completed.insert(concept.to_string())
    }

    pub fn quiz_completed(&mut self, score: u32, total: u32) {
        self.quizzes_completed = self.quizzes_completed.saturating_add(1);
        self.last_quiz_score = (score.min(total), total);
    }

    pub fn ai_question_asked(&mut self) {
        self.ai_questions_asked = self.ai_questions_asked.saturating_add(1);
    }

    // ── Report ─────────────────────────────────────────────────

    /// Overall progress in percent, 0..=100.
    pub fn overall_progress(&self, totals: ProgressTotals) -> u32 {
        let ratio = |n: f64, d: u32| if d == 0 { 0.0 } else { (n / d as f64).min(1.0) };
        let concepts = ratio(self.concepts_learned as f64, totals.concepts);
        let sims = ratio(self.simulations_completed.len() as f64, totals.simulations);
        let quizzes = self.quizzes_completed.min(3) as f64 / 3.0;
        let questions = self.ai_questions_asked.min(10) as f64 / 10.0;
        (concepts * 40.0 + sims * 30.0 + quizzes * 20.0 + questions * 10.0).round() as u32
    }

    pub fn achievements(&self, totals: ProgressTotals) -> Vec<Achievement> {
        let overall = self.overall_progress(totals);
        let mut earned = Vec::new();
        if self.concepts_learned >= 3 {
            earned.push(Achievement::ConceptExplorer);
        }
        if self.simulations_completed.len() >= 2 {
            earned.push(Achievement::SimulationMaster);
        }
        if self.quizzes_completed >= 1 {
            earned.push(Achievement::QuizTaker);
        }
        if self.ai_questions_asked >= 5 {
            earned.push(Achievement::CuriousLearner);
        }
        if overall >= 50 {
            earned.push(Achievement::QuantumStudent);
        }
        if overall >= 80 {
            earned.push(Achievement::QuantumScholar);
        }
        earned
    }
}

fn field<T: serde::de::DeserializeOwned + Default>(value: &Value, name: &str) -> T {
    match T::deserialize(value) {
        Ok(v) => v,
        Err(e) => {
            log::warn!("progress field {name} malformed, using default: {e}");
            T::default()
        }
    }
}

/// Denominators for the progress report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressTotals {
    pub concepts:    u32,
    /// Concepts whose simulation can complete.
    pub simulations: u32,
}

impl Default for ProgressTotals {
    fn default() -> Self {
        Self { concepts: ConceptId::ALL.len() as u32, simulations: 3 }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Achievement {
    ConceptExplorer,
    SimulationMaster,
    QuizTaker,
    CuriousLearner,
    QuantumStudent,
    QuantumScholar,
}

impl Achievement {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ConceptExplorer  => "Concept Explorer",
            Self::SimulationMaster => "Simulation Master",
            Self::QuizTaker        => "Quiz Taker",
            Self::CuriousLearner   => "Curious Learner",
            Self::QuantumStudent   => "Quantum Student",
            Self::QuantumScholar   => "Quantum Scholar",
        }
    }
}

//! The three-question concept quiz.

use crate::error::{VizError, VizResult};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct QuizQuestion {
    pub question:    &'static str,
    pub options:     [&'static str; 4],
    pub correct:     usize,
    pub explanation: &'static str,
}

pub static QUESTIONS: [QuizQuestion; 3] = [
    QuizQuestion {
        question: "What happens when you observe a quantum particle in the double-slit experiment?",
        options: [
            "It creates an interference pattern",
            "It behaves like a particle and goes through one slit",
            "It disappears completely",
            "It splits into multiple particles",
        ],
        correct: 1,
        explanation: "When observed, the particle's wave function collapses and it behaves like a \
                      classical particle, going through one slit and creating two bands instead \
                      of an interference pattern.",
    },
    QuizQuestion {
        question: "What is quantum superposition?",
        options: [
            "When particles move very fast",
            "When particles exist in multiple states simultaneously",
            "When particles are very small",
            "When particles have no mass",
        ],
        correct: 1,
        explanation: "Quantum superposition is the principle that quantum systems can exist in \
                      multiple states at the same time until they are measured or observed.",
    },
    QuizQuestion {
        question: "In Schrödinger's cat thought experiment, what causes the cat to be in a definite state?",
        options: [
            "Time passing",
            "The cat's movement",
            "Opening the box (observation)",
            "The radioactive decay",
        ],
        correct: 2,
        explanation: "The act of observation (opening the box) causes the quantum superposition \
                      to collapse into a definite state: either alive or dead.",
    },
];

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct QuizResult {
    pub score: u32,
    pub total: u32,
}

impl QuizResult {
    pub fn verdict(&self) -> &'static str {
        if self.score == self.total {
            "Perfect! You're a quantum master!"
        } else if self.score as f64 >= self.total as f64 * 0.7 {
            "Great job! You understand the basics well."
        } else {
            "Keep learning! Quantum physics takes time to master."
        }
    }
}

/// Quiz walk-through: select, submit (reveals the explanation), next.
#[derive(Debug, Clone, Default)]
pub struct Quiz {
    current:  usize,
    selected: Option<usize>,
    revealed: bool,
    score:    u32,
    result:   Option<QuizResult>,
}

impl Quiz {
    pub fn new() -> Self { Self::default() }

    pub fn question(&self) -> &'static QuizQuestion {
        &QUESTIONS[self.current.min(QUESTIONS.len() - 1)]
    }

    pub fn index(&self) -> usize { self.current }
    pub fn selected(&self) -> Option<usize> { self.selected }
    pub fn is_revealed(&self) -> bool { self.revealed }
    pub fn score(&self) -> u32 { self.score }
    pub fn result(&self) -> Option<QuizResult> { self.result }

    /// Pick an answer. Ignored once the explanation is showing, the quiz
    /// is over, or the index is not an option. Returns whether it took.
    pub fn select(&mut self, answer: usize) -> bool {
        if self.revealed || self.result.is_some() || answer >= self.question().options.len() {
            return false;
        }
        self.selected = Some(answer);
        true
    }

    /// Lock in the selected answer and reveal the explanation.
    /// Returns whether it was correct.
    pub fn submit(&mut self) -> VizResult<bool> {
        let answer = self.selected.ok_or(VizError::NoAnswerSelected)?;
        if self.revealed {
            return Ok(answer == self.question().correct);
        }
        self.revealed = true;
        let correct = answer == self.question().correct;
        if correct {
            self.score += 1;
        }
        Ok(correct)
    }

    /// Move on after the explanation. Returns the result once the last
    /// question is done.
    pub fn next(&mut self) -> Option<QuizResult> {
        if !self.revealed || self.result.is_some() {
            return self.result;
        }
        if self.current + 1 < QUESTIONS.len() {
            self.current += 1;
            self.selected = None;
            self.revealed = false;
            return None;
        }
        let result = QuizResult { score: self.score, total: QUESTIONS.len() as u32 };
        self.result = Some(result);
        Some(result)
    }

    /// Percent of questions answered, counting the revealed one.
    pub fn progress_percent(&self) -> f64 {
        let answered = self.current + usize::from(self.revealed || self.result.is_some());
        answered.min(QUESTIONS.len()) as f64 / QUESTIONS.len() as f64 * 100.0
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

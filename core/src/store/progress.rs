//! Store methods for the learning progress record.

use crate::{
    error::VizResult,
    progress::{ProgressRecord, PROGRESS_KEY},
};

use super::KvStore;

impl KvStore {
    /// Load the record. Absent or corrupt data yields defaults.
    pub fn load_progress(&self) -> VizResult<ProgressRecord> {
        Ok(match self.get(PROGRESS_KEY)? {
            Some(raw) => ProgressRecord::parse_lenient(&raw),
            None => ProgressRecord::default(),
        })
    }

    pub fn save_progress(&self, record: &ProgressRecord) -> VizResult<()> {
        let raw = serde_json::to_string(record)?;
        self.set(PROGRESS_KEY, &raw)
    }

    /// Load, apply `f`, save. Returns the updated record.
    pub fn update_progress(&self, f: impl FnOnce(&mut ProgressRecord)) -> VizResult<ProgressRecord> {
        let mut record = self.load_progress()?;
        f(&mut record);
        self.save_progress(&record)?;
        Ok(record)
    }

    pub fn record_concept_learned(&self) -> VizResult<ProgressRecord> {
        self.update_progress(ProgressRecord::concept_learned)
    }

    pub fn record_simulation_completed(&self, concept: &str) -> VizResult<ProgressRecord> {
        self.update_progress(|r| {
            if r.simulation_completed(concept) {
                log::debug!("simulation {concept} completed for the first time");
            }
        })
    }

    pub fn record_quiz(&self, score: u32, total: u32) -> VizResult<ProgressRecord> {
        self.update_progress(|r| r.quiz_completed(score, total))
    }

    pub fn record_ai_question(&self) -> VizResult<ProgressRecord> {
        self.update_progress(ProgressRecord::ai_question_asked)
    }
}

//! Concept registry. Maps a ConceptId to the strategy that draws it.
//!
//! Registration order is display order (tab order in the UI).

use crate::{
    concept::{Concept, ConceptId, ConceptInfo},
    concepts,
    config::RunnerConfig,
    error::{VizError, VizResult},
    runner::SimulationRunner,
    scheduler::FrameScheduler,
};

pub type ConceptFactory = fn() -> Box<dyn Concept>;

pub struct ConceptRegistry {
    entries: Vec<(ConceptId, ConceptFactory)>,
}

impl ConceptRegistry {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Registry with every built-in concept registered.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(ConceptId::WaveParticle, || Box::new(concepts::WaveParticle));
        registry.register(ConceptId::Tunneling, || Box::new(concepts::Tunneling));
        registry.register(ConceptId::DoubleSlit, || Box::new(concepts::DoubleSlit));
        registry.register(ConceptId::SchrodingerCat, || Box::new(concepts::SchrodingerCat));
        registry.register(ConceptId::Entanglement, || Box::new(concepts::Entanglement));
        registry.register(ConceptId::Uncertainty, || Box::new(concepts::Uncertainty));
        registry.register(ConceptId::Superposition, || Box::new(concepts::Superposition));
        registry.register(ConceptId::WaveEquation, || Box::new(concepts::WaveEquation));
        registry.register(ConceptId::Orbitals, || Box::new(concepts::Orbitals));
        registry.register(ConceptId::QubitCircuit, || Box::new(concepts::QubitCircuit));
        registry
    }

    /// Register a concept. A second registration for the same id
    /// replaces the first.
    pub fn register(&mut self, id: ConceptId, factory: ConceptFactory) {
        if let Some(entry) = self.entries.iter_mut().find(|(existing, _)| *existing == id) {
            entry.1 = factory;
        } else {
            self.entries.push((id, factory));
        }
    }

    pub fn ids(&self) -> Vec<ConceptId> {
        self.entries.iter().map(|(id, _)| *id).collect()
    }

    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn create(&self, id: ConceptId) -> VizResult<Box<dyn Concept>> {
        self.entries
            .iter()
            .find(|(existing, _)| *existing == id)
            .map(|(_, factory)| factory())
            .ok_or_else(|| VizError::UnknownConcept { id: id.to_string() })
    }

    pub fn catalog(&self) -> Vec<ConceptInfo> {
        self.entries
            .iter()
            .map(|(_, factory)| ConceptInfo::of(factory().as_ref()))
            .collect()
    }

    /// Mount a fresh runner for `id` on the given scheduler.
    pub fn mount<S: FrameScheduler>(
        &self,
        id: ConceptId,
        scheduler: S,
        config: &RunnerConfig,
    ) -> VizResult<SimulationRunner<S>> {
        let concept = self.create(id)?;
        Ok(SimulationRunner::new(concept, scheduler, config))
    }
}

impl Default for ConceptRegistry {
    fn default() -> Self { Self::standard() }
}

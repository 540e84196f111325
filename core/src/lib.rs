//! Core of the quantum concept visualizer: simulation runners, concept
//! renderers, parameters, progress/chat persistence and the gateway contract.

pub mod chat;
pub mod clock;
pub mod concept;
pub mod concepts;
pub mod config;
pub mod error;
pub mod event;
pub mod gateway;
pub mod params;
pub mod progress;
pub mod qubit;
pub mod quiz;
pub mod registry;
pub mod render;
pub mod rng;
pub mod runner;
pub mod scene;
pub mod scheduler;
pub mod snapshot;
pub mod store;
pub mod types;

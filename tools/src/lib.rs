//! Gateway server and headless runner for the quantum concept visualizer.

pub mod api;
pub mod headless;
pub mod upstream;

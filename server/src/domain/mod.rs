//! Domain services

pub mod prediction;

pub use prediction::{FlightFeatures, PredictionService};

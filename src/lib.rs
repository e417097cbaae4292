//! # Particle Detector
//!
//! A simplified simulation of a general-purpose collider detector in the
//! style of ATLAS and CMS: particles with relativistic four-momenta are passed
//! through a tracker, two calorimeters and a muon spectrometer, each applying
//! Gaussian energy smearing, and the resulting readings are turned into
//! event-level physics observables.
//!
//! ## Features
//! - Validated four-momentum with kinematic quantities (m, pT, |p|, η)
//! - Closed particle family with per-flavor detectability
//! - Sub-detectors with energy-loss fraction and resolution smearing
//! - ATLAS and CMS parameter sets, serializable as JSON
//! - Particle identification, missing transverse energy, invariant mass
//!
//! ## Architecture
//!
//! ```text
//! Particle ──► Detector ──► DetectorReadings ──┬──► identify_particle
//!                 │                            ├──► detected_energy ──► MET
//!     ┌───────────┼───────────┐                └──► invariant mass (true p)
//!     │  Tracker → ECAL → HCAL → Muon │
//!     └───────────────────────┘
//! ```

// Core modules
pub mod error;
pub mod validation;
pub mod momentum;
pub mod particles;

// Detector and analysis
pub mod detector;
pub mod events;

// Integration tests
#[cfg(test)]
mod tests;

// Re-exports
pub use error::DetectorError;
pub use momentum::FourMomentum;
pub use particles::{Particle, ParticleFlavor};
pub use detector::{
    DetectionRecord, Detector, DetectorBuilder, DetectorConfig, DetectorName, DetectorReadings,
    DetectorStatus, Identification, InvariantMassReport, LayerGeometry, LayerSpec, MetWarning,
    MissingEnergyReport, Reading, ReferenceResonance, SubDetector, SubDetectorKind,
};
pub use events::{process_event, EventKind, EventReport, PhysicsEvent};

/// Result type for detector operations
pub type DetectorResult<T> = Result<T, DetectorError>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        // Kinematics and particles
        FourMomentum,
        Particle,
        ParticleFlavor,
        // Detector
        Detector,
        DetectorBuilder,
        DetectorConfig,
        DetectorName,
        DetectorReadings,
        SubDetector,
        SubDetectorKind,
        // Analysis
        Identification,
        InvariantMassReport,
        MissingEnergyReport,
        // Events
        EventKind,
        PhysicsEvent,
        process_event,
        // Errors
        DetectorError,
        DetectorResult,
    };
}

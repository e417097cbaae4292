//! # Detector
//!
//! A named detector (ATLAS or CMS) owning exactly one of each sub-detector,
//! traversed innermost first.
//!
//! ```text
//!   particle (true E)
//!        │
//!        ▼
//!   ┌─────────┐  E₁   ┌─────────┐  E₂   ┌─────────┐  E₃   ┌─────────┐
//!   │ Tracker │──────►│  ECAL   │──────►│  HCAL   │──────►│  Muon   │
//!   └────┬────┘       └────┬────┘       └────┬────┘       └────┬────┘
//!        ▼                 ▼                 ▼                 ▼
//!   ┌──────────────────────────────────────────────────────────────┐
//!   │                      DetectorReadings                        │
//!   └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The propagated energy is replaced only by a non-zero reading; a stage that
//! cannot see the particle passes the previous value through unchanged.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use particle_detector::prelude::*;
//!
//! let mut detector = Detector::from_name("ATLAS")?;
//! detector.set_status(true);
//! let readings = detector.detect_particle(&photon)?;
//! println!("{}", Detector::identify_particle(&readings));
//! ```

pub mod analysis;
pub mod config;
pub mod layers;
pub mod readings;

pub use analysis::{
    DetectionRecord, Identification, InvariantMassReport, MetWarning, MissingEnergyReport,
    ReferenceResonance,
};
pub use config::{DetectorConfig, DetectorName, LayerSpec};
pub use layers::{LayerGeometry, SubDetector, SubDetectorKind};
pub use readings::{DetectorReadings, Reading};

use crate::particles::Particle;
use crate::{DetectorError, DetectorResult};
use log::{debug, info};
use std::fmt;

/// Number of sub-detectors in a valid configuration
pub const REQUIRED_SUB_DETECTORS: usize = 4;

/// On/off state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetectorStatus {
    #[default]
    Off,
    On,
}

impl DetectorStatus {
    pub fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }
}

impl From<bool> for DetectorStatus {
    fn from(on: bool) -> Self {
        if on {
            Self::On
        } else {
            Self::Off
        }
    }
}

impl fmt::Display for DetectorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::On => "ON",
            Self::Off => "OFF",
        })
    }
}

/// Check for exactly one sub-detector of each kind
pub fn validate_composition(sub_detectors: &[SubDetector]) -> DetectorResult<()> {
    if sub_detectors.len() != REQUIRED_SUB_DETECTORS {
        return Err(DetectorError::logic(format!(
            "detector requires exactly {} sub-detectors, got {}",
            REQUIRED_SUB_DETECTORS,
            sub_detectors.len()
        )));
    }
    for kind in SubDetectorKind::all() {
        let count = sub_detectors.iter().filter(|s| s.kind() == kind).count();
        if count != 1 {
            return Err(DetectorError::logic(format!(
                "detector requires exactly one {}, got {}",
                kind, count
            )));
        }
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// BUILDER
// ═══════════════════════════════════════════════════════════════════════════════

/// Assembles a [`Detector`]; composition is checked once, in [`build`](Self::build)
pub struct DetectorBuilder {
    name: DetectorName,
    sub_detectors: Vec<SubDetector>,
}

impl DetectorBuilder {
    pub fn new(name: DetectorName) -> Self {
        Self {
            name,
            sub_detectors: Vec::new(),
        }
    }

    /// Register a sub-detector; traversal follows registration order
    pub fn sub_detector(mut self, sub_detector: SubDetector) -> Self {
        self.sub_detectors.push(sub_detector);
        self
    }

    /// Add the named detector's standard parameter set
    pub fn standard_configuration(self) -> DetectorResult<Self> {
        let config = DetectorConfig::for_detector(self.name);
        self.configure(&config)
    }

    /// Add every sub-detector of `config`
    pub fn configure(mut self, config: &DetectorConfig) -> DetectorResult<Self> {
        if !self.sub_detectors.is_empty() {
            return Err(DetectorError::logic(format!(
                "{} sub-detectors already added",
                self.name
            )));
        }
        for (index, spec) in config.sub_detectors.iter().enumerate() {
            self.sub_detectors.push(spec.build(config.seed_for(index))?);
        }
        Ok(self)
    }

    pub fn build(self) -> DetectorResult<Detector> {
        validate_composition(&self.sub_detectors)?;
        let detector = Detector {
            name: self.name,
            sub_detectors: self.sub_detectors,
            status: DetectorStatus::Off,
        };
        info!(
            "{} detector configured with {} sub-detectors",
            detector.name,
            detector.sub_detectors.len()
        );
        Ok(detector)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DETECTOR
// ═══════════════════════════════════════════════════════════════════════════════

/// A full detector: one tracker, EM calorimeter, hadronic calorimeter and muon
/// spectrometer. Not `Clone`; it exclusively owns its sub-detectors.
#[derive(Debug)]
pub struct Detector {
    name: DetectorName,
    sub_detectors: Vec<SubDetector>,
    status: DetectorStatus,
}

impl Detector {
    /// Detector with its standard parameter set, generators seeded from entropy
    pub fn new(name: DetectorName) -> DetectorResult<Self> {
        DetectorBuilder::new(name).standard_configuration()?.build()
    }

    /// Parse the name ("ATLAS" or "CMS") and build the standard detector
    pub fn from_name(name: &str) -> DetectorResult<Self> {
        Self::new(name.parse()?)
    }

    pub fn from_config(config: &DetectorConfig) -> DetectorResult<Self> {
        DetectorBuilder::new(config.name).configure(config)?.build()
    }

    pub fn name(&self) -> DetectorName {
        self.name
    }

    pub fn status(&self) -> DetectorStatus {
        self.status
    }

    pub fn is_on(&self) -> bool {
        self.status.is_on()
    }

    pub fn set_status(&mut self, on: bool) {
        self.status = on.into();
        info!("{} detector turned {}", self.name, self.status);
    }

    /// Sub-detectors in traversal order
    pub fn sub_detectors(&self) -> &[SubDetector] {
        &self.sub_detectors
    }

    pub fn sub_detector(&self, kind: SubDetectorKind) -> Option<&SubDetector> {
        self.sub_detectors.iter().find(|s| s.kind() == kind)
    }

    /// Current parameters as a serializable config
    pub fn config(&self) -> DetectorConfig {
        DetectorConfig {
            name: self.name,
            sub_detectors: self.sub_detectors.iter().map(LayerSpec::from).collect(),
            seed: None,
        }
    }

    /// Pass `particle` through every sub-detector in order.
    ///
    /// Each stage sees the most recent non-zero reading as its incoming energy,
    /// starting from the particle's true energy.
    pub fn detect_particle(&self, particle: &Particle) -> DetectorResult<DetectorReadings> {
        if !self.is_on() {
            return Err(DetectorError::invalid_argument(format!(
                "{} detector is off; turn it on before detecting particles",
                self.name
            )));
        }
        if particle.momentum().is_null() {
            return Err(DetectorError::invalid_argument(format!(
                "{} (id {}) has zero four-momentum",
                particle.name(),
                particle.id()
            )));
        }

        let mut readings = DetectorReadings::new();
        let mut current_energy = particle.energy();
        for sub_detector in &self.sub_detectors {
            let measured = sub_detector.detect_particle(particle, current_energy)?;
            debug!(
                "{} [{}]: incoming {:.3} GeV, measured {:.3} GeV",
                sub_detector.type_name(),
                particle.name(),
                current_energy,
                measured
            );
            readings.record(sub_detector.kind(), measured);
            if measured != 0.0 {
                current_energy = measured;
            }
        }
        Ok(readings)
    }

    /// Configuration block
    pub fn summary(&self) -> String {
        let mut s = format!("=== {} Detector ===\n", self.name);
        s.push_str(&format!("Status: {}\n", self.status));
        for sub_detector in &self.sub_detectors {
            s.push_str(&format!("\n{}\n", sub_detector));
            s.push_str(&format!(
                "Energy loss fraction: {:.2}\n",
                sub_detector.energy_loss_fraction()
            ));
        }
        s
    }
}

impl fmt::Display for Detector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

//! Demonstration physics events
//!
//! Three fixed final states, one per reference resonance:
//!
//! | Event | Final state |
//! |-------|-------------|
//! | Higgs Decay | H → γγ |
//! | Z Boson Decay | Z → e⁻e⁺ |
//! | Top Quark Decay | t → b μ ν (leptonic W) |

use crate::detector::{
    DetectionRecord, Detector, DetectorName, DetectorReadings, InvariantMassReport,
    MissingEnergyReport,
};
use crate::momentum::FourMomentum;
use crate::particles::Particle;
use crate::{DetectorError, DetectorResult};
use log::info;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Available demonstration events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Higgs,
    ZBoson,
    TopQuark,
}

impl EventKind {
    pub fn all() -> [Self; 3] {
        [Self::Higgs, Self::ZBoson, Self::TopQuark]
    }

    /// Event name, also the reference-resonance key
    pub fn name(&self) -> &'static str {
        match self {
            Self::Higgs => "Higgs Decay",
            Self::ZBoson => "Z Boson Decay",
            Self::TopQuark => "Top Quark Decay",
        }
    }

    /// Short name used on the command line
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Higgs => "higgs",
            Self::ZBoson => "z",
            Self::TopQuark => "top",
        }
    }

    pub fn build(&self) -> DetectorResult<PhysicsEvent> {
        match self {
            Self::Higgs => PhysicsEvent::higgs_decay(),
            Self::ZBoson => PhysicsEvent::z_boson_decay(),
            Self::TopQuark => PhysicsEvent::top_quark_decay(),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EventKind {
    type Err = DetectorError;

    fn from_str(s: &str) -> DetectorResult<Self> {
        Self::all()
            .into_iter()
            .find(|kind| kind.short_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                DetectorError::invalid_argument(format!(
                    "unknown event '{}': expected higgs, z or top",
                    s
                ))
            })
    }
}

/// A named set of particles leaving the collision point
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsEvent {
    pub name: String,
    pub particles: Vec<Particle>,
}

impl PhysicsEvent {
    pub fn new(name: impl Into<String>, particles: Vec<Particle>) -> Self {
        Self {
            name: name.into(),
            particles,
        }
    }

    /// H → γγ
    pub fn higgs_decay() -> DetectorResult<Self> {
        Ok(Self::new(
            EventKind::Higgs.name(),
            vec![
                Particle::photon(1, FourMomentum::new(30.0, 25.0, 0.0, 60.0)?)?,
                Particle::photon(2, FourMomentum::new(-25.0, -28.0, 0.0, 65.0)?)?,
            ],
        ))
    }

    /// Z → e⁻e⁺
    pub fn z_boson_decay() -> DetectorResult<Self> {
        Ok(Self::new(
            EventKind::ZBoson.name(),
            vec![
                Particle::electron(1, FourMomentum::new(20.0, 30.0, 10.0, 45.0)?)?,
                Particle::positron(2, FourMomentum::new(-15.0, -25.0, -5.0, 35.0)?)?,
            ],
        ))
    }

    /// t → b W, W → μ ν
    pub fn top_quark_decay() -> DetectorResult<Self> {
        Ok(Self::new(
            EventKind::TopQuark.name(),
            vec![
                Particle::hadron(
                    1,
                    FourMomentum::new(40.0, 10.0, 30.0, 80.0)?,
                    "b_quark",
                    -1.0 / 3.0,
                )?,
                Particle::muon(2, FourMomentum::new(15.0, 25.0, 10.0, 40.0)?)?,
                Particle::neutrino(3, FourMomentum::new(5.0, 15.0, 20.0, 45.0)?)?,
            ],
        ))
    }
}

/// Outcome of running one event through a detector
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventReport {
    pub event_name: String,
    pub detector: DetectorName,
    pub records: Vec<DetectionRecord>,
    pub invariant_mass: InvariantMassReport,
    pub missing_energy: MissingEnergyReport,
}

impl EventReport {
    pub fn summary(&self) -> String {
        let mut s = format!("===== {} ({}) =====\n", self.event_name, self.detector);
        for record in &self.records {
            s.push_str(&record.summary());
        }
        s.push('\n');
        s.push_str(&self.invariant_mass.summary());
        s.push_str("\n\n");
        s.push_str(&self.missing_energy.summary());
        s
    }
}

/// Detect every particle of `event`, then compute the event observables.
///
/// The detector is switched on for each particle and off again afterwards,
/// also when detection fails.
pub fn process_event(detector: &mut Detector, event: &PhysicsEvent) -> DetectorResult<EventReport> {
    info!(
        "Processing {} ({} particles) with {}",
        event.name,
        event.particles.len(),
        detector.name()
    );

    let mut records: Vec<DetectionRecord> = Vec::with_capacity(event.particles.len());
    for particle in &event.particles {
        detector.set_status(true);
        let result = detector.detection_record(particle);
        detector.set_status(false);
        records.push(result?);
    }

    let all_readings: Vec<DetectorReadings> = records.iter().map(|r| r.readings.clone()).collect();
    let invariant_mass = detector.calculate_invariant_mass(&event.particles, &event.name)?;
    let missing_energy =
        detector.calculate_missing_energy(&event.particles, &all_readings, &event.name)?;

    info!("Finished {}", event.name);
    Ok(EventReport {
        event_name: event.name.clone(),
        detector: detector.name(),
        records,
        invariant_mass,
        missing_energy,
    })
}

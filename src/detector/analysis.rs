//! Event analysis
//!
//! Turns per-particle readings into physics observables:
//!
//! - particle identification from the pattern of fired sub-detectors
//! - missing transverse energy (MET) from true vs detected transverse momenta
//! - system invariant mass with an optional reference-resonance check

use super::readings::DetectorReadings;
use super::Detector;
use crate::momentum::FourMomentum;
use crate::particles::{Particle, ParticleFlavor};
use crate::{DetectorError, DetectorResult};
use log::{info, warn};
use serde::Serialize;
use std::fmt;

/// Detected MET above this is suspicious (GeV)
pub const MET_WARNING_THRESHOLD: f64 = 10.0;

// ═══════════════════════════════════════════════════════════════════════════════
// IDENTIFICATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Classification from the fired sub-detectors
///
/// | Tracker | ECAL | HCAL | Muon | Result |
/// |---------|------|------|------|--------|
/// |         |  ●   |      |      | Photon |
/// |   ●     |  ●   |      |      | Electron or Positron |
/// |   ●     |      |  ●   |      | Hadron |
/// |   ●     |      |      |  ●   | Muon |
/// |         |      |      |      | Nothing detected |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Identification {
    #[serde(rename = "Photon")]
    Photon,
    #[serde(rename = "Electron or Positron")]
    ElectronOrPositron,
    #[serde(rename = "Hadron")]
    Hadron,
    #[serde(rename = "Muon")]
    Muon,
    #[serde(rename = "Nothing Detected (Possible Neutrino)")]
    NothingDetected,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl Identification {
    /// Classify a signature mask (bit 0 tracker .. bit 3 muon spectrometer)
    pub fn from_signature(mask: u8) -> Self {
        match mask {
            0b0010 => Self::Photon,
            0b0011 => Self::ElectronOrPositron,
            0b0101 => Self::Hadron,
            0b1001 => Self::Muon,
            0b0000 => Self::NothingDetected,
            _ => Self::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Photon => "Photon",
            Self::ElectronOrPositron => "Electron or Positron",
            Self::Hadron => "Hadron",
            Self::Muon => "Muon",
            Self::NothingDetected => "Nothing Detected (Possible Neutrino)",
            Self::Unknown => "Unknown",
        }
    }

    /// Whether a particle of `flavor` would be classified this way
    pub fn matches(&self, flavor: ParticleFlavor) -> bool {
        matches!(
            (self, flavor),
            (Self::Photon, ParticleFlavor::Photon)
                | (Self::ElectronOrPositron, ParticleFlavor::Electron)
                | (Self::ElectronOrPositron, ParticleFlavor::Positron)
                | (Self::Hadron, ParticleFlavor::Hadron)
                | (Self::Muon, ParticleFlavor::Muon)
                | (Self::NothingDetected, ParticleFlavor::Neutrino)
        )
    }
}

impl fmt::Display for Identification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// REFERENCE RESONANCES
// ═══════════════════════════════════════════════════════════════════════════════

/// Known resonances for invariant-mass annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReferenceResonance {
    Higgs,
    ZBoson,
    TopQuark,
}

impl ReferenceResonance {
    /// Resonance expected for an event name
    pub fn for_event(event_name: &str) -> Option<Self> {
        match event_name {
            "Higgs Decay" => Some(Self::Higgs),
            "Z Boson Decay" => Some(Self::ZBoson),
            "Top Quark Decay" | "Anti-Top Quark Decay" => Some(Self::TopQuark),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Higgs => "Higgs boson",
            Self::ZBoson => "Z boson",
            Self::TopQuark => "top quark",
        }
    }

    /// Nominal mass (GeV)
    pub fn mass(&self) -> f64 {
        match self {
            Self::Higgs => 125.0,
            Self::ZBoson => 91.2,
            Self::TopQuark => 173.0,
        }
    }

    /// Accepted window half-width (GeV)
    pub fn tolerance(&self) -> f64 {
        match self {
            Self::Higgs | Self::TopQuark => 10.0,
            Self::ZBoson => 5.0,
        }
    }

    pub fn is_consistent(&self, mass: f64) -> bool {
        (mass - self.mass()).abs() < self.tolerance()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// REPORTS
// ═══════════════════════════════════════════════════════════════════════════════

/// MET sanity warning; informational only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MetWarning {
    /// Detected MET is larger than the true MET
    DetectedExceedsTrue,
    /// Detected MET is above [`MET_WARNING_THRESHOLD`]
    AboveThreshold,
}

impl fmt::Display for MetWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DetectedExceedsTrue => write!(
                f,
                "detected MET exceeds true MET; this may indicate detector mismeasurement"
            ),
            Self::AboveThreshold => write!(
                f,
                "significant detected MET (> {} GeV); possible invisible particles",
                MET_WARNING_THRESHOLD
            ),
        }
    }
}

/// Missing transverse energy of an event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingEnergyReport {
    pub event_name: String,
    pub true_energy: f64,
    pub detected_energy: f64,
    /// True minus detected energy
    pub invisible_energy: f64,
    pub true_met: f64,
    pub detected_met: f64,
    pub warning: Option<MetWarning>,
}

impl MissingEnergyReport {
    pub fn summary(&self) -> String {
        let mut s = format!("=== Missing Energy: {} ===\n", self.event_name);
        s.push_str(&format!("True total energy:     {:.3} GeV\n", self.true_energy));
        s.push_str(&format!("Detected total energy: {:.3} GeV\n", self.detected_energy));
        s.push_str(&format!("Invisible energy:      {:.3} GeV\n", self.invisible_energy));
        s.push_str(&format!("True MET:              {:.3} GeV\n", self.true_met));
        s.push_str(&format!("Detected MET:          {:.3} GeV\n", self.detected_met));
        if let Some(warning) = self.warning {
            s.push_str(&format!("WARNING: {}\n", warning));
        }
        s
    }
}

/// System invariant mass of an event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvariantMassReport {
    pub event_name: String,
    /// GeV
    pub mass: f64,
    pub reference: Option<ReferenceResonance>,
    /// Whether `mass` falls in the reference window
    pub consistent: Option<bool>,
}

impl InvariantMassReport {
    pub fn summary(&self) -> String {
        let mut s = format!(
            "Invariant mass for {}: {:.3} GeV",
            self.event_name, self.mass
        );
        if let (Some(reference), Some(consistent)) = (self.reference, self.consistent) {
            s.push_str(&format!(
                "\n{} {} decay (expected {:.1} ± {:.0} GeV)",
                if consistent {
                    "Consistent with"
                } else {
                    "Not consistent with"
                },
                reference.name(),
                reference.mass(),
                reference.tolerance()
            ));
        }
        s
    }
}

/// Everything worth presenting about one detected particle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionRecord {
    pub particle_id: u32,
    pub particle_name: String,
    pub flavor: ParticleFlavor,
    pub charge: f64,
    pub momentum: FourMomentum,
    pub true_energy: f64,
    pub transverse_momentum: f64,
    pub invariant_mass: f64,
    pub momentum_magnitude: f64,
    pub pseudorapidity: f64,
    pub readings: DetectorReadings,
    /// Sum over all sub-detector readings
    pub total_detected_energy: f64,
    pub identification: Identification,
}

impl DetectionRecord {
    pub fn new(particle: &Particle, readings: DetectorReadings) -> Self {
        let momentum = *particle.momentum();
        Self {
            particle_id: particle.id(),
            particle_name: particle.name().to_string(),
            flavor: particle.flavor(),
            charge: particle.charge(),
            momentum,
            true_energy: momentum.energy(),
            transverse_momentum: momentum.transverse_momentum(),
            invariant_mass: momentum.invariant_mass(),
            momentum_magnitude: momentum.momentum_magnitude(),
            pseudorapidity: momentum.pseudorapidity(),
            total_detected_energy: readings.total_energy(),
            identification: Detector::identify_particle(&readings),
            readings,
        }
    }

    pub fn summary(&self) -> String {
        let mut s = format!(
            "--- {} (id {}, charge {}) ---\n",
            self.particle_name, self.particle_id, self.charge
        );
        s.push_str(&format!("Four-momentum {}\n", self.momentum));
        s.push_str(&format!(
            "pT = {:.3} GeV, |p| = {:.3} GeV, m = {:.3} GeV, η = {:.3}\n",
            self.transverse_momentum, self.momentum_magnitude, self.invariant_mass, self.pseudorapidity
        ));
        for reading in &self.readings {
            s.push_str(&format!(
                "  {:<22} {:>10.3} GeV\n",
                reading.sub_detector.name(),
                reading.energy
            ));
        }
        s.push_str(&format!(
            "Total detected energy: {:.3} GeV (true {:.3} GeV)\n",
            self.total_detected_energy, self.true_energy
        ));
        s.push_str(&format!("Identified as: {}\n", self.identification));
        s
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DETECTOR ANALYSIS
// ═══════════════════════════════════════════════════════════════════════════════

impl Detector {
    /// Classify from which sub-detectors reported positive energy
    pub fn identify_particle(readings: &DetectorReadings) -> Identification {
        let mask = readings
            .iter()
            .filter(|r| r.fired())
            .fold(0u8, |mask, r| mask | r.sub_detector.signature_bit());
        Identification::from_signature(mask)
    }

    /// Last non-zero reading in reverse registration order, 0 if none fired.
    ///
    /// Not a sum: the outermost stage that saw the particle defines the
    /// detected energy.
    pub fn detected_energy(readings: &DetectorReadings) -> f64 {
        readings
            .iter()
            .rev()
            .map(|r| r.energy)
            .find(|&energy| energy != 0.0)
            .unwrap_or(0.0)
    }

    /// Compare true and detected transverse momentum balance.
    ///
    /// Detected (px, py) per particle are the true components scaled by
    /// `detected / true` energy, so direction is preserved.
    pub fn calculate_missing_energy(
        &self,
        particles: &[Particle],
        all_readings: &[DetectorReadings],
        event_name: &str,
    ) -> DetectorResult<MissingEnergyReport> {
        if particles.len() != all_readings.len() {
            return Err(DetectorError::invalid_argument(format!(
                "{} particles but {} reading sets",
                particles.len(),
                all_readings.len()
            )));
        }

        let (mut true_px, mut true_py, mut true_energy) = (0.0, 0.0, 0.0);
        let (mut detected_px, mut detected_py, mut detected_energy) = (0.0, 0.0, 0.0);

        for (particle, readings) in particles.iter().zip(all_readings) {
            let momentum = particle.momentum();
            true_px += momentum.px();
            true_py += momentum.py();
            true_energy += momentum.energy();

            let detected = Self::detected_energy(readings);
            if momentum.energy() > 0.0 {
                let scale = detected / momentum.energy();
                detected_px += momentum.px() * scale;
                detected_py += momentum.py() * scale;
            }
            detected_energy += detected;
        }

        let true_met = f64::hypot(true_px, true_py);
        let detected_met = f64::hypot(detected_px, detected_py);

        let warning = if detected_met > true_met {
            Some(MetWarning::DetectedExceedsTrue)
        } else if detected_met > MET_WARNING_THRESHOLD {
            Some(MetWarning::AboveThreshold)
        } else {
            None
        };
        if let Some(warning) = warning {
            warn!("{} [{}]: {}", event_name, self.name(), warning);
        }

        Ok(MissingEnergyReport {
            event_name: event_name.to_string(),
            true_energy,
            detected_energy,
            invisible_energy: true_energy - detected_energy,
            true_met,
            detected_met,
            warning,
        })
    }

    /// Invariant mass of the combined true four-momenta, annotated against
    /// the resonance the event name refers to.
    pub fn calculate_invariant_mass(
        &self,
        particles: &[Particle],
        event_name: &str,
    ) -> DetectorResult<InvariantMassReport> {
        if particles.len() < 2 {
            return Err(DetectorError::invalid_argument(format!(
                "invariant mass needs at least 2 particles, got {}",
                particles.len()
            )));
        }

        let momenta: Vec<FourMomentum> = particles.iter().map(|p| *p.momentum()).collect();
        let mass = FourMomentum::system_invariant_mass(&momenta)?;
        let reference = ReferenceResonance::for_event(event_name);
        let consistent = reference.map(|r| r.is_consistent(mass));

        let report = InvariantMassReport {
            event_name: event_name.to_string(),
            mass,
            reference,
            consistent,
        };
        info!("{} [{}]: {}", event_name, self.name(), report.summary().replace('\n', "; "));
        Ok(report)
    }

    /// Detect `particle` and package the result for presentation
    pub fn detection_record(&self, particle: &Particle) -> DetectorResult<DetectionRecord> {
        let readings = self.detect_particle(particle)?;
        Ok(DetectionRecord::new(particle, readings))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

//! Particle Types
//!
//! The particle family is closed: electrons, positrons, photons, muons,
//! neutrinos and hadrons. Every flavor except the hadron has a fixed name and
//! charge; hadrons may carry any valid name and a charge that is an integer
//! multiple of e/3.
//!
//! | Flavor   | Charge | Seen by                                  |
//! |----------|--------|------------------------------------------|
//! | Electron | −1     | Tracker, EM Calorimeter                  |
//! | Positron | +1     | Tracker, EM Calorimeter                  |
//! | Photon   | 0      | EM Calorimeter                           |
//! | Muon     | −1     | Tracker, Muon Spectrometer               |
//! | Neutrino | 0      | nothing                                  |
//! | Hadron   | n/3    | Tracker, Hadronic Calorimeter            |

use crate::detector::SubDetectorKind;
use crate::momentum::FourMomentum;
use crate::validation::{is_valid_identifier, is_valid_real};
use crate::{DetectorError, DetectorResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Id given to particles built with the default constructors
pub const DEFAULT_PARTICLE_ID: u32 = 1;

/// Name of the default hadron
pub const DEFAULT_HADRON_NAME: &str = "Neutron";

// ═══════════════════════════════════════════════════════════════════════════════
// PARTICLE FLAVORS
// ═══════════════════════════════════════════════════════════════════════════════

/// Particle flavors known to the detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticleFlavor {
    Electron,
    Positron,
    Photon,
    Muon,
    Neutrino,
    Hadron,
}

impl ParticleFlavor {
    /// Get all flavors
    pub fn all() -> [Self; 6] {
        [
            Self::Electron,
            Self::Positron,
            Self::Photon,
            Self::Muon,
            Self::Neutrino,
            Self::Hadron,
        ]
    }

    /// Canonical name; the only accepted name for fixed-identity flavors
    pub fn canonical_name(&self) -> &'static str {
        match self {
            Self::Electron => "Electron",
            Self::Positron => "Positron",
            Self::Photon => "Photon",
            Self::Muon => "Muon",
            Self::Neutrino => "Neutrino",
            Self::Hadron => DEFAULT_HADRON_NAME,
        }
    }

    /// Fixed charge in units of e (`None` for hadrons, whose charge varies)
    pub fn fixed_charge(&self) -> Option<f64> {
        match self {
            Self::Electron | Self::Muon => Some(-1.0),
            Self::Positron => Some(1.0),
            Self::Photon | Self::Neutrino => Some(0.0),
            Self::Hadron => None,
        }
    }

    /// Whether a sub-detector of the given kind registers this flavor
    pub fn can_be_detected_by(&self, kind: SubDetectorKind) -> bool {
        use SubDetectorKind::*;
        match self {
            Self::Electron | Self::Positron => matches!(kind, Tracker | EmCalorimeter),
            Self::Photon => matches!(kind, EmCalorimeter),
            Self::Muon => matches!(kind, Tracker | MuonSpectrometer),
            Self::Hadron => matches!(kind, Tracker | HadronicCalorimeter),
            Self::Neutrino => false,
        }
    }
}

impl fmt::Display for ParticleFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Hadron => "Hadron",
            other => other.canonical_name(),
        })
    }
}

/// Charge is an integer multiple of e/3
fn is_third_integral(charge: f64) -> bool {
    let scaled = charge * 3.0;
    (scaled - scaled.round()).abs() < f64::EPSILON * 100.0
}

// ═══════════════════════════════════════════════════════════════════════════════
// PARTICLE
// ═══════════════════════════════════════════════════════════════════════════════

/// A particle entering the detector
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Particle {
    id: u32,
    flavor: ParticleFlavor,
    name: String,
    charge: f64,
    momentum: FourMomentum,
}

impl Particle {
    /// Create a fixed-identity particle of `flavor`.
    ///
    /// Hadrons get the default name and zero charge; use [`Particle::hadron`]
    /// for anything else.
    pub fn new(flavor: ParticleFlavor, id: u32, momentum: FourMomentum) -> DetectorResult<Self> {
        let charge = flavor.fixed_charge().unwrap_or(0.0);
        Self::build(flavor, id, flavor.canonical_name(), charge, momentum)
    }

    /// Create a hadron with a custom name and fractional charge
    pub fn hadron(
        id: u32,
        momentum: FourMomentum,
        name: impl Into<String>,
        charge: f64,
    ) -> DetectorResult<Self> {
        Self::build(ParticleFlavor::Hadron, id, name, charge, momentum)
    }

    pub fn electron(id: u32, momentum: FourMomentum) -> DetectorResult<Self> {
        Self::new(ParticleFlavor::Electron, id, momentum)
    }

    pub fn positron(id: u32, momentum: FourMomentum) -> DetectorResult<Self> {
        Self::new(ParticleFlavor::Positron, id, momentum)
    }

    pub fn photon(id: u32, momentum: FourMomentum) -> DetectorResult<Self> {
        Self::new(ParticleFlavor::Photon, id, momentum)
    }

    pub fn muon(id: u32, momentum: FourMomentum) -> DetectorResult<Self> {
        Self::new(ParticleFlavor::Muon, id, momentum)
    }

    pub fn neutrino(id: u32, momentum: FourMomentum) -> DetectorResult<Self> {
        Self::new(ParticleFlavor::Neutrino, id, momentum)
    }

    /// Default particle of a flavor: id 1, zero four-momentum
    pub fn default_of(flavor: ParticleFlavor) -> Self {
        Self {
            id: DEFAULT_PARTICLE_ID,
            flavor,
            name: flavor.canonical_name().to_string(),
            charge: flavor.fixed_charge().unwrap_or(0.0),
            momentum: FourMomentum::zero(),
        }
    }

    fn build(
        flavor: ParticleFlavor,
        id: u32,
        name: impl Into<String>,
        charge: f64,
        momentum: FourMomentum,
    ) -> DetectorResult<Self> {
        let mut particle = Self::default_of(flavor);
        particle.set_id(id)?;
        particle.set_name(name)?;
        particle.set_charge(charge)?;
        particle.set_momentum(momentum);
        Ok(particle)
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn flavor(&self) -> ParticleFlavor {
        self.flavor
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Charge in units of e
    pub fn charge(&self) -> f64 {
        self.charge
    }

    pub fn momentum(&self) -> &FourMomentum {
        &self.momentum
    }

    /// True energy
    pub fn energy(&self) -> f64 {
        self.momentum.energy()
    }

    pub fn set_id(&mut self, id: u32) -> DetectorResult<()> {
        if id == 0 {
            return Err(DetectorError::invalid_argument(
                "particle id must be a positive integer",
            ));
        }
        self.id = id;
        Ok(())
    }

    /// Rename the particle; fixed-identity flavors accept only their own name
    pub fn set_name(&mut self, name: impl Into<String>) -> DetectorResult<()> {
        let name = name.into();
        if !is_valid_identifier(&name) {
            return Err(DetectorError::invalid_argument(format!(
                "invalid {} name '{}': must be 1-100 letters, digits or underscores",
                self.flavor, name
            )));
        }
        if self.flavor != ParticleFlavor::Hadron && name != self.flavor.canonical_name() {
            return Err(DetectorError::invalid_argument(format!(
                "invalid name for {}: must be '{}', got '{}'",
                self.flavor,
                self.flavor.canonical_name(),
                name
            )));
        }
        self.name = name;
        Ok(())
    }

    /// Set the charge; hadrons need a multiple of 1/3, other flavors their fixed value
    pub fn set_charge(&mut self, charge: f64) -> DetectorResult<()> {
        if !is_valid_real(charge) {
            return Err(DetectorError::invalid_argument(format!(
                "invalid charge {} for {}",
                charge, self.flavor
            )));
        }

        let accepted = match self.flavor.fixed_charge() {
            Some(fixed) => charge == fixed,
            None => is_third_integral(charge),
        };
        if !accepted {
            let rule = match self.flavor.fixed_charge() {
                Some(fixed) => format!("must be {}", fixed),
                None => "must be a multiple of 1/3".to_string(),
            };
            return Err(DetectorError::invalid_argument(format!(
                "invalid charge {} for {}: {}",
                charge, self.flavor, rule
            )));
        }

        self.charge = charge;
        Ok(())
    }

    /// Replace the four-momentum; `FourMomentum` values are valid by construction
    pub fn set_momentum(&mut self, momentum: FourMomentum) {
        self.momentum = momentum;
    }

    /// Whether a sub-detector of the given kind registers this particle
    pub fn can_be_detected_by(&self, kind: SubDetectorKind) -> bool {
        self.flavor.can_be_detected_by(kind)
    }

    /// Same lookup keyed by sub-detector type name; unknown names are never detectors
    pub fn can_be_detected_by_name(&self, type_name: &str) -> bool {
        type_name
            .parse::<SubDetectorKind>()
            .map(|kind| self.can_be_detected_by(kind))
            .unwrap_or(false)
    }
}

impl fmt::Display for Particle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Particle: {}", self.name)?;
        writeln!(f, "Four-momentum {}", self.momentum)?;
        writeln!(f, "ID: {}", self.id)?;
        write!(f, "Charge (e): {}", self.charge)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

//! Sub-Detector Layers
//!
//! One measurement stage of the detector, innermost first:
//!
//! ```text
//!   ┌───────────────────────────────────────────────┐
//!   │  MUON SPECTROMETER   drift tubes / RPC / TGC  │
//!   │  ┌─────────────────────────────────────────┐  │
//!   │  │  HADRONIC CALORIMETER   steel + tiles   │  │
//!   │  │  ┌───────────────────────────────────┐  │  │
//!   │  │  │  EM CALORIMETER   LAr / PbWO4     │  │  │
//!   │  │  │  ┌─────────────────────────────┐  │  │  │
//!   │  │  │  │  TRACKER   silicon          │  │  │  │
//!   │  │  │  │          ● collision        │  │  │  │
//!   │  │  │  └─────────────────────────────┘  │  │  │
//!   │  │  └───────────────────────────────────┘  │  │
//!   │  └─────────────────────────────────────────┘  │
//!   └───────────────────────────────────────────────┘
//! ```
//!
//! Each stage absorbs a fixed fraction of the incoming energy and reports it
//! with Gaussian smearing whose width is `resolution`% of the mean. The
//! smearing generator lives inside the sub-detector behind a `RefCell`:
//! measuring is logically read-only but advances the generator state.

use crate::particles::Particle;
use crate::validation::{describe, is_valid_identifier, validate_allowed};
use crate::{DetectorError, DetectorResult};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::str::FromStr;

/// Resolution is a percentage
pub const MAX_RESOLUTION: u32 = 100;

/// Allowed EM calorimeter absorber / active materials
pub const EM_CALORIMETER_MATERIALS: &[&str] = &["LAr", "W", "Pb", "Cu", "PbWO4"];

/// Allowed hadronic calorimeter materials
pub const HADRONIC_CALORIMETER_MATERIALS: &[&str] = &["Steel", "PST", "W", "Cu", "LAr", "Brass"];

/// Allowed muon chamber technologies
pub const MUON_CHAMBER_TYPES: &[&str] = &["MDT", "RPC", "TGC", "CSC", "sTGC", "MM"];

const MATERIAL_DESCRIPTIONS: &[(&str, &str)] = &[
    ("LAr", "Liquid Argon (LAr)"),
    ("W", "Tungsten (W)"),
    ("Pb", "Lead (Pb)"),
    ("PbWO4", "Lead-Tungsten Crystals (PbWO4)"),
    ("Cu", "Copper (Cu)"),
    ("Steel", "Steel"),
    ("Brass", "Brass"),
    ("PST", "Plastic Scintillator Tiles (PST)"),
];

const CHAMBER_DESCRIPTIONS: &[(&str, &str)] = &[
    ("MDT", "Monitored Drift Tubes (MDT)"),
    ("RPC", "Resistive Plate Chambers (RPC)"),
    ("TGC", "Thin Gap Chambers (TGC)"),
    ("CSC", "Cathode Strip Chambers (CSC)"),
    ("sTGC", "Small Thin Gap Chambers (sTGC)"),
    ("MM", "MicroMegas (MM)"),
];

/// Full name of a calorimeter material code
pub fn material_description(code: &str) -> &str {
    describe(code, MATERIAL_DESCRIPTIONS)
}

/// Full name of a muon chamber code
pub fn chamber_description(code: &str) -> &str {
    describe(code, CHAMBER_DESCRIPTIONS)
}

// ═══════════════════════════════════════════════════════════════════════════════
// SUB-DETECTOR KINDS
// ═══════════════════════════════════════════════════════════════════════════════

/// Types of sub-detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SubDetectorKind {
    /// Inner tracker - closest to collision point
    #[serde(rename = "Tracker")]
    Tracker,
    /// Electromagnetic calorimeter
    #[serde(rename = "EM Calorimeter")]
    EmCalorimeter,
    /// Hadronic calorimeter
    #[serde(rename = "Hadronic Calorimeter")]
    HadronicCalorimeter,
    /// Muon spectrometer - outermost
    #[serde(rename = "Muon Spectrometer")]
    MuonSpectrometer,
}

impl SubDetectorKind {
    /// Get all kinds in order from inner to outer
    pub fn all() -> [Self; 4] {
        [
            Self::Tracker,
            Self::EmCalorimeter,
            Self::HadronicCalorimeter,
            Self::MuonSpectrometer,
        ]
    }

    /// Type name used as the reading key
    pub fn name(&self) -> &'static str {
        match self {
            Self::Tracker => "Tracker",
            Self::EmCalorimeter => "EM Calorimeter",
            Self::HadronicCalorimeter => "Hadronic Calorimeter",
            Self::MuonSpectrometer => "Muon Spectrometer",
        }
    }

    /// Bit in the identification signature mask
    pub fn signature_bit(&self) -> u8 {
        match self {
            Self::Tracker => 0b0001,
            Self::EmCalorimeter => 0b0010,
            Self::HadronicCalorimeter => 0b0100,
            Self::MuonSpectrometer => 0b1000,
        }
    }
}

impl fmt::Display for SubDetectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SubDetectorKind {
    type Err = DetectorError;

    fn from_str(s: &str) -> DetectorResult<Self> {
        Self::all()
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| DetectorError::logic(format!("unknown sub-detector type: {}", s)))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// LAYER GEOMETRY
// ═══════════════════════════════════════════════════════════════════════════════

/// Descriptive, type-specific data of a sub-detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LayerGeometry {
    #[serde(rename = "Tracker")]
    Tracker { material: String, subsystems: u32 },
    #[serde(rename = "EM Calorimeter")]
    EmCalorimeter { layers: u32, materials: Vec<String> },
    #[serde(rename = "Hadronic Calorimeter")]
    HadronicCalorimeter { layers: u32, materials: Vec<String> },
    #[serde(rename = "Muon Spectrometer")]
    MuonSpectrometer { chambers: Vec<String> },
}

impl LayerGeometry {
    pub fn kind(&self) -> SubDetectorKind {
        match self {
            Self::Tracker { .. } => SubDetectorKind::Tracker,
            Self::EmCalorimeter { .. } => SubDetectorKind::EmCalorimeter,
            Self::HadronicCalorimeter { .. } => SubDetectorKind::HadronicCalorimeter,
            Self::MuonSpectrometer { .. } => SubDetectorKind::MuonSpectrometer,
        }
    }

    /// Default geometry of each kind
    pub fn default_of(kind: SubDetectorKind) -> Self {
        let owned = |codes: &[&str]| -> Vec<String> { codes.iter().map(|c| c.to_string()).collect() };
        match kind {
            SubDetectorKind::Tracker => Self::Tracker {
                material: "Silicon".to_string(),
                subsystems: 3,
            },
            SubDetectorKind::EmCalorimeter => Self::EmCalorimeter {
                layers: 3,
                materials: owned(&["LAr", "W", "Pb"]),
            },
            SubDetectorKind::HadronicCalorimeter => Self::HadronicCalorimeter {
                layers: 3,
                materials: owned(&["Steel", "PST"]),
            },
            SubDetectorKind::MuonSpectrometer => Self::MuonSpectrometer {
                chambers: owned(&["MDT", "RPC", "TGC", "CSC"]),
            },
        }
    }

    /// Check every descriptive field against its rules
    pub fn validate(&self) -> DetectorResult<()> {
        match self {
            Self::Tracker { material, .. } => validate_tracker_material(material),
            Self::EmCalorimeter { materials, .. } => {
                validate_allowed(materials, EM_CALORIMETER_MATERIALS, "EM Calorimeter material")
            }
            Self::HadronicCalorimeter { materials, .. } => validate_allowed(
                materials,
                HADRONIC_CALORIMETER_MATERIALS,
                "Hadronic Calorimeter material",
            ),
            Self::MuonSpectrometer { chambers } => {
                validate_allowed(chambers, MUON_CHAMBER_TYPES, "muon chamber type")
            }
        }
    }
}

fn validate_tracker_material(material: &str) -> DetectorResult<()> {
    if is_valid_identifier(material) {
        Ok(())
    } else {
        Err(DetectorError::invalid_argument(format!(
            "invalid Tracker material '{}': must be 1-100 letters, digits or underscores",
            material
        )))
    }
}

fn wrong_kind(kind: SubDetectorKind, what: &str) -> DetectorError {
    DetectorError::invalid_argument(format!("{} has no {}", kind, what))
}

fn write_list(f: &mut fmt::Formatter<'_>, title: &str, items: &[&str]) -> fmt::Result {
    write!(f, "\n{}:", title)?;
    if items.is_empty() {
        return write!(f, " None");
    }
    for item in items {
        write!(f, "\n- {}", item)?;
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// SUB-DETECTOR
// ═══════════════════════════════════════════════════════════════════════════════

/// A single measurement stage
///
/// Deliberately not `Clone`: each instance owns its own generator and
/// stands for one physical instrument.
pub struct SubDetector {
    geometry: LayerGeometry,
    /// Resolution in percent (0 = perfect)
    resolution: u32,
    /// Fraction of the incoming energy deposited here
    energy_loss_fraction: f64,
    rng: RefCell<StdRng>,
}

impl SubDetector {
    /// Create a sub-detector seeded from OS entropy
    pub fn new(geometry: LayerGeometry, resolution: u32, energy_loss_fraction: f64) -> DetectorResult<Self> {
        geometry.validate()?;
        let mut sub_detector = Self {
            geometry,
            resolution: 0,
            energy_loss_fraction: 1.0,
            rng: RefCell::new(StdRng::from_entropy()),
        };
        sub_detector.set_resolution(resolution)?;
        sub_detector.set_energy_loss_fraction(energy_loss_fraction)?;
        Ok(sub_detector)
    }

    /// Ideal sub-detector of a kind: perfect resolution, full absorption, default geometry
    pub fn default_of(kind: SubDetectorKind) -> Self {
        Self {
            geometry: LayerGeometry::default_of(kind),
            resolution: 0,
            energy_loss_fraction: 1.0,
            rng: RefCell::new(StdRng::from_entropy()),
        }
    }

    pub fn tracker(
        resolution: u32,
        energy_loss_fraction: f64,
        material: impl Into<String>,
        subsystems: u32,
    ) -> DetectorResult<Self> {
        let geometry = LayerGeometry::Tracker {
            material: material.into(),
            subsystems,
        };
        Self::new(geometry, resolution, energy_loss_fraction)
    }

    pub fn em_calorimeter<S: Into<String>>(
        resolution: u32,
        energy_loss_fraction: f64,
        layers: u32,
        materials: impl IntoIterator<Item = S>,
    ) -> DetectorResult<Self> {
        let geometry = LayerGeometry::EmCalorimeter {
            layers,
            materials: materials.into_iter().map(Into::into).collect(),
        };
        Self::new(geometry, resolution, energy_loss_fraction)
    }

    pub fn hadronic_calorimeter<S: Into<String>>(
        resolution: u32,
        energy_loss_fraction: f64,
        layers: u32,
        materials: impl IntoIterator<Item = S>,
    ) -> DetectorResult<Self> {
        let geometry = LayerGeometry::HadronicCalorimeter {
            layers,
            materials: materials.into_iter().map(Into::into).collect(),
        };
        Self::new(geometry, resolution, energy_loss_fraction)
    }

    pub fn muon_spectrometer<S: Into<String>>(
        resolution: u32,
        energy_loss_fraction: f64,
        chambers: impl IntoIterator<Item = S>,
    ) -> DetectorResult<Self> {
        let geometry = LayerGeometry::MuonSpectrometer {
            chambers: chambers.into_iter().map(Into::into).collect(),
        };
        Self::new(geometry, resolution, energy_loss_fraction)
    }

    /// Seed the smearing generator deterministically (construction-time only)
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }

    pub fn kind(&self) -> SubDetectorKind {
        self.geometry.kind()
    }

    /// Type name, also the reading key
    pub fn type_name(&self) -> &'static str {
        self.kind().name()
    }

    pub fn geometry(&self) -> &LayerGeometry {
        &self.geometry
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn energy_loss_fraction(&self) -> f64 {
        self.energy_loss_fraction
    }

    /// Calorimeter layer count (`None` for tracker and muon spectrometer)
    pub fn layers(&self) -> Option<u32> {
        match &self.geometry {
            LayerGeometry::EmCalorimeter { layers, .. }
            | LayerGeometry::HadronicCalorimeter { layers, .. } => Some(*layers),
            _ => None,
        }
    }

    /// The type name is fixed per kind; only the matching name is accepted
    pub fn set_type_name(&mut self, name: &str) -> DetectorResult<()> {
        if name == self.type_name() {
            Ok(())
        } else {
            Err(DetectorError::invalid_argument(format!(
                "invalid sub-detector type '{}': must be '{}'",
                name,
                self.type_name()
            )))
        }
    }

    pub fn set_resolution(&mut self, resolution: u32) -> DetectorResult<()> {
        if resolution > MAX_RESOLUTION {
            return Err(DetectorError::invalid_argument(format!(
                "invalid resolution {}: must be between 0 and {}",
                resolution, MAX_RESOLUTION
            )));
        }
        self.resolution = resolution;
        Ok(())
    }

    pub fn set_energy_loss_fraction(&mut self, fraction: f64) -> DetectorResult<()> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(DetectorError::invalid_argument(format!(
                "invalid energy loss fraction {}: must be between 0.0 and 1.0",
                fraction
            )));
        }
        self.energy_loss_fraction = fraction;
        Ok(())
    }

    pub fn set_tracker_material(&mut self, new_material: impl Into<String>) -> DetectorResult<()> {
        let new_material = new_material.into();
        let kind = self.kind();
        match &mut self.geometry {
            LayerGeometry::Tracker { material, .. } => {
                validate_tracker_material(&new_material)?;
                *material = new_material;
                Ok(())
            }
            _ => Err(wrong_kind(kind, "a tracker material")),
        }
    }

    pub fn set_subsystems(&mut self, count: u32) -> DetectorResult<()> {
        let kind = self.kind();
        match &mut self.geometry {
            LayerGeometry::Tracker { subsystems, .. } => {
                *subsystems = count;
                Ok(())
            }
            _ => Err(wrong_kind(kind, "tracker subsystems")),
        }
    }

    pub fn set_layers(&mut self, count: u32) -> DetectorResult<()> {
        let kind = self.kind();
        match &mut self.geometry {
            LayerGeometry::EmCalorimeter { layers, .. }
            | LayerGeometry::HadronicCalorimeter { layers, .. } => {
                *layers = count;
                Ok(())
            }
            _ => Err(wrong_kind(kind, "calorimeter layers")),
        }
    }

    /// Replace the calorimeter materials; all-or-nothing
    pub fn set_materials<S: Into<String>>(
        &mut self,
        new_materials: impl IntoIterator<Item = S>,
    ) -> DetectorResult<()> {
        let new_materials: Vec<String> = new_materials.into_iter().map(Into::into).collect();
        let kind = self.kind();
        match &mut self.geometry {
            LayerGeometry::EmCalorimeter { materials, .. } => {
                validate_allowed(&new_materials, EM_CALORIMETER_MATERIALS, "EM Calorimeter material")?;
                *materials = new_materials;
                Ok(())
            }
            LayerGeometry::HadronicCalorimeter { materials, .. } => {
                validate_allowed(
                    &new_materials,
                    HADRONIC_CALORIMETER_MATERIALS,
                    "Hadronic Calorimeter material",
                )?;
                *materials = new_materials;
                Ok(())
            }
            _ => Err(wrong_kind(kind, "calorimeter materials")),
        }
    }

    /// Replace the muon chamber types; all-or-nothing
    pub fn set_chamber_types<S: Into<String>>(
        &mut self,
        new_chambers: impl IntoIterator<Item = S>,
    ) -> DetectorResult<()> {
        let new_chambers: Vec<String> = new_chambers.into_iter().map(Into::into).collect();
        let kind = self.kind();
        match &mut self.geometry {
            LayerGeometry::MuonSpectrometer { chambers } => {
                validate_allowed(&new_chambers, MUON_CHAMBER_TYPES, "muon chamber type")?;
                *chambers = new_chambers;
                Ok(())
            }
            _ => Err(wrong_kind(kind, "muon chamber types")),
        }
    }

    /// Whether this sub-detector registers the particle
    pub fn can_detect(&self, particle: &Particle) -> bool {
        particle.can_be_detected_by(self.kind())
    }

    /// Measure the energy deposited by `particle` arriving with `incoming_energy`.
    ///
    /// Returns exactly 0 for particles this stage cannot see. Otherwise the
    /// deposited energy `incoming_energy * energy_loss_fraction` is smeared by
    /// N(loss, loss * resolution / 100) and folded to a non-negative value;
    /// the fold slightly inflates readings whose width is comparable to the mean.
    pub fn detect_particle(&self, particle: &Particle, incoming_energy: f64) -> DetectorResult<f64> {
        if !self.can_detect(particle) {
            return Ok(0.0);
        }
        if !incoming_energy.is_finite() || incoming_energy < 0.0 {
            return Err(DetectorError::invalid_argument(format!(
                "incoming energy must be finite and non-negative, got {}",
                incoming_energy
            )));
        }

        let loss = incoming_energy * self.energy_loss_fraction;
        if self.resolution == 0 {
            return Ok(loss);
        }

        let std_dev = loss * (self.resolution as f64 / 100.0);
        let normal = Normal::new(loss, std_dev)
            .map_err(|e| DetectorError::invalid_argument(format!("smearing distribution: {}", e)))?;
        let measured = normal.sample(&mut *self.rng.borrow_mut());
        log::trace!(
            "{}: deposit {:.4} GeV smeared to {:.4} GeV (σ = {:.4})",
            self.type_name(),
            loss,
            measured,
            std_dev
        );

        Ok(measured.abs())
    }
}

impl fmt::Debug for SubDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubDetector")
            .field("geometry", &self.geometry)
            .field("resolution", &self.resolution)
            .field("energy_loss_fraction", &self.energy_loss_fraction)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for SubDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sub-detector: {}", self.type_name())?;
        write!(f, "Resolution: {}%", self.resolution)?;

        match &self.geometry {
            LayerGeometry::Tracker {
                material,
                subsystems,
            } => {
                write!(f, "\nMaterial: {}", material)?;
                write!(f, "\nNumber of subsystems: {}", subsystems)
            }
            LayerGeometry::EmCalorimeter { layers, materials }
            | LayerGeometry::HadronicCalorimeter { layers, materials } => {
                write!(f, "\nNumber of layers: {}", layers)?;
                write_list(
                    f,
                    "Materials",
                    &materials.iter().map(|m| material_description(m)).collect::<Vec<_>>(),
                )
            }
            LayerGeometry::MuonSpectrometer { chambers } => write_list(
                f,
                "Chamber types",
                &chambers.iter().map(|c| chamber_description(c)).collect::<Vec<_>>(),
            ),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

//! Relativistic Four-Momentum
//!
//! p^μ = (E, p_x, p_y, p_z) in natural units (c = 1), all components in GeV.
//!
//! A [`FourMomentum`] can only be built through validated constructors, so
//! every value in circulation satisfies:
//!
//! - all components finite
//! - E ≥ 0
//! - the mass-shell condition E² ≥ |p|² (up to [`MASS_SHELL_TOLERANCE`])

use crate::{DetectorError, DetectorResult};
use serde::{Deserialize, Serialize};

/// Slack allowed on E² − |p|² for floating-point noise on massless particles
pub const MASS_SHELL_TOLERANCE: f64 = 1e-10;

/// Below this |p| the direction is undefined and η is reported as 0
const ZERO_MOMENTUM_THRESHOLD: f64 = 1e-10;

// ═══════════════════════════════════════════════════════════════════════════════
// FOUR-MOMENTUM
// ═══════════════════════════════════════════════════════════════════════════════

/// Four-momentum vector satisfying the mass-shell condition E² − |p|² = m² ≥ 0
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawFourMomentum")]
pub struct FourMomentum {
    px: f64,
    py: f64,
    pz: f64,
    energy: f64,
}

/// Unvalidated wire form used only for deserialization
#[derive(Deserialize)]
struct RawFourMomentum {
    px: f64,
    py: f64,
    pz: f64,
    energy: f64,
}

impl TryFrom<RawFourMomentum> for FourMomentum {
    type Error = DetectorError;

    fn try_from(raw: RawFourMomentum) -> DetectorResult<Self> {
        Self::new(raw.px, raw.py, raw.pz, raw.energy)
    }
}

impl FourMomentum {
    /// Create a validated four-momentum
    pub fn new(px: f64, py: f64, pz: f64, energy: f64) -> DetectorResult<Self> {
        let mut momentum = Self::zero();
        momentum.set_components(px, py, pz, energy)?;
        Ok(momentum)
    }

    /// The zero vector (a particle at rest with no mass)
    pub fn zero() -> Self {
        Self {
            px: 0.0,
            py: 0.0,
            pz: 0.0,
            energy: 0.0,
        }
    }

    /// Check whether the components form a physical four-momentum
    pub fn validate(px: f64, py: f64, pz: f64, energy: f64) -> bool {
        if ![px, py, pz, energy].iter().all(|c| c.is_finite()) {
            return false;
        }
        if energy < 0.0 {
            return false;
        }

        let p_squared = px * px + py * py + pz * pz;
        energy * energy - p_squared >= -MASS_SHELL_TOLERANCE
    }

    /// Replace all four components at once.
    ///
    /// There are no per-component setters: changing one component at a time
    /// could pass through an off-shell state.
    pub fn set_components(&mut self, px: f64, py: f64, pz: f64, energy: f64) -> DetectorResult<()> {
        if !Self::validate(px, py, pz, energy) {
            return Err(DetectorError::invalid_physics(format!(
                "four-momentum ({}, {}, {}, {}) is unphysical: energy must be non-negative and E^2 >= p^2",
                px, py, pz, energy
            )));
        }

        self.px = px;
        self.py = py;
        self.pz = pz;
        self.energy = energy;
        Ok(())
    }

    pub fn px(&self) -> f64 {
        self.px
    }

    pub fn py(&self) -> f64 {
        self.py
    }

    pub fn pz(&self) -> f64 {
        self.pz
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    /// True when every component is exactly zero (energy ≤ 0 and no momentum)
    pub fn is_null(&self) -> bool {
        self.energy <= 0.0 && self.px == 0.0 && self.py == 0.0 && self.pz == 0.0
    }

    /// Compute invariant mass squared: m² = E² - |p|²
    pub fn mass_squared(&self) -> f64 {
        self.energy * self.energy - self.px * self.px - self.py * self.py - self.pz * self.pz
    }

    /// Compute invariant mass: m = √(E² - |p|²)
    ///
    /// Round-off within the mass-shell tolerance is clamped to exactly 0.
    pub fn invariant_mass(&self) -> f64 {
        let m2 = self.mass_squared();
        if m2 < 0.0 && m2 > -MASS_SHELL_TOLERANCE {
            return 0.0;
        }
        m2.max(0.0).sqrt()
    }

    /// Compute transverse momentum: p_T = √(p_x² + p_y²)
    pub fn transverse_momentum(&self) -> f64 {
        self.px.hypot(self.py)
    }

    /// Compute 3-momentum magnitude: |p| = √(p_x² + p_y² + p_z²)
    pub fn momentum_magnitude(&self) -> f64 {
        (self.px * self.px + self.py * self.py + self.pz * self.pz).sqrt()
    }

    /// Compute pseudorapidity: η = -ln(tan(θ/2)) where θ is the polar angle
    ///
    /// Returns 0 for a vanishing 3-momentum and ±∞ along the beam axis.
    pub fn pseudorapidity(&self) -> f64 {
        let p = self.momentum_magnitude();
        if p < ZERO_MOMENTUM_THRESHOLD {
            return 0.0;
        }

        let cos_theta = self.pz / p;
        if cos_theta >= 1.0 {
            return f64::INFINITY;
        }
        if cos_theta <= -1.0 {
            return f64::NEG_INFINITY;
        }

        let theta = cos_theta.acos();
        if theta < ZERO_MOMENTUM_THRESHOLD {
            return f64::INFINITY;
        }

        -(theta / 2.0).tan().ln()
    }

    /// Invariant mass of a composite system
    ///
    /// Sums the four components over `momenta` and returns the invariant mass
    /// of the resulting vector. Order does not matter.
    pub fn system_invariant_mass(momenta: &[FourMomentum]) -> DetectorResult<f64> {
        if momenta.is_empty() {
            return Err(DetectorError::invalid_argument(
                "cannot calculate system invariant mass of an empty momentum collection",
            ));
        }

        let (px, py, pz, energy) = momenta.iter().fold((0.0, 0.0, 0.0, 0.0), |acc, p| {
            (acc.0 + p.px, acc.1 + p.py, acc.2 + p.pz, acc.3 + p.energy)
        });

        Ok(Self::new(px, py, pz, energy)?.invariant_mass())
    }
}

impl std::fmt::Display for FourMomentum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "(p_x, p_y, p_z, E) = ({}, {}, {}, {}) GeV",
            self.px, self.py, self.pz, self.energy
        )
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

//! Per-particle reading table
//!
//! Readings are kept in sub-detector registration order so that reverse
//! traversal (used by detected-energy extraction) is well defined.

use super::layers::SubDetectorKind;
use serde::Serialize;

/// Energy reported by one sub-detector
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reading {
    pub sub_detector: SubDetectorKind,
    /// Measured energy in GeV (0 = not fired)
    pub energy: f64,
}

impl Reading {
    pub fn fired(&self) -> bool {
        self.energy > 0.0
    }
}

/// Readings of all sub-detectors for a single particle
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DetectorReadings {
    entries: Vec<Reading>,
}

impl DetectorReadings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a reading; an existing entry for the same kind keeps its position
    pub fn record(&mut self, sub_detector: SubDetectorKind, energy: f64) {
        match self.entries.iter_mut().find(|r| r.sub_detector == sub_detector) {
            Some(existing) => existing.energy = energy,
            None => self.entries.push(Reading { sub_detector, energy }),
        }
    }

    pub fn get(&self, sub_detector: SubDetectorKind) -> Option<f64> {
        self.entries
            .iter()
            .find(|r| r.sub_detector == sub_detector)
            .map(|r| r.energy)
    }

    /// Reading by type name
    pub fn get_by_name(&self, type_name: &str) -> Option<f64> {
        type_name.parse().ok().and_then(|kind| self.get(kind))
    }

    /// Reading of `sub_detector`, 0 when absent
    pub fn energy(&self, sub_detector: SubDetectorKind) -> f64 {
        self.get(sub_detector).unwrap_or(0.0)
    }

    pub fn fired(&self, sub_detector: SubDetectorKind) -> bool {
        self.energy(sub_detector) > 0.0
    }

    /// Sum over all sub-detectors
    pub fn total_energy(&self) -> f64 {
        self.entries.iter().map(|r| r.energy).sum()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Reading> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(SubDetectorKind, f64)> for DetectorReadings {
    fn from_iter<I: IntoIterator<Item = (SubDetectorKind, f64)>>(iter: I) -> Self {
        let mut readings = Self::new();
        for (kind, energy) in iter {
            readings.record(kind, energy);
        }
        readings
    }
}

impl<'a> IntoIterator for &'a DetectorReadings {
    type Item = &'a Reading;
    type IntoIter = std::slice::Iter<'a, Reading>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

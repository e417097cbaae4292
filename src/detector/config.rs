//! Detector parameter sets
//!
//! ```text
//! ┌─────────┬──────────────────────┬──────────────────────┬──────────────────────┬───────────────────┐
//! │ Profile │ Tracker              │ EM Calorimeter       │ Hadronic Calorimeter │ Muon Spectrometer │
//! ├─────────┼──────────────────────┼──────────────────────┼──────────────────────┼───────────────────┤
//! │ ATLAS   │ 2%, 0.97, Si × 3     │ 2%, 0.95, 3 LAr/W/Pb │ 5%, 0.80, 3 Steel/PST│ 9%, 0.95, 4 types │
//! │ CMS     │ 2%, 0.98, Si × 4     │ 3%, 0.96, 4 PbWO4    │ 6%, 0.85, 4 Brass/PST│ 10%, 0.96, 3 types│
//! └─────────┴──────────────────────┴──────────────────────┴──────────────────────┴───────────────────┘
//! ```

use super::layers::{LayerGeometry, SubDetector};
use crate::{DetectorError, DetectorResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported detector names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DetectorName {
    #[serde(rename = "ATLAS")]
    Atlas,
    #[serde(rename = "CMS")]
    Cms,
}

impl DetectorName {
    pub fn all() -> [Self; 2] {
        [Self::Atlas, Self::Cms]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Atlas => "ATLAS",
            Self::Cms => "CMS",
        }
    }
}

impl fmt::Display for DetectorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DetectorName {
    type Err = DetectorError;

    fn from_str(s: &str) -> DetectorResult<Self> {
        Self::all()
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| {
                DetectorError::invalid_argument(format!(
                    "invalid detector name '{}': must be ATLAS or CMS",
                    s
                ))
            })
    }
}

/// Parameters of one sub-detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    /// Resolution in percent
    pub resolution: u32,
    pub energy_loss_fraction: f64,
    pub geometry: LayerGeometry,
}

impl LayerSpec {
    fn new(resolution: u32, energy_loss_fraction: f64, geometry: LayerGeometry) -> Self {
        Self {
            resolution,
            energy_loss_fraction,
            geometry,
        }
    }

    /// Instantiate the sub-detector, seeding its generator when a seed is given
    pub fn build(&self, seed: Option<u64>) -> DetectorResult<SubDetector> {
        let sub_detector = SubDetector::new(
            self.geometry.clone(),
            self.resolution,
            self.energy_loss_fraction,
        )?;
        Ok(match seed {
            Some(seed) => sub_detector.with_seed(seed),
            None => sub_detector,
        })
    }
}

impl From<&SubDetector> for LayerSpec {
    fn from(sub_detector: &SubDetector) -> Self {
        Self::new(
            sub_detector.resolution(),
            sub_detector.energy_loss_fraction(),
            sub_detector.geometry().clone(),
        )
    }
}

fn codes(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Full detector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    pub name: DetectorName,
    /// Sub-detectors in traversal order
    pub sub_detectors: Vec<LayerSpec>,
    /// Base seed; sub-detector `i` uses `seed + i`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl DetectorConfig {
    /// ATLAS parameter set
    pub fn atlas() -> Self {
        Self {
            name: DetectorName::Atlas,
            sub_detectors: vec![
                LayerSpec::new(
                    2,
                    0.97,
                    LayerGeometry::Tracker {
                        material: "Silicon".to_string(),
                        subsystems: 3,
                    },
                ),
                LayerSpec::new(
                    2,
                    0.95,
                    LayerGeometry::EmCalorimeter {
                        layers: 3,
                        materials: codes(&["LAr", "W", "Pb"]),
                    },
                ),
                LayerSpec::new(
                    5,
                    0.80,
                    LayerGeometry::HadronicCalorimeter {
                        layers: 3,
                        materials: codes(&["Steel", "PST"]),
                    },
                ),
                LayerSpec::new(
                    9,
                    0.95,
                    LayerGeometry::MuonSpectrometer {
                        chambers: codes(&["MDT", "RPC", "TGC", "CSC"]),
                    },
                ),
            ],
            seed: None,
        }
    }

    /// CMS parameter set
    pub fn cms() -> Self {
        Self {
            name: DetectorName::Cms,
            sub_detectors: vec![
                LayerSpec::new(
                    2,
                    0.98,
                    LayerGeometry::Tracker {
                        material: "Silicon".to_string(),
                        subsystems: 4,
                    },
                ),
                LayerSpec::new(
                    3,
                    0.96,
                    LayerGeometry::EmCalorimeter {
                        layers: 4,
                        materials: codes(&["PbWO4"]),
                    },
                ),
                LayerSpec::new(
                    6,
                    0.85,
                    LayerGeometry::HadronicCalorimeter {
                        layers: 4,
                        materials: codes(&["Brass", "PST"]),
                    },
                ),
                LayerSpec::new(
                    10,
                    0.96,
                    LayerGeometry::MuonSpectrometer {
                        chambers: codes(&["MDT", "CSC", "RPC"]),
                    },
                ),
            ],
            seed: None,
        }
    }

    pub fn for_detector(name: DetectorName) -> Self {
        match name {
            DetectorName::Atlas => Self::atlas(),
            DetectorName::Cms => Self::cms(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Seed for the sub-detector at `index`
    pub fn seed_for(&self, index: usize) -> Option<u64> {
        self.seed.map(|seed| seed.wrapping_add(index as u64))
    }

    /// Parse an external parameter set
    pub fn from_json(json: &str) -> DetectorResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| DetectorError::logic(format!("malformed detector configuration: {}", e)))
    }

    pub fn to_json_pretty(&self) -> DetectorResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::SubDetectorKind;

    #[test]
    fn test_name_parsing() {
        assert_eq!("ATLAS".parse::<DetectorName>().unwrap(), DetectorName::Atlas);
        assert_eq!("CMS".parse::<DetectorName>().unwrap(), DetectorName::Cms);
        assert!("LHCb".parse::<DetectorName>().unwrap_err().is_invalid_argument());
        assert!("atlas".parse::<DetectorName>().is_err());
    }

    #[test]
    fn test_presets_one_of_each() {
        for name in DetectorName::all() {
            let config = DetectorConfig::for_detector(name);
            assert_eq!(config.name, name);
            let kinds: Vec<_> = config.sub_detectors.iter().map(|s| s.geometry.kind()).collect();
            assert_eq!(kinds, SubDetectorKind::all().to_vec());
            for spec in &config.sub_detectors {
                assert!(spec.build(None).is_ok());
            }
        }
    }

    #[test]
    fn test_cms_parameters() {
        let cms = DetectorConfig::cms();
        assert_eq!(cms.sub_detectors[1].resolution, 3);
        assert!((cms.sub_detectors[2].energy_loss_fraction - 0.85).abs() < 1e-12);
        assert_eq!(
            cms.sub_detectors[1].geometry,
            LayerGeometry::EmCalorimeter {
                layers: 4,
                materials: vec!["PbWO4".to_string()]
            }
        );
    }

    #[test]
    fn test_json_round_trip() {
        let config = DetectorConfig::atlas().with_seed(11);
        let json = config.to_json_pretty().unwrap();
        assert!(json.contains("\"EM Calorimeter\""));

        let parsed = DetectorConfig::from_json(&json).unwrap();
        assert_eq!(parsed.name, config.name);
        assert_eq!(parsed.seed, Some(11));
        for (a, b) in parsed.sub_detectors.iter().zip(&config.sub_detectors) {
            assert_eq!(a.resolution, b.resolution);
            assert_eq!(a.geometry, b.geometry);
            assert!((a.energy_loss_fraction - b.energy_loss_fraction).abs() < 1e-12);
        }
    }

    #[test]
    fn test_unknown_layer_type_is_logic_error() {
        let json = r#"{
            "name": "ATLAS",
            "sub_detectors": [
                {"resolution": 1, "energy_loss_fraction": 0.5,
                 "geometry": {"type": "Drift Chamber", "layers": 2}}
            ]
        }"#;
        assert!(DetectorConfig::from_json(json).unwrap_err().is_logic());
    }

    #[test]
    fn test_seed_per_index() {
        let config = DetectorConfig::cms().with_seed(100);
        assert_eq!(config.seed_for(0), Some(100));
        assert_eq!(config.seed_for(3), Some(103));
        assert_eq!(DetectorConfig::cms().seed_for(0), None);
    }
}

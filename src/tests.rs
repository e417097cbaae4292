//! Integration Tests for the Particle Detector
//!
//! Cross-module tests for kinematics, detection and event analysis.

use crate::detector::{
    Detector, DetectorBuilder, DetectorConfig, DetectorName, DetectorReadings, Identification,
    SubDetector, SubDetectorKind,
};
use crate::events::{process_event, EventKind, PhysicsEvent};
use crate::momentum::FourMomentum;
use crate::particles::{Particle, ParticleFlavor};

fn p(px: f64, py: f64, pz: f64, e: f64) -> FourMomentum {
    FourMomentum::new(px, py, pz, e).unwrap()
}

fn seeded(name: DetectorName, seed: u64) -> Detector {
    Detector::from_config(&DetectorConfig::for_detector(name).with_seed(seed)).unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════
// KINEMATICS TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod kinematics_tests {
    use super::*;

    #[test]
    fn test_mass_squared_relation() {
        let cases = [
            (30.0, 25.0, 0.0, 60.0),
            (-25.0, -28.0, 0.0, 65.0),
            (20.0, 30.0, 10.0, 45.0),
            (3.0, 4.0, 0.0, 5.0),
            (0.0, 0.0, 0.0, 0.511),
            (1e3, -2e3, 5e2, 3e3),
        ];
        for (px, py, pz, e) in cases {
            let m = p(px, py, pz, e).invariant_mass();
            let expected = e * e - (px * px + py * py + pz * pz);
            assert!(m >= 0.0);
            assert!(
                (m * m - expected).abs() <= 1e-10 * expected.abs().max(1.0),
                "m² = {}, expected {}",
                m * m,
                expected
            );
        }
    }

    #[test]
    fn test_system_mass_order_independent() {
        let momenta = [
            p(40.0, 10.0, 30.0, 80.0),
            p(15.0, 25.0, 10.0, 40.0),
            p(5.0, 15.0, 20.0, 45.0),
        ];
        let forward = FourMomentum::system_invariant_mass(&momenta).unwrap();
        let mut reversed = momenta;
        reversed.reverse();
        let backward = FourMomentum::system_invariant_mass(&reversed).unwrap();
        let rotated = [momenta[1], momenta[2], momenta[0]];
        let shifted = FourMomentum::system_invariant_mass(&rotated).unwrap();

        assert!((forward - backward).abs() < 1e-10);
        assert!((forward - shifted).abs() < 1e-10);
    }

    #[test]
    fn test_unphysical_momenta_rejected() {
        assert!(FourMomentum::new(10.0, 0.0, 0.0, 5.0).unwrap_err().is_invalid_physics());
        assert!(FourMomentum::new(0.0, 0.0, 0.0, -1.0).unwrap_err().is_invalid_physics());

        let mut momentum = p(3.0, 4.0, 0.0, 5.0);
        assert!(momentum.set_components(3.0, 4.0, 0.0, 4.0).is_err());
        assert_eq!(momentum, p(3.0, 4.0, 0.0, 5.0));
    }

    #[test]
    fn test_empty_system_rejected() {
        let err = FourMomentum::system_invariant_mass(&[]).unwrap_err();
        assert!(err.is_invalid_argument());
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// PARTICLE TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod particle_tests {
    use super::*;

    #[test]
    fn test_hadron_charge_rule() {
        let momentum = p(1.0, 0.0, 0.0, 2.0);
        assert!(Particle::hadron(1, momentum, "charm", 2.0 / 3.0).is_ok());
        assert!(Particle::hadron(1, momentum, "proton", 1.0).is_ok());
        let err = Particle::hadron(1, momentum, "weird", 0.5).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_every_flavor_has_a_signature() {
        // Only the neutrino escapes every sub-detector
        for flavor in ParticleFlavor::all() {
            let particle = Particle::default_of(flavor);
            let seen = SubDetectorKind::all()
                .iter()
                .any(|&kind| particle.can_be_detected_by(kind));
            assert_eq!(seen, flavor != ParticleFlavor::Neutrino, "{}", flavor);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// SUB-DETECTOR TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod sub_detector_tests {
    use super::*;

    #[test]
    fn test_blind_sub_detector_reads_zero() {
        let neutrino = Particle::neutrino(1, p(5.0, 15.0, 20.0, 45.0)).unwrap();
        let photon = Particle::photon(2, p(30.0, 25.0, 0.0, 60.0)).unwrap();
        for resolution in [0, 10, 100] {
            for fraction in [0.0, 0.5, 1.0] {
                for kind in SubDetectorKind::all() {
                    let mut sub_detector = SubDetector::default_of(kind);
                    sub_detector.set_resolution(resolution).unwrap();
                    sub_detector.set_energy_loss_fraction(fraction).unwrap();
                    assert_eq!(sub_detector.detect_particle(&neutrino, 45.0).unwrap(), 0.0);
                    if kind != SubDetectorKind::EmCalorimeter {
                        assert_eq!(sub_detector.detect_particle(&photon, 60.0).unwrap(), 0.0);
                    }
                }
            }
        }
    }

    #[test]
    fn test_noiseless_reading_exact() {
        let electron = Particle::electron(1, p(20.0, 30.0, 10.0, 45.0)).unwrap();
        for fraction in [0.0, 0.25, 0.97, 1.0] {
            let tracker = SubDetector::tracker(0, fraction, "Silicon", 3).unwrap();
            for incoming in [0.0, 1.0, 45.0, 1234.5] {
                assert_eq!(
                    tracker.detect_particle(&electron, incoming).unwrap(),
                    incoming * fraction
                );
            }
        }
    }

    #[test]
    fn test_wide_smearing_never_negative() {
        let electron = Particle::electron(1, p(20.0, 30.0, 10.0, 45.0)).unwrap();
        let tracker = SubDetector::tracker(100, 1.0, "Silicon", 3).unwrap().with_seed(9);
        for _ in 0..1000 {
            assert!(tracker.detect_particle(&electron, 45.0).unwrap() >= 0.0);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// DETECTOR TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod detector_tests {
    use super::*;

    fn standard() -> DetectorBuilder {
        SubDetectorKind::all()
            .into_iter()
            .fold(DetectorBuilder::new(DetectorName::Atlas), |b, kind| {
                b.sub_detector(SubDetector::default_of(kind))
            })
    }

    #[test]
    fn test_fifth_sub_detector_rejected() {
        let builder = standard().sub_detector(SubDetector::default_of(SubDetectorKind::MuonSpectrometer));
        assert!(builder.build().unwrap_err().is_logic());
    }

    #[test]
    fn test_second_tracker_rejected() {
        let builder = DetectorBuilder::new(DetectorName::Cms)
            .sub_detector(SubDetector::default_of(SubDetectorKind::Tracker))
            .sub_detector(SubDetector::default_of(SubDetectorKind::Tracker))
            .sub_detector(SubDetector::default_of(SubDetectorKind::EmCalorimeter))
            .sub_detector(SubDetector::default_of(SubDetectorKind::HadronicCalorimeter))
            .sub_detector(SubDetector::default_of(SubDetectorKind::MuonSpectrometer));
        assert!(builder.build().unwrap_err().is_logic());
    }

    #[test]
    fn test_off_refuses_any_particle() {
        let detector = Detector::new(DetectorName::Atlas).unwrap();
        let particles = [
            Particle::photon(1, p(30.0, 25.0, 0.0, 60.0)).unwrap(),
            Particle::default_of(ParticleFlavor::Neutrino),
            Particle::muon(2, p(15.0, 25.0, 10.0, 40.0)).unwrap(),
        ];
        for particle in &particles {
            assert!(detector.detect_particle(particle).unwrap_err().is_invalid_argument());
        }
    }

    #[test]
    fn test_status_transitions() {
        let mut detector = Detector::new(DetectorName::Cms).unwrap();
        let photon = Particle::photon(1, p(30.0, 25.0, 0.0, 60.0)).unwrap();
        detector.set_status(true);
        assert!(detector.detect_particle(&photon).is_ok());
        detector.set_status(false);
        assert!(detector.detect_particle(&photon).is_err());
    }

    #[test]
    fn test_readings_in_registration_order() {
        let mut detector = seeded(DetectorName::Atlas, 5);
        detector.set_status(true);
        let electron = Particle::electron(1, p(20.0, 30.0, 10.0, 45.0)).unwrap();
        let readings = detector.detect_particle(&electron).unwrap();
        let kinds: Vec<_> = readings.iter().map(|r| r.sub_detector).collect();
        assert_eq!(kinds, SubDetectorKind::all().to_vec());
    }

    #[test]
    fn test_neutrino_leaves_nothing() {
        let mut detector = seeded(DetectorName::Cms, 1);
        detector.set_status(true);
        let neutrino = Particle::neutrino(1, p(5.0, 15.0, 20.0, 45.0)).unwrap();
        let readings = detector.detect_particle(&neutrino).unwrap();
        assert!(readings.iter().all(|r| r.energy == 0.0));
        assert_eq!(Detector::identify_particle(&readings), Identification::NothingDetected);
        assert_eq!(Detector::detected_energy(&readings), 0.0);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// ANALYSIS TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod analysis_tests {
    use super::*;

    #[test]
    fn test_identification_from_pattern() {
        let photon: DetectorReadings = [(SubDetectorKind::EmCalorimeter, 5.0)].into_iter().collect();
        assert_eq!(Detector::identify_particle(&photon).label(), "Photon");

        let electron: DetectorReadings = [
            (SubDetectorKind::Tracker, 3.0),
            (SubDetectorKind::EmCalorimeter, 5.0),
        ]
        .into_iter()
        .collect();
        assert_eq!(Detector::identify_particle(&electron).label(), "Electron or Positron");

        let empty: DetectorReadings = SubDetectorKind::all().into_iter().map(|k| (k, 0.0)).collect();
        assert_eq!(
            Detector::identify_particle(&empty).label(),
            "Nothing Detected (Possible Neutrino)"
        );
    }

    #[test]
    fn test_higgs_band() {
        let detector = Detector::new(DetectorName::Atlas).unwrap();
        let event = PhysicsEvent::higgs_decay().unwrap();
        let report = detector.calculate_invariant_mass(&event.particles, &event.name).unwrap();
        assert!((report.mass - 125.0).abs() < 10.0);
        assert!((report.mass - 124.864).abs() < 1e-3);
    }

    #[test]
    fn test_met_length_mismatch() {
        let detector = Detector::new(DetectorName::Cms).unwrap();
        let event = PhysicsEvent::z_boson_decay().unwrap();
        let readings = vec![DetectorReadings::new(); 3];
        let err = detector
            .calculate_missing_energy(&event.particles, &readings, &event.name)
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// END-TO-END TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod e2e_tests {
    use super::*;

    #[test]
    fn test_all_events_identified() {
        for name in DetectorName::all() {
            let mut detector = seeded(name, 2024);
            for kind in EventKind::all() {
                let event = kind.build().unwrap();
                let report = process_event(&mut detector, &event).unwrap();
                for (particle, record) in event.particles.iter().zip(&report.records) {
                    assert!(
                        record.identification.matches(particle.flavor()),
                        "{} on {}: {} identified as {}",
                        kind,
                        name,
                        particle.name(),
                        record.identification
                    );
                }
            }
        }
    }

    #[test]
    fn test_top_event_has_missing_energy() {
        let mut detector = seeded(DetectorName::Atlas, 17);
        let report = process_event(&mut detector, &PhysicsEvent::top_quark_decay().unwrap()).unwrap();
        let met = &report.missing_energy;
        assert!(met.detected_met < met.true_met);
        assert!(met.invisible_energy > 45.0);
        assert!(met.warning.is_some());
    }

    #[test]
    fn test_seeded_runs_reproducible() {
        let event = PhysicsEvent::top_quark_decay().unwrap();
        let a = process_event(&mut seeded(DetectorName::Cms, 99), &event).unwrap();
        let b = process_event(&mut seeded(DetectorName::Cms, 99), &event).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_config_json_drives_detector() {
        let json = DetectorConfig::cms().with_seed(4).to_json_pretty().unwrap();
        let config = DetectorConfig::from_json(&json).unwrap();
        let mut detector = Detector::from_config(&config).unwrap();
        assert_eq!(detector.name(), DetectorName::Cms);
        let report = process_event(&mut detector, &PhysicsEvent::higgs_decay().unwrap()).unwrap();
        assert_eq!(report.detector, DetectorName::Cms);
    }
}

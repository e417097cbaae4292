//! Particle Detector Benchmarks
//!
//! Performance benchmarks for kinematics, detection and event processing.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use particle_detector::{
    process_event, Detector, DetectorConfig, DetectorName, EventKind, FourMomentum, Particle,
};

fn sample_momenta(n: usize) -> Vec<FourMomentum> {
    (0..n)
        .filter_map(|i| {
            let x = i as f64;
            FourMomentum::new(x.sin() * 20.0, x.cos() * 20.0, x * 0.5, 40.0 + x).ok()
        })
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════
// KINEMATICS BENCHMARKS
// ═══════════════════════════════════════════════════════════════════════════

fn bench_kinematics(c: &mut Criterion) {
    let mut group = c.benchmark_group("kinematics");

    let momentum = FourMomentum::new(30.0, 25.0, 12.0, 60.0).unwrap();
    group.bench_function("invariant_mass", |b| {
        b.iter(|| black_box(&momentum).invariant_mass())
    });
    group.bench_function("pseudorapidity", |b| {
        b.iter(|| black_box(&momentum).pseudorapidity())
    });

    for n in [2, 16, 256] {
        let momenta = sample_momenta(n);
        group.bench_with_input(BenchmarkId::new("system_invariant_mass", n), &momenta, |b, m| {
            b.iter(|| FourMomentum::system_invariant_mass(black_box(m)))
        });
    }

    group.finish();
}

// ═══════════════════════════════════════════════════════════════════════════
// DETECTION BENCHMARKS
// ═══════════════════════════════════════════════════════════════════════════

fn bench_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("detection");

    let momentum = FourMomentum::new(20.0, 30.0, 10.0, 45.0).unwrap();
    let particles = [
        ("electron", Particle::electron(1, momentum).unwrap()),
        ("muon", Particle::muon(1, momentum).unwrap()),
        ("hadron", Particle::hadron(1, momentum, "pion", 1.0).unwrap()),
        ("neutrino", Particle::neutrino(1, momentum).unwrap()),
    ];

    for name in DetectorName::all() {
        let mut detector = Detector::from_config(&DetectorConfig::for_detector(name).with_seed(7)).unwrap();
        detector.set_status(true);
        for (label, particle) in &particles {
            group.bench_with_input(
                BenchmarkId::new(name.as_str(), label),
                particle,
                |b, particle| b.iter(|| detector.detect_particle(black_box(particle))),
            );
        }
    }

    group.finish();
}

// ═══════════════════════════════════════════════════════════════════════════
// EVENT BENCHMARKS
// ═══════════════════════════════════════════════════════════════════════════

fn bench_events(c: &mut Criterion) {
    let mut group = c.benchmark_group("events");

    let mut detector = Detector::from_config(&DetectorConfig::atlas().with_seed(1)).unwrap();
    for kind in EventKind::all() {
        let event = kind.build().unwrap();
        group.bench_function(kind.short_name(), |b| {
            b.iter(|| process_event(&mut detector, black_box(&event)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_kinematics, bench_detection, bench_events);
criterion_main!(benches);

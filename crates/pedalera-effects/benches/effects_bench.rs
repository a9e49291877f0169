//! Criterion benchmarks for the pedalera effect families
//!
//! Run with: cargo bench
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pedalera_core::Effect;
use pedalera_effects::{Chorus, Compressor, Delay, Overdrive, Reverb, StereoMixer, SweepDelay};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[48, 128, 512];

fn generate_test_signal(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5
        })
        .collect()
}

fn bench_effect<E: Effect>(c: &mut Criterion, name: &str, mut effect: E) {
    let mut group = c.benchmark_group(name);

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);

        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &block_size,
            |b, _| {
                b.iter(|| {
                    let mut acc = 0.0f32;
                    for &x in &input {
                        let (l, r) = effect.process_stereo(black_box(x), black_box(x));
                        acc += l + r;
                    }
                    black_box(acc)
                })
            },
        );
    }

    group.finish();
}

fn bench_delay(c: &mut Criterion) {
    let mut effect = Delay::new(SAMPLE_RATE);
    effect.set_synced(false);
    effect.set_free_time_ms(350.0);
    effect.set_feedback(0.5);
    bench_effect(c, "Delay", effect);
}

fn bench_sweep_delay(c: &mut Criterion) {
    let mut effect = SweepDelay::new(SAMPLE_RATE);
    effect.set_synced(false);
    effect.set_pan_rate_hz(0.8);
    bench_effect(c, "SweepDelay", effect);
}

fn bench_overdrive(c: &mut Criterion) {
    let mut effect = Overdrive::new(SAMPLE_RATE);
    effect.set_drive(0.8);
    bench_effect(c, "Overdrive", effect);
}

fn bench_stereo_mixer(c: &mut Criterion) {
    let mut effect = StereoMixer::new(SAMPLE_RATE);
    effect.set_cross(0.3);
    bench_effect(c, "StereoMixer", effect);
}

fn bench_reverb(c: &mut Criterion) {
    let mut effect = Reverb::new(SAMPLE_RATE);
    effect.set_mix(0.5);
    bench_effect(c, "Reverb", effect);
}

fn bench_compressor(c: &mut Criterion) {
    let mut effect = Compressor::new(SAMPLE_RATE);
    effect.set_threshold_db(-20.0);
    effect.set_ratio(4.0);
    bench_effect(c, "Compressor", effect);
}

fn bench_chorus(c: &mut Criterion) {
    let mut effect = Chorus::new(SAMPLE_RATE);
    effect.set_depth(0.6);
    bench_effect(c, "Chorus", effect);
}

criterion_group!(
    benches,
    bench_delay,
    bench_sweep_delay,
    bench_overdrive,
    bench_stereo_mixer,
    bench_reverb,
    bench_compressor,
    bench_chorus
);
criterion_main!(benches);

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use shakecat_core::{
    AccelerationSample, MotionSampler, NoHaptics, PermissionOutcome, SessionConfig, ShakeSession,
};

fn readings(n: usize) -> Vec<AccelerationSample> {
    (0..n)
        .map(|i| {
            let phase = i as f64 * 0.37;
            AccelerationSample::new(phase.sin() * 14.0, phase.cos() * 6.0, 9.81)
        })
        .collect()
}

fn bench_sampler(c: &mut Criterion) {
    let samples = readings(10_000);

    c.bench_function("sampler_classify_10k", |b| {
        b.iter(|| {
            let mut sampler = MotionSampler::default();
            let mut fired = 0usize;
            for (i, s) in samples.iter().enumerate() {
                if sampler.on_sample(*s, i as u64 * 16).is_some() {
                    fired += 1;
                }
            }
            black_box(fired)
        })
    });

    c.bench_function("session_on_sample_10k", |b| {
        b.iter(|| {
            let mut rng = SmallRng::seed_from_u64(42);
            let mut session = ShakeSession::new(SessionConfig::default());
            session.apply_permission(PermissionOutcome::Granted);
            for (i, s) in samples.iter().enumerate() {
                black_box(session.on_sample(*s, i as u64 * 16, &mut rng, &mut NoHaptics));
                if session.message().is_some() {
                    session.reset_round();
                }
            }
        })
    });
}

criterion_group!(benches, bench_sampler);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use derby::core::config::RaceConfig;
use derby::race::{simulate_race_now, skip_race};
use derby::schedule::{generate_roster, generate_schedule};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn race_benchmarks(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let roster = generate_roster(20, &mut rng).expect("roster");
    let schedule = generate_schedule(&roster, &[2200.0], 10, &mut rng).expect("schedule");
    let race = &schedule[0];
    let config = RaceConfig::default();

    c.bench_function("stepped_race_2200m", |b| {
        b.iter(|| simulate_race_now(black_box(race), &config, &mut rng))
    });

    c.bench_function("skipped_race_2200m", |b| {
        b.iter(|| skip_race(black_box(race), &config, &mut rng))
    });
}

criterion_group!(benches, race_benchmarks);
criterion_main!(benches);

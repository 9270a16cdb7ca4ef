use criterion::{black_box, criterion_group, criterion_main, Criterion};
use runtime::TradingEngine;

const NOW_MS: u64 = 1_700_000_000_000;

fn price_ticks(c: &mut Criterion) {
    c.bench_function("price_tick_auto_running", |b| {
        let mut engine = TradingEngine::new(11, NOW_MS);
        engine.start_auto().ok();
        let mut now = NOW_MS;
        b.iter(|| {
            now += 1_200;
            black_box(engine.price_tick(now));
        });
    });
}

fn snapshots(c: &mut Criterion) {
    c.bench_function("snapshot", |b| {
        let engine = TradingEngine::new(11, NOW_MS);
        b.iter(|| black_box(engine.snapshot(NOW_MS)));
    });
}

criterion_group!(benches, price_ticks, snapshots);
criterion_main!(benches);

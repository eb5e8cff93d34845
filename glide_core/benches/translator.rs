use criterion::{Criterion, black_box, criterion_group, criterion_main};

use glide_core::translator;

// Generate a plausible sample stream: a sine sweep through the travel range
// with a little deterministic jitter.
fn synth_positions(n: usize, seed: u32) -> Vec<f32> {
    let mut state = seed.max(1);
    let mut next_f32 = || {
        let mut x = state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        state = x;
        (x as f32) / (u32::MAX as f32 + 1.0)
    };
    let mut v = Vec::with_capacity(n);
    for i in 0..n {
        let t = i as f32 / 40.0;
        let base = (t * 3.0).sin() * 0.5 + 0.5;
        let jitter = (next_f32() - 0.5) * 0.02;
        v.push(((base + jitter) * 99.0).clamp(0.0, 99.0));
    }
    v
}

pub fn bench_speed_for_move(c: &mut Criterion) {
    let positions = synth_positions(4096, 7);
    c.bench_function("speed_for_move_stream", |b| {
        b.iter(|| {
            let mut acc = 0.0f32;
            for pair in positions.windows(2) {
                if pair[0] != pair[1] {
                    acc += translator::speed_for_move(
                        black_box(pair[0]),
                        black_box(pair[1]),
                        black_box(0.025),
                    );
                }
            }
            acc
        })
    });
}

pub fn bench_duration_for_move(c: &mut Criterion) {
    c.bench_function("duration_for_move_grid", |b| {
        b.iter(|| {
            let mut acc = 0.0f32;
            for dist in 1..=99u32 {
                for speed in (10..=90u32).step_by(8) {
                    acc += translator::duration_for_move(
                        black_box(dist as f32),
                        black_box(speed as f32),
                    );
                }
            }
            acc
        })
    });
}

criterion_group!(benches, bench_speed_for_move, bench_duration_for_move);
criterion_main!(benches);

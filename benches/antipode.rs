use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hopf_trees::algebra::{trees_of_order, AntipodeCache, Character, Convolution};
use hopf_trees::{EngineConfig, Tree};
use num_rational::Rational64;

fn bench_split(c: &mut Criterion) {
    let bushy: Tree = "[[[],[]],[[],[]],[[],[]],[]]".parse().unwrap();

    let mut group = c.benchmark_group("split");
    group.bench_function("sequential", |b| {
        b.iter(|| black_box(&bushy).split_with_threshold(usize::MAX))
    });
    group.bench_function("parallel", |b| b.iter(|| black_box(&bushy).split_with_threshold(1)));
    group.finish();
}

fn bench_antipode(c: &mut Criterion) {
    let mut group = c.benchmark_group("antipode_all_trees");
    for order in [5usize, 7, 8] {
        let trees = trees_of_order(order);
        group.bench_with_input(BenchmarkId::from_parameter(order), &trees, |b, trees| {
            b.iter(|| {
                let cache = AntipodeCache::<i64>::new();
                for t in trees {
                    black_box(cache.tree(t));
                }
            })
        });
    }
    group.finish();
}

fn bench_inverse_power(c: &mut Criterion) {
    let trees = trees_of_order(7);
    let flow = Character::new(|t: &Tree| Rational64::new(1, t.factorial().unwrap_or(1) as i64));

    c.bench_function("exact_flow_inverse_order_7", |b| {
        b.iter(|| {
            let engine: Convolution<Rational64, Rational64> =
                Convolution::with_config(EngineConfig::default());
            for t in &trees {
                black_box(engine.apply_power(&flow, -1, t));
            }
        })
    });
}

criterion_group!(benches, bench_split, bench_antipode, bench_inverse_power);
criterion_main!(benches);

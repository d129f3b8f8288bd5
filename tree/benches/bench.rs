use core::hint::black_box;
use core::time::Duration;
use std::collections::BTreeSet;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tree::RedBlackTree;

// Number of keys searched for and removed in each benchmark
const ACCESS_COUNT: usize = 10_000;

fn insert(c: &mut Criterion) {
    let mut g = c.benchmark_group("insert");

    macro_rules! bench {
        ($name:expr, $count:expr, $keys:expr, $($set:tt)*) => {
            g.bench_with_input(BenchmarkId::new($name, $count), &$count, |b, _i| {
                b.iter(|| {
                    let mut set = $($set)*::new();
                    for x in $keys {
                        set.insert(x);
                    }
                    set
                })
            });
        };
    }

    for count in [1_000, 10_000, 100_000, 1_000_000] {
        let ordered = 0..count as i32;
        bench!("rbt_ordered", count, ordered.clone(), RedBlackTree);
        bench!("btree_ordered", count, ordered.clone(), BTreeSet);

        let random = gen_keys(count, 3 * count, 123);
        bench!("rbt_random", count, random.iter().copied(), RedBlackTree);
        bench!("btree_random", count, random.iter().copied(), BTreeSet);
    }
}

fn search(c: &mut Criterion) {
    let mut g = c.benchmark_group("search");
    g.sampling_mode(criterion::SamplingMode::Flat);

    macro_rules! bench {
        ($name:expr, $count:expr, $set:expr, $access_keys:expr) => {
            let set = $set;
            g.bench_with_input(BenchmarkId::new($name, $count), &$count, |b, _c| {
                b.iter(|| {
                    for k in $access_keys.iter() {
                        black_box(set.contains(black_box(k)));
                    }
                })
            });
        };
    }

    for count in [1_000, 10_000, 100_000, 1_000_000] {
        let keys = gen_keys(count, 3 * count, 123);
        let access_keys = gen_keys(ACCESS_COUNT, 3 * count, 321);

        bench!(
            "rbt",
            count,
            keys.iter().copied().collect::<RedBlackTree<_>>(),
            access_keys
        );
        bench!(
            "btree",
            count,
            keys.iter().copied().collect::<BTreeSet<_>>(),
            access_keys
        );
    }
}

fn remove(c: &mut Criterion) {
    let mut g = c.benchmark_group("remove");

    macro_rules! bench {
        ($name:expr, $count:expr, $set:expr, $access_keys:expr) => {
            let set = $set;
            g.bench_with_input(BenchmarkId::new($name, $count), &$count, |b, _i| {
                b.iter_batched_ref(
                    || set.clone(),
                    |set| {
                        for k in $access_keys.iter() {
                            black_box(set.remove(black_box(k)));
                        }
                    },
                    criterion::BatchSize::LargeInput,
                );
            });
        };
    }

    for count in [1_000, 10_000, 100_000] {
        let keys = gen_keys(count, 3 * count, 123);
        let access_keys = gen_keys(ACCESS_COUNT, 3 * count, 456);

        bench!(
            "rbt",
            count,
            keys.iter().copied().collect::<RedBlackTree<_>>(),
            access_keys
        );
        bench!(
            "btree",
            count,
            keys.iter().copied().collect::<BTreeSet<_>>(),
            access_keys
        );
    }
}

/// `count` keys drawn uniformly from `0..max`, duplicates included.
pub fn gen_keys(count: usize, max: usize, seed: u64) -> Vec<i32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count).map(|_| rng.gen_range(0..max as i32)).collect()
}

criterion_group!(
    name = benches;
    config = Criterion::default()
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_millis(1000))
        ;
    targets = insert, search, remove
);
criterion_main!(benches);

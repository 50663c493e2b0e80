use alloc::format;
use alloc::string::String;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::hint::black_box;

use criterion::AxisScale;
use criterion::BatchSize;
use criterion::Criterion;
use criterion::PlotConfiguration;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use hashbrown::HashMap as HashbrownMap;
use probe_table::HashTable;
use probe_table::StdEq;
use probe_table::StdHash;
use rand::Rng;
use rand::SeedableRng;
use rand::TryRngCore;
use rand::distr;
use rand::rngs::OsRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand_distr::Zipf;
use siphasher::sip::SipHasher;

extern crate alloc;

#[derive(Clone, Copy)]
struct SipBuilder {
    k1: u64,
    k2: u64,
}

impl SipBuilder {
    fn random() -> Self {
        let mut rng = OsRng;
        Self {
            k1: rng.try_next_u64().unwrap(),
            k2: rng.try_next_u64().unwrap(),
        }
    }
}

impl BuildHasher for SipBuilder {
    type Hasher = SipHasher;

    fn build_hasher(&self) -> Self::Hasher {
        SipHasher::new_with_keys(self.k1, self.k2)
    }
}

type ProbeTable<K> = HashTable<K, u64, StdHash<SipBuilder>, StdEq>;

fn new_table<K: Hash + Eq>(hasher: SipBuilder, capacity: usize) -> ProbeTable<K> {
    HashTable::builder()
        .hasher(StdHash(hasher))
        .capacity(capacity)
        .build()
        .unwrap()
}

trait BenchKey: Clone + Hash + Eq {
    fn new(key: u64) -> Self;
}

impl BenchKey for u64 {
    fn new(key: u64) -> Self {
        black_box(key)
    }
}

#[derive(Clone, Hash, PartialEq, Eq)]
struct StringKey(String);

impl BenchKey for StringKey {
    fn new(key: u64) -> Self {
        black_box(Self(format!("key_{:016X}", key)))
    }
}

const SIZES: &[usize] = &[
    (1 << 10),
    (1 << 12),
    (1 << 14),
    (1 << 16),
    (1 << 18),
];

#[derive(Clone, Copy)]
enum Operation {
    Insert,
    Find,
    Remove,
}

fn random_keys<K: BenchKey>(count: usize) -> Vec<K> {
    let mut rng = OsRng;
    (0..count)
        .map(|_| K::new(rng.try_next_u64().unwrap()))
        .collect()
}

fn bench_insert_random<K: BenchKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("insert_random_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    let hasher = SipBuilder::random();
    for &size in SIZES[..=MAX_SIZE].iter() {
        let keys = random_keys::<K>(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("probe_table/{size}"), |b| {
            b.iter_batched(
                || keys.clone(),
                |keys| {
                    let mut table = new_table::<K>(hasher, 0);
                    for (i, key) in keys.into_iter().enumerate() {
                        table.insert(key, i as u64).unwrap();
                    }
                    black_box(table)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || keys.clone(),
                |keys| {
                    let mut map = HashbrownMap::with_hasher(hasher);
                    for (i, key) in keys.into_iter().enumerate() {
                        map.insert(key, i as u64);
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_find_hit_miss<K: BenchKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("find_hit_miss_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    let hasher = SipBuilder::random();
    for &size in SIZES[..=MAX_SIZE].iter() {
        let keys = random_keys::<K>(size);
        let mut probes = keys.clone();
        probes.extend(random_keys::<K>(size));
        probes.shuffle(&mut SmallRng::from_os_rng());

        let mut table = new_table::<K>(hasher, size);
        let mut map = HashbrownMap::with_capacity_and_hasher(size, hasher);
        for (i, key) in keys.iter().enumerate() {
            table.insert(key.clone(), i as u64).unwrap();
            map.insert(key.clone(), i as u64);
        }

        group.throughput(Throughput::Elements(probes.len() as u64));
        group.bench_function(format!("probe_table/{size}"), |b| {
            b.iter(|| {
                for key in &probes {
                    black_box(table.get(key));
                }
            })
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter(|| {
                for key in &probes {
                    black_box(map.get(key));
                }
            })
        });
    }

    group.finish();
}

fn bench_remove_all<K: BenchKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("remove_all_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    let hasher = SipBuilder::random();
    for &size in SIZES[..=MAX_SIZE].iter() {
        let keys = random_keys::<K>(size);
        group.throughput(Throughput::Elements(size as u64));

        // Removal shrinks the probe table as it empties; hashbrown never
        // shrinks on its own.
        group.bench_function(format!("probe_table/{size}"), |b| {
            b.iter_batched(
                || {
                    let mut table = new_table::<K>(hasher, size);
                    for (i, key) in keys.iter().enumerate() {
                        table.insert(key.clone(), i as u64).unwrap();
                    }
                    table
                },
                |mut table| {
                    for key in &keys {
                        black_box(table.remove(key)).unwrap();
                    }
                    black_box(table)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || {
                    let mut map = HashbrownMap::with_capacity_and_hasher(size, hasher);
                    for (i, key) in keys.iter().enumerate() {
                        map.insert(key.clone(), i as u64);
                    }
                    map
                },
                |mut map| {
                    for key in &keys {
                        black_box(map.remove(key));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_churn<K: BenchKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("churn_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    let hasher = SipBuilder::random();
    for &size in SIZES[..=MAX_SIZE].iter() {
        // Each key appears twice: the first visit inserts, the second removes.
        let operations = (0..size as u64)
            .flat_map(|i| {
                let key = K::new(i);
                [key.clone(), key]
            })
            .collect::<Vec<K>>();

        group.throughput(Throughput::Elements(operations.len() as u64));
        group.bench_function(format!("probe_table/{size}"), |b| {
            b.iter_batched(
                || {
                    let mut operations = operations.clone();
                    operations.shuffle(&mut SmallRng::from_os_rng());
                    operations
                },
                |operations| {
                    let mut table = new_table::<K>(hasher, 0);
                    for key in operations {
                        if table.contains_key(&key) {
                            black_box(table.take(&key)).unwrap();
                        } else {
                            table.insert(key, 0).unwrap();
                        }
                    }
                    black_box(table)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || {
                    let mut operations = operations.clone();
                    operations.shuffle(&mut SmallRng::from_os_rng());
                    operations
                },
                |operations| {
                    let mut map = HashbrownMap::with_hasher(hasher);
                    for key in operations {
                        if map.contains_key(&key) {
                            black_box(map.remove(&key));
                        } else {
                            map.insert(key, 0);
                        }
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_mixed_zipf<K: BenchKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("mixed_zipf_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    const KEY_SPACE_MULTIPLIER: f32 = 2.0;

    let hasher = SipBuilder::random();
    for &size in SIZES[..=MAX_SIZE].iter() {
        let mut rng = SmallRng::from_os_rng();
        let key_distr = Zipf::new(size as f32 * KEY_SPACE_MULTIPLIER - 1.0, 1.0).unwrap();

        let operations = (0..size * 3)
            .map(|_| {
                let op_choice: f64 = rng.sample(distr::Uniform::new(0.0, 1.0).unwrap());
                let operation = if op_choice < 0.5 {
                    Operation::Find
                } else if op_choice < 0.75 {
                    Operation::Insert
                } else {
                    Operation::Remove
                };
                (operation, K::new(rng.sample(key_distr) as u64))
            })
            .collect::<Vec<(Operation, K)>>();

        group.throughput(Throughput::Elements(operations.len() as u64));
        group.bench_function(format!("probe_table/{size}"), |b| {
            b.iter_batched(
                || operations.clone(),
                |operations| {
                    let mut table = new_table::<K>(hasher, 0);
                    for (operation, key) in operations {
                        match operation {
                            Operation::Insert => table.insert(key, 1).unwrap(),
                            Operation::Find => {
                                black_box(table.get(&key));
                            }
                            Operation::Remove => {
                                let _ = black_box(table.remove(&key));
                            }
                        }
                    }
                    black_box(table)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || operations.clone(),
                |operations| {
                    let mut map = HashbrownMap::with_hasher(hasher);
                    for (operation, key) in operations {
                        match operation {
                            Operation::Insert => {
                                map.insert(key, 1);
                            }
                            Operation::Find => {
                                black_box(map.get(&key));
                            }
                            Operation::Remove => {
                                black_box(map.remove(&key));
                            }
                        }
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_iteration<K: BenchKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("iteration_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    let hasher = SipBuilder::random();
    for &size in SIZES[..=MAX_SIZE].iter() {
        let keys = random_keys::<K>(size);
        let mut table = new_table::<K>(hasher, size);
        let mut map = HashbrownMap::with_capacity_and_hasher(size, hasher);
        for (i, key) in keys.iter().enumerate() {
            table.insert(key.clone(), i as u64).unwrap();
            map.insert(key.clone(), i as u64);
        }

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("probe_table/{size}"), |b| {
            b.iter(|| black_box(table.values().sum::<u64>()))
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter(|| black_box(map.values().sum::<u64>()))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_random::<u64, 4>,
    bench_insert_random::<StringKey, 4>,
    bench_find_hit_miss::<u64, 4>,
    bench_find_hit_miss::<StringKey, 4>,
    bench_remove_all::<u64, 4>,
    bench_remove_all::<StringKey, 4>,
    bench_churn::<u64, 4>,
    bench_churn::<StringKey, 4>,
    bench_mixed_zipf::<u64, 4>,
    bench_mixed_zipf::<StringKey, 4>,
    bench_iteration::<u64, 4>,
    bench_iteration::<StringKey, 4>,
);

criterion_main!(benches);

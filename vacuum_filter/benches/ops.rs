//! Insert / contains / save benchmarks.
//! 插入 / 查询 / 保存基准测试

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use mimalloc::MiMalloc;

use vacuum_filter::{Conf, Filter, Kind, factory};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const MAX_SIZE: usize = 1 << 20;

fn insert(c: &mut Criterion) {
  let mut group = c.benchmark_group("insert");

  for kind in [Kind::Naive, Kind::Mobile] {
    group.bench_function(BenchmarkId::new("kind", format!("{kind:?}")), |b| {
      let mut filter = factory::create_filter_with(kind, MAX_SIZE, &[Conf::Seed(0)]).unwrap();
      let mut rng = fastrand::Rng::with_seed(1);
      b.iter(|| {
        // Start over before the filter fills up
        // 过滤器将满时重新开始
        if filter.size() * 10 >= MAX_SIZE * 9 {
          filter = factory::create_filter_with(kind, MAX_SIZE, &[Conf::Seed(0)]).unwrap();
        }
        let _ = std::hint::black_box(filter.insert(rng.u64(..)));
      })
    });
  }
}

fn contains(c: &mut Criterion) {
  let mut group = c.benchmark_group("contains");

  for kind in [Kind::Naive, Kind::Mobile] {
    let mut filter = factory::create_filter_with(kind, MAX_SIZE, &[Conf::Seed(0)]).unwrap();
    // Pre-fill to 90% for realistic probing
    // 预填充到 90% 以进行真实探测
    for i in 0..(MAX_SIZE * 9 / 10) as u64 {
      let _ = filter.insert(i);
    }

    group.bench_function(BenchmarkId::new("kind", format!("{kind:?}")), |b| {
      let mut i = 0u64;
      b.iter(|| {
        let r = filter.contains(i);
        i = (i + 1) % (MAX_SIZE as u64 * 2);
        std::hint::black_box(r)
      })
    });
  }
}

fn save(c: &mut Criterion) {
  let mut group = c.benchmark_group("save");
  group.sample_size(10);

  for kind in [Kind::Naive, Kind::Mobile] {
    let mut filter = factory::create_filter_with(kind, MAX_SIZE, &[Conf::Seed(0)]).unwrap();
    for i in 0..(MAX_SIZE / 2) as u64 {
      let _ = filter.insert(i);
    }
    group.bench_function(BenchmarkId::new("kind", format!("{kind:?}")), |b| {
      b.iter(|| std::hint::black_box(filter.save()))
    });
  }
}

criterion_group!(benches, insert, contains, save);
criterion_main!(benches);

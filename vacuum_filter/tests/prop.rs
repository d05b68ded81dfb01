//! Property tests / 属性测试

use std::collections::HashSet;

use proptest::prelude::*;
use vacuum_filter::{Conf, Error, Filter, Kind, factory, param};

#[static_init::constructor(0)]
extern "C" fn _log_init() {
  log_init::init();
}

#[derive(Debug, Clone)]
enum Op {
  Insert(u64),
  Remove(usize),
}

fn op() -> impl Strategy<Value = Op> {
  prop_oneof![
    3 => any::<u64>().prop_map(Op::Insert),
    1 => any::<usize>().prop_map(Op::Remove),
  ]
}

fn kind() -> impl Strategy<Value = Kind> {
  prop_oneof![Just(Kind::Naive), Just(Kind::Mobile)]
}

fn multiset(filter: &dyn Filter) -> Vec<Vec<u64>> {
  (0..filter.bucket_num())
    .map(|i| {
      let mut fps = filter.bucket(i).as_slice().to_vec();
      fps.sort_unstable();
      fps
    })
    .collect()
}

proptest! {
  #![proptest_config(ProptestConfig::with_cases(64))]

  /// No false negatives and lossless save/load after any op sequence
  /// 任意操作序列后无假阴性，保存/加载无损
  #[test]
  fn ops_keep_members(
    kind in kind(),
    max_size in 1usize..3000,
    seed in any::<u64>(),
    ops in prop::collection::vec(op(), 0..600),
  ) {
    let mut filter = factory::create_filter_with(kind, max_size, &[Conf::Seed(seed)]).unwrap();
    let mut live: Vec<u64> = Vec::new();
    let mut seen = HashSet::new();

    for op in ops {
      match op {
        Op::Insert(item) => {
          if !seen.insert(item) {
            continue;
          }
          let size = filter.size();
          match filter.insert(item) {
            Ok(touched) => {
              prop_assert_eq!(filter.size(), size + 1);
              prop_assert!(!touched.is_empty());
              live.push(item);
            }
            Err(Error::Full { .. }) => prop_assert_eq!(size, max_size),
            // Fingerprint collision with a live item
            // 与存活元素的指纹冲突
            Err(Error::Duplicate) => prop_assert!(filter.contains(item)),
            // Only near full load; the instance is done after this
            // 仅在接近满载时发生，之后此实例作废
            Err(Error::Exhausted { .. }) => {
              let slots = filter.bucket_num() * filter.entries_per_bucket();
              prop_assert!(size * 10 >= slots * 9, "exhausted at {size}/{slots}");
              return Ok(());
            }
            Err(e) => prop_assert!(false, "insert: {e}"),
          }
        }
        Op::Remove(i) if !live.is_empty() => {
          let item = live.swap_remove(i % live.len());
          let size = filter.size();
          filter.remove(item).unwrap();
          prop_assert_eq!(filter.size(), size - 1);
        }
        Op::Remove(_) => {}
      }
    }

    prop_assert_eq!(filter.size(), live.len());
    for &item in &live {
      prop_assert!(filter.contains(item));
    }

    let loaded = factory::load(&filter.save()).unwrap();
    prop_assert_eq!(loaded.size(), filter.size());
    prop_assert_eq!(loaded.max_size(), filter.max_size());
    prop_assert_eq!(multiset(&*loaded), multiset(&*filter));
    for &item in &live {
      prop_assert!(loaded.contains(item));
    }
  }

  /// Chunk search always ends on a power of two
  /// 块搜索总以 2 的幂结束
  #[test]
  fn range_selection_terminates(
    n in 1usize..10_000_000,
    load_factor in 0.01f64..=1.0,
    fill in 0.01f64..=1.0,
  ) {
    let l = param::range_selection(n, load_factor, fill);
    prop_assert!(l.is_power_of_two());
    prop_assert_eq!(param::bucket_num(n, load_factor) % param::range_selection(n, load_factor, 1.0), 0);
  }

  /// Oracle and filter agree for any capacity
  /// 任意容量下预言机与过滤器一致
  #[test]
  fn oracle_agrees(
    kind in kind(),
    max_size in 1usize..(1 << 20),
    items in prop::collection::vec(any::<u64>(), 1..50),
  ) {
    let oracle = factory::create_position_oracle(kind, max_size).unwrap();
    let layout = kind.layout(max_size);
    for item in items {
      let pos = layout.locate(item);
      prop_assert_eq!(oracle.positions(item), [pos.bucket1, pos.bucket2]);
      prop_assert_eq!(oracle.fingerprint(item), pos.fp);
      prop_assert!(pos.fp != 0);
      prop_assert_eq!(layout.alt(pos.bucket2, pos.fp), pos.bucket1);
    }
  }
}

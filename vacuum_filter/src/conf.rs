/// Filter configuration
/// 过滤器配置
#[derive(Clone, Copy, Debug)]
pub enum Conf {
  /// Seed the eviction RNG for reproducible inserts
  /// 为驱逐随机数生成器设定种子，使插入可复现
  Seed(u64),
  /// Give up insertion after this many kicks
  /// 踢出多少次后放弃插入
  MaxKicks(usize),
}

/// Default kick bound.
/// 默认踢出上限
pub const MAX_NUM_KICKS: usize = 2048;

/// Resolved options.
/// 解析后的选项
#[derive(Debug)]
pub(crate) struct Opt {
  pub rng: fastrand::Rng,
  pub max_kicks: usize,
}

impl Opt {
  pub fn new(conf: &[Conf]) -> Self {
    let mut rng = None;
    let mut max_kicks = MAX_NUM_KICKS;
    for c in conf {
      match c {
        Conf::Seed(seed) => rng = Some(fastrand::Rng::with_seed(*seed)),
        Conf::MaxKicks(n) => max_kicks = *n,
      }
    }
    Self {
      rng: rng.unwrap_or_else(fastrand::Rng::new),
      max_kicks,
    }
  }
}

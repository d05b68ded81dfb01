//! Storage-free position computation.
//! 无存储的位置计算

use crate::{
  error::{Error, Result},
  layout::Layout,
  param::ALTERNATE_RANGE_NUM,
  variant::Kind,
};

/// Computes where a filter of the same kind and capacity would place an item.
/// 计算同类型同容量过滤器放置元素的位置
///
/// Lets a peer plan bucket-level indices before the filter itself is built
/// or received.
/// 使对端在过滤器构建或接收之前即可规划桶级索引
///
/// ```
/// use vacuum_filter::{Kind, NaiveVacuumFilter, PositionOracle};
///
/// let oracle = PositionOracle::new(Kind::Naive, 1000).unwrap();
/// let mut filter = NaiveVacuumFilter::new(1000).unwrap();
/// let touched = filter.insert(7).unwrap();
/// assert!(oracle.positions(7).contains(&touched[0]));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOracle {
  kind: Kind,
  layout: Layout,
}

impl PositionOracle {
  /// Derive geometry for `kind` and `max_size`.
  /// 为 `kind` 与 `max_size` 推导几何结构
  pub fn new(kind: Kind, max_size: usize) -> Result<Self> {
    if max_size == 0 || max_size > u32::MAX as usize {
      return Err(Error::InvalidMaxSize(max_size));
    }
    Ok(Self {
      kind,
      layout: kind.layout(max_size),
    })
  }

  /// Candidate buckets `[bucket1, bucket2]`.
  /// 候选桶 `[bucket1, bucket2]`
  #[inline]
  pub fn positions(&self, item: u64) -> [usize; 2] {
    let pos = self.layout.locate(item);
    [pos.bucket1, pos.bucket2]
  }

  /// Non-zero fingerprint.
  /// 非零指纹
  #[inline]
  pub fn fingerprint(&self, item: u64) -> u64 {
    self.layout.locate(item).fp
  }

  /// Returns filter kind.
  /// 返回过滤器类型
  #[inline]
  pub fn kind(&self) -> Kind {
    self.kind
  }

  /// Returns capacity.
  /// 返回容量
  #[inline]
  pub fn max_size(&self) -> usize {
    self.layout.max_size()
  }

  /// Returns bucket count.
  /// 返回桶数量
  #[inline]
  pub fn bucket_num(&self) -> usize {
    self.layout.bucket_num()
  }

  /// Returns alternate range table.
  /// 返回备选范围表
  #[inline]
  pub fn alternate_range(&self) -> [usize; ALTERNATE_RANGE_NUM] {
    self.layout.alternate_range()
  }
}

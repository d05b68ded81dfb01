//! Filter geometry and position computation.
//! 过滤器几何结构与位置计算
//!
//! Shared by [`crate::VacuumFilter`] and [`crate::PositionOracle`], so both
//! always agree on bucket indices and fingerprints.
//! 由 [`crate::VacuumFilter`] 与 [`crate::PositionOracle`] 共用，二者的桶索引与指纹始终一致

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

use crate::{
  hash::{K1, K2, mix},
  param::{self, ALTERNATE_RANGE_NUM},
};

/// Filters at least this large use chunked alternate indices.
/// 不小于此容量的过滤器使用分块备选索引
pub const LARGE_FILTER: usize = 1 << 18;

/// Candidate buckets and fingerprint of one item.
/// 单个元素的候选桶与指纹
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pos {
  /// Primary bucket.
  /// 主桶
  pub bucket1: usize,
  /// Alternate bucket.
  /// 备选桶
  pub bucket2: usize,
  /// Non-zero fingerprint.
  /// 非零指纹
  pub fp: u64,
}

/// Immutable geometry derived from `(max_size, load_factor, fp_bytes)`.
/// 由 `(max_size, load_factor, fp_bytes)` 推导的不可变几何结构
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub struct Layout {
  max_size: usize,
  bucket_num: usize,
  ar: [usize; ALTERNATE_RANGE_NUM],
  fp_bytes: usize,
  fp_mod: u64,
}

impl Layout {
  /// Derive geometry. `max_size` must be non-zero.
  /// 推导几何结构，`max_size` 必须非零
  pub fn new(max_size: usize, load_factor: f64, fp_bytes: usize) -> Self {
    debug_assert!(max_size > 0);
    debug_assert!((1..=8).contains(&fp_bytes));
    let ar = param::alternate_range(max_size, load_factor);
    let bucket_num = param::bucket_num_with_range(max_size, load_factor, &ar);
    Self {
      max_size,
      bucket_num,
      ar,
      fp_bytes,
      fp_mod: u64::MAX >> (64 - fp_bytes * 8),
    }
  }

  /// Returns capacity.
  /// 返回容量
  #[inline]
  pub fn max_size(&self) -> usize {
    self.max_size
  }

  /// Returns bucket count.
  /// 返回桶数量
  #[inline]
  pub fn bucket_num(&self) -> usize {
    self.bucket_num
  }

  /// Returns alternate range table.
  /// 返回备选范围表
  #[inline]
  pub fn alternate_range(&self) -> [usize; ALTERNATE_RANGE_NUM] {
    self.ar
  }

  /// Returns fingerprint width in bytes.
  /// 返回指纹字节宽度
  #[inline]
  pub fn fp_bytes(&self) -> usize {
    self.fp_bytes
  }

  /// Largest fingerprint value, `2^bits - 1`.
  /// 最大指纹值 `2^bits - 1`
  #[inline]
  pub fn fp_max(&self) -> u64 {
    self.fp_mod
  }

  /// Compute candidate buckets and fingerprint.
  /// 计算候选桶与指纹
  #[inline]
  pub fn locate(&self, item: u64) -> Pos {
    let ele = mix(item ^ K1);
    // Hash into [0, 2^bits - 2] then shift past the empty sentinel
    // 哈希到 [0, 2^bits - 2] 后加一以避开空槽位标记
    let fp = mix(ele ^ K2) % self.fp_mod + 1;
    let bucket1 = (ele % self.bucket_num as u64) as usize;
    Pos {
      bucket1,
      bucket2: self.alt(bucket1, fp),
      fp,
    }
  }

  /// Alternate bucket of `fp` stored in bucket `i`. Involution: `alt(alt(i, fp), fp) == i`.
  /// 存放于桶 `i` 的 `fp` 的备选桶，满足对合：`alt(alt(i, fp), fp) == i`
  #[inline]
  pub fn alt(&self, i: usize, fp: u64) -> usize {
    let m = self.bucket_num;
    let h = (mix(fp) % m as u64) as usize;
    if self.max_size >= LARGE_FILTER {
      // Stay inside the aligned chunk of size AR[fp & 3]
      // 停留在大小为 AR[fp & 3] 的对齐块内
      let range = self.ar[(fp & 3) as usize];
      i ^ (h % range)
    } else {
      let shifted = (i + m - h) % m;
      (m - 1 - shifted + h) % m
    }
  }
}

//! Analytic parameter selection: bucket count and alternate ranges.
//! 解析式参数选择：桶数量与备选范围
//!
//! Buckets are grouped into power-of-two chunks. An item's two candidate
//! buckets always share one chunk, so a smaller chunk means better locality
//! but a higher chance that some chunk overflows. `range_selection` picks the
//! smallest chunk whose estimated maximum load still fits.
//!
//! 桶被划分为 2 的幂大小的块，元素的两个候选桶总在同一块内。
//! 块越小局部性越好，但溢出概率越高。`range_selection` 选择估计最大负载仍能容纳的最小块。

use crate::ENTRIES_PER_BUCKET;

/// Number of alternate ranges, selected by the low 2 bits of a fingerprint.
/// 备选范围数量，由指纹低 2 位选择
pub const ALTERNATE_RANGE_NUM: usize = 4;

/// Share of a chunk's slots that must stay above the estimated maximum load.
/// 块槽位中必须高于估计最大负载的比例
const CHUNK_FILL_BOUND: f64 = 0.97;

/// Check whether chunks of `range` buckets hold `fill` of the target load.
/// 检查 `range` 个桶的块能否容纳目标负载的 `fill` 部分
///
/// Balls-into-bins bound: with `N` items spread over `c` chunks, the most
/// loaded chunk holds about `N/c + 1.5 * sqrt(2 * N/c * ln c)` items.
/// 球入箱界：`N` 个元素分布到 `c` 个块，最满的块约有 `N/c + 1.5 * sqrt(2 * N/c * ln c)` 个元素
pub fn load_factor_test(n: usize, load_factor: f64, fill: f64, range: usize) -> bool {
  let per_bucket = ENTRIES_PER_BUCKET as f64;
  let l = range as f64;
  let m = (n as f64 / (per_bucket * load_factor * l)).ceil() * l;
  let items = (per_bucket * fill * m * load_factor).ceil();
  let chunks = (m / l).ceil();
  let capacity = (CHUNK_FILL_BOUND * per_bucket * l).ceil();
  let avg = items / chunks;
  let max_load = (avg + 1.5 * (2.0 * avg * chunks.ln()).sqrt()).ceil();
  max_load < capacity
}

/// Smallest power-of-two chunk passing [`load_factor_test`], doubling from 1.
/// 从 1 开始翻倍，通过 [`load_factor_test`] 的最小 2 的幂块大小
///
/// When `load_factor * fill` reaches the chunk fill bound no chunk can pass,
/// and the search returns the chunk covering the whole table.
/// 当 `load_factor * fill` 达到块填充上界时没有块能通过，返回覆盖整个表的块
pub fn range_selection(n: usize, load_factor: f64, fill: f64) -> usize {
  if load_factor * fill >= CHUNK_FILL_BOUND {
    return min_bucket_num(n, load_factor).next_power_of_two();
  }
  let mut range: usize = 1;
  while !load_factor_test(n, load_factor, fill, range) {
    match range.checked_mul(2) {
      Some(next) => range = next,
      None => break,
    }
  }
  range
}

/// Alternate range table, one chunk size per fingerprint band.
/// 备选范围表，每个指纹区段一个块大小
///
/// Band `i` only needs to hold `1 - i/4` of the load. The last band is
/// doubled to cut insertion failures, but never past band 0 so that every
/// chunk still divides the bucket count.
/// 区段 `i` 只需容纳 `1 - i/4` 的负载。最后一个区段翻倍以减少插入失败，
/// 但不超过区段 0，保证每个块都能整除桶数量
pub fn alternate_range(n: usize, load_factor: f64) -> [usize; ALTERNATE_RANGE_NUM] {
  let mut ar = [0; ALTERNATE_RANGE_NUM];
  for (i, r) in ar.iter_mut().enumerate() {
    let fill = 1.0 - i as f64 / ALTERNATE_RANGE_NUM as f64;
    *r = range_selection(n, load_factor, fill);
  }
  let last = ALTERNATE_RANGE_NUM - 1;
  ar[last] = (ar[last] * 2).min(ar[0]);
  ar
}

/// Bucket count for `n` items, a multiple of the full-load chunk size.
/// `n` 个元素的桶数量，为满载块大小的倍数
pub fn bucket_num(n: usize, load_factor: f64) -> usize {
  let l0 = range_selection(n, load_factor, 1.0);
  min_bucket_num(n, load_factor).div_ceil(l0) * l0
}

/// Bucket count using a precomputed alternate range table.
/// 使用预计算备选范围表的桶数量
pub fn bucket_num_with_range(n: usize, load_factor: f64, ar: &[usize; ALTERNATE_RANGE_NUM]) -> usize {
  let m0 = (n as f64 / load_factor / ALTERNATE_RANGE_NUM as f64).ceil() as usize;
  m0.max(1).div_ceil(ar[0]) * ar[0]
}

#[inline]
fn min_bucket_num(n: usize, load_factor: f64) -> usize {
  ((n as f64 / load_factor / ENTRIES_PER_BUCKET as f64).ceil() as usize).max(1)
}

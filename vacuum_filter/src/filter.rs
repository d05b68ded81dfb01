//! Core vacuum filter implementation.
//! 核心真空过滤器实现

use std::marker::PhantomData;

use log::{debug, warn};

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

use crate::{
  Bucket, ENTRIES_PER_BUCKET,
  conf::{Conf, Opt},
  error::{Error, Result},
  layout::{Layout, Pos},
  param::ALTERNATE_RANGE_NUM,
  variant::{Kind, Variant},
  wire::{self, Packets, malformed},
};

/// Vacuum filter with a fixed capacity.
/// 固定容量的真空过滤器
///
/// # Examples
///
/// ```
/// use vacuum_filter::NaiveVacuumFilter;
///
/// let mut filter = NaiveVacuumFilter::new(1000).unwrap();
/// assert!(!filter.contains(42));
/// filter.insert(42).unwrap();
/// assert!(filter.contains(42));
/// filter.remove(42).unwrap();
/// assert!(!filter.contains(42));
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde_support", serde(bound = ""))]
pub struct VacuumFilter<V> {
  layout: Layout,
  buckets: Vec<Bucket>,
  size: usize,
  max_kicks: usize,
  #[cfg_attr(feature = "serde_support", serde(skip, default = "fastrand::Rng::new"))]
  rng: fastrand::Rng,
  _variant: PhantomData<V>,
}

impl<V: Variant> VacuumFilter<V> {
  /// Create empty filter for up to `max_size` items.
  /// 创建最多容纳 `max_size` 个元素的空过滤器
  pub fn new(max_size: usize) -> Result<Self> {
    Self::with_conf(max_size, &[])
  }

  /// Create empty filter with options.
  /// 使用选项创建空过滤器
  pub fn with_conf(max_size: usize, conf: &[Conf]) -> Result<Self> {
    if max_size == 0 || max_size > u32::MAX as usize {
      return Err(Error::InvalidMaxSize(max_size));
    }
    let layout = V::KIND.layout(max_size);
    debug!(
      "vacuum filter {:?}: max_size={max_size} bucket_num={} ar={:?}",
      V::KIND,
      layout.bucket_num(),
      layout.alternate_range()
    );
    let buckets = vec![Bucket::default(); layout.bucket_num()];
    Ok(Self::from_parts(layout, buckets, 0, conf))
  }

  fn from_parts(layout: Layout, buckets: Vec<Bucket>, size: usize, conf: &[Conf]) -> Self {
    let Opt { rng, max_kicks } = Opt::new(conf);
    Self {
      layout,
      buckets,
      size,
      max_kicks,
      rng,
      _variant: PhantomData,
    }
  }

  /// Returns variant tag.
  /// 返回变体标签
  #[inline]
  pub fn kind(&self) -> Kind {
    V::KIND
  }

  /// Returns item count.
  /// 返回元素数量
  #[inline]
  pub fn size(&self) -> usize {
    self.size
  }

  /// Returns true if empty.
  /// 为空时返回 true
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.size == 0
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

  /// Returns slots per bucket.
  /// 返回每桶槽位数
  #[inline]
  pub fn entries_per_bucket(&self) -> usize {
    ENTRIES_PER_BUCKET
  }

  /// Returns fingerprint width in bytes.
  /// 返回指纹字节宽度
  #[inline]
  pub fn fingerprint_byte_len(&self) -> usize {
    self.layout.fp_bytes()
  }

  /// Returns target load factor.
  /// 返回目标负载因子
  #[inline]
  pub fn load_factor(&self) -> f64 {
    V::LOAD_FACTOR
  }

  /// Returns alternate range table.
  /// 返回备选范围表
  #[inline]
  pub fn alternate_range(&self) -> [usize; ALTERNATE_RANGE_NUM] {
    self.layout.alternate_range()
  }

  /// Returns geometry.
  /// 返回几何结构
  #[inline]
  pub fn layout(&self) -> &Layout {
    &self.layout
  }

  /// Returns bucket `i`. Panics if out of range.
  /// 返回第 `i` 个桶，越界时 panic
  #[inline]
  pub fn bucket(&self, i: usize) -> &Bucket {
    &self.buckets[i]
  }

  /// Returns all buckets.
  /// 返回所有桶
  #[inline]
  pub fn buckets(&self) -> &[Bucket] {
    &self.buckets
  }

  /// Iterate `(bucket index, fingerprint)` over occupied slots.
  /// 遍历已占用槽位的 `(桶索引, 指纹)`
  pub fn iter(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
    self
      .buckets
      .iter()
      .enumerate()
      .flat_map(|(i, b)| b.as_slice().iter().map(move |&fp| (i, fp)))
  }

  /// Check if item may exist.
  /// 检查元素是否可能存在
  #[inline]
  pub fn contains(&self, item: u64) -> bool {
    let pos = self.layout.locate(item);
    self.buckets[pos.bucket1].contains(pos.fp) || self.buckets[pos.bucket2].contains(pos.fp)
  }

  /// Insert item, returning modified bucket indices in ascending order.
  /// 插入元素，返回升序排列的已修改桶索引
  ///
  /// On [`Error::Exhausted`] the walk is not rolled back: `size` has advanced
  /// and one stored fingerprint is lost, so the filter should be discarded.
  /// 返回 [`Error::Exhausted`] 时不回滚：`size` 已增加且丢失一个指纹，应丢弃此过滤器
  pub fn insert(&mut self, item: u64) -> Result<Vec<usize>> {
    if self.size >= self.max_size() {
      return Err(Error::Full {
        max_size: self.max_size(),
      });
    }
    if self.contains(item) {
      return Err(Error::Duplicate);
    }

    let pos = self.layout.locate(item);
    if self.buckets[pos.bucket1].try_insert(pos.fp) {
      self.size += 1;
      return Ok(vec![pos.bucket1]);
    }
    if self.buckets[pos.bucket2].try_insert(pos.fp) {
      self.size += 1;
      return Ok(vec![pos.bucket2]);
    }

    let r = kick(
      &self.layout,
      &mut self.buckets,
      &mut self.rng,
      self.max_kicks,
      pos,
    );
    self.size += 1;
    if let Err(Error::Exhausted { touched }) = &r {
      warn!(
        "vacuum filter insert exhausted: size={} max_size={} touched={}",
        self.size,
        self.max_size(),
        touched.len()
      );
    }
    r
  }

  /// Remove item, returning the modified bucket index.
  /// 移除元素，返回已修改的桶索引
  pub fn remove(&mut self, item: u64) -> Result<usize> {
    let Pos {
      bucket1,
      bucket2,
      fp,
    } = self.layout.locate(item);
    let in1 = self.buckets[bucket1].contains(fp);
    let in2 = bucket1 != bucket2 && self.buckets[bucket2].contains(fp);
    let i = match (in1, in2) {
      (true, false) => bucket1,
      (false, true) => bucket2,
      (false, false) => return Err(Error::NotFound),
      (true, true) => return Err(Error::Ambiguous { bucket1, bucket2 }),
    };
    self.buckets[i].remove(fp);
    self.size -= 1;
    Ok(i)
  }

  /// Encode as a packet list.
  /// 编码为数据包列表
  pub fn save(&self) -> Packets {
    let mut out = Vec::with_capacity(V::KIND.packet_num());
    out.push(wire::encode_tag(V::KIND));
    out.push(wire::encode_head(self.max_size(), self.size));
    V::encode(&self.layout, &self.buckets, &mut out);
    out
  }

  /// Decode a packet list produced by [`Self::save`].
  /// 解码由 [`Self::save`] 生成的数据包列表
  pub fn load(packets: &[Vec<u8>]) -> Result<Self> {
    Self::load_with(packets, &[])
  }

  /// Decode with options.
  /// 使用选项解码
  pub fn load_with(packets: &[Vec<u8>], conf: &[Conf]) -> Result<Self> {
    let expect = V::KIND.packet_num();
    if packets.len() != expect {
      return Err(malformed(format!("packets {} != {expect}", packets.len())));
    }
    let kind = wire::decode_tag(&packets[0])?;
    if kind != V::KIND {
      return Err(malformed(format!("tag {kind:?} != {:?}", V::KIND)));
    }
    let (max_size, size) = wire::decode_head(&packets[1])?;
    let layout = V::KIND.layout(max_size);
    let buckets = V::decode(&layout, &packets[2..])?;
    let count: usize = buckets.iter().map(Bucket::len).sum();
    if count != size {
      return Err(malformed(format!("fingerprints {count} != size {size}")));
    }
    debug!("vacuum filter {kind:?} loaded: max_size={max_size} size={size}");
    Ok(Self::from_parts(layout, buckets, size, conf))
  }
}

/// Eviction walk for a fingerprint whose candidate buckets are both full.
/// 为两个候选桶都已满的指纹执行驱逐游走
///
/// Each round first looks for a resident of the current bucket whose
/// alternate bucket has room; only then kicks a random resident.
/// 每轮先寻找备选桶有空位的住户，找不到才随机踢出一个
fn kick(
  layout: &Layout,
  buckets: &mut [Bucket],
  rng: &mut fastrand::Rng,
  max_kicks: usize,
  pos: Pos,
) -> Result<Vec<usize>> {
  let mut fp = pos.fp;
  let mut i = if rng.bool() { pos.bucket1 } else { pos.bucket2 };
  let mut touched = Vec::new();

  for _ in 0..max_kicks {
    touched.push(i);
    if buckets[i].try_insert(fp) {
      return Ok(finish(touched));
    }

    let bucket = buckets[i];
    for (slot, &resident) in bucket.as_slice().iter().enumerate() {
      let j = layout.alt(i, resident);
      if buckets[j].try_insert(resident) {
        buckets[i].replace(slot, fp);
        touched.push(j);
        return Ok(finish(touched));
      }
    }

    let slot = rng.usize(..ENTRIES_PER_BUCKET);
    fp = buckets[i].replace(slot, fp);
    i = layout.alt(i, fp);
  }
  Err(Error::Exhausted {
    touched: finish(touched),
  })
}

#[inline]
fn finish(mut touched: Vec<usize>) -> Vec<usize> {
  touched.sort_unstable();
  touched.dedup();
  touched
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::{Mobile, Naive};

  #[test]
  fn exhausted_when_all_full() {
    let mut filter = VacuumFilter::<Naive>::with_conf(1000, &[Conf::Seed(7)]).unwrap();
    // Fill every slot with fingerprints nobody will query
    // 用不会被查询的指纹填满所有槽位
    let mut fp = 1u64;
    for bucket in &mut filter.buckets {
      while bucket.try_insert(fp) {
        fp += 1;
      }
    }
    let item = (0..).find(|&item| !filter.contains(item)).unwrap();
    let err = filter.insert(item).unwrap_err();
    let Error::Exhausted { touched } = err else {
      panic!("unexpected {err:?}");
    };
    assert!(!touched.is_empty());
    assert!(touched.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(filter.size(), 1);
  }

  #[test]
  fn zero_kicks_fail_fast() {
    let mut filter =
      VacuumFilter::<Mobile>::with_conf(1000, &[Conf::Seed(1), Conf::MaxKicks(0)]).unwrap();
    for bucket in &mut filter.buckets {
      let mut fp = 1u64;
      while bucket.try_insert(fp) {
        fp += 1;
      }
    }
    let item = (0..).find(|&item| !filter.contains(item)).unwrap();
    assert_eq!(
      filter.insert(item),
      Err(Error::Exhausted { touched: vec![] })
    );
  }

  #[test]
  fn ambiguous_remove() {
    let mut filter = VacuumFilter::<Naive>::new(1000).unwrap();
    let (item, pos) = (0u64..)
      .map(|item| (item, filter.layout.locate(item)))
      .find(|(_, pos)| pos.bucket1 != pos.bucket2)
      .unwrap();
    assert!(filter.buckets[pos.bucket1].try_insert(pos.fp));
    assert!(filter.buckets[pos.bucket2].try_insert(pos.fp));
    filter.size = 2;

    assert_eq!(
      filter.remove(item),
      Err(Error::Ambiguous {
        bucket1: pos.bucket1,
        bucket2: pos.bucket2
      })
    );
    assert_eq!(filter.size(), 2);
    assert_eq!(filter.bucket(pos.bucket1).len(), 1);
    assert_eq!(filter.bucket(pos.bucket2).len(), 1);
  }

  #[test]
  fn eviction_keeps_everything() {
    // 3911 items need exactly 1024 buckets, 90% fill forces kicks
    // 3911 个元素恰好需要 1024 个桶，90% 填充强制踢出
    let mut filter = VacuumFilter::<Naive>::with_conf(3911, &[Conf::Seed(42)]).unwrap();
    assert_eq!(filter.bucket_num(), 1024);
    let n = 1024 * ENTRIES_PER_BUCKET * 9 / 10;
    let mut rng = fastrand::Rng::with_seed(3);
    let mut items = Vec::with_capacity(n);
    let mut kicked = false;
    while items.len() < n {
      let item = rng.u64(..);
      match filter.insert(item) {
        Ok(touched) => {
          assert!(!touched.is_empty());
          kicked |= touched.len() > 1;
          items.push(item);
        }
        Err(Error::Duplicate) => continue,
        Err(e) => panic!("insert {}: {e}", items.len()),
      }
    }
    assert!(kicked);
    assert_eq!(filter.size(), n);
    for item in items {
      assert!(filter.contains(item));
    }
  }
}

//! Variant dispatch by type tag.
//! 按类型标签分发变体

use std::fmt;

use crate::{
  Bucket, ENTRIES_PER_BUCKET, MobileVacuumFilter, NaiveVacuumFilter, VacuumFilter,
  conf::Conf,
  error::{Error, Result},
  oracle::PositionOracle,
  variant::{Kind, Variant},
  wire::{self, HEAD_LEN, Packets, TAG_LEN, bitmap_len, malformed},
};

/// Object-safe filter surface, implemented by every [`VacuumFilter`].
/// 对象安全的过滤器接口，所有 [`VacuumFilter`] 均实现
pub trait Filter: fmt::Debug + Send {
  /// Variant tag.
  /// 变体标签
  fn kind(&self) -> Kind;
  /// Check if item may exist.
  /// 检查元素是否可能存在
  fn contains(&self, item: u64) -> bool;
  /// Insert item, returning modified bucket indices.
  /// 插入元素，返回已修改的桶索引
  fn insert(&mut self, item: u64) -> Result<Vec<usize>>;
  /// Remove item, returning the modified bucket index.
  /// 移除元素，返回已修改的桶索引
  fn remove(&mut self, item: u64) -> Result<usize>;
  /// Encode as a packet list.
  /// 编码为数据包列表
  fn save(&self) -> Packets;
  /// Bucket `i`.
  /// 第 `i` 个桶
  fn bucket(&self, i: usize) -> &Bucket;
  /// Item count.
  /// 元素数量
  fn size(&self) -> usize;
  /// Capacity.
  /// 容量
  fn max_size(&self) -> usize;
  /// Bucket count.
  /// 桶数量
  fn bucket_num(&self) -> usize;
  /// Slots per bucket.
  /// 每桶槽位数
  fn entries_per_bucket(&self) -> usize;
  /// Fingerprint width in bytes.
  /// 指纹字节宽度
  fn fingerprint_byte_len(&self) -> usize;
}

impl<V: Variant> Filter for VacuumFilter<V> {
  fn kind(&self) -> Kind {
    V::KIND
  }

  fn contains(&self, item: u64) -> bool {
    VacuumFilter::contains(self, item)
  }

  fn insert(&mut self, item: u64) -> Result<Vec<usize>> {
    VacuumFilter::insert(self, item)
  }

  fn remove(&mut self, item: u64) -> Result<usize> {
    VacuumFilter::remove(self, item)
  }

  fn save(&self) -> Packets {
    VacuumFilter::save(self)
  }

  fn bucket(&self, i: usize) -> &Bucket {
    VacuumFilter::bucket(self, i)
  }

  fn size(&self) -> usize {
    VacuumFilter::size(self)
  }

  fn max_size(&self) -> usize {
    VacuumFilter::max_size(self)
  }

  fn bucket_num(&self) -> usize {
    VacuumFilter::bucket_num(self)
  }

  fn entries_per_bucket(&self) -> usize {
    ENTRIES_PER_BUCKET
  }

  fn fingerprint_byte_len(&self) -> usize {
    VacuumFilter::fingerprint_byte_len(self)
  }
}

/// Create an empty filter of `kind`.
/// 创建 `kind` 类型的空过滤器
pub fn create_filter(kind: Kind, max_size: usize) -> Result<Box<dyn Filter>> {
  create_filter_with(kind, max_size, &[])
}

/// Create an empty filter of `kind` with options.
/// 使用选项创建 `kind` 类型的空过滤器
pub fn create_filter_with(kind: Kind, max_size: usize, conf: &[Conf]) -> Result<Box<dyn Filter>> {
  Ok(match kind {
    Kind::Naive => Box::new(NaiveVacuumFilter::with_conf(max_size, conf)?),
    Kind::Mobile => Box::new(MobileVacuumFilter::with_conf(max_size, conf)?),
  })
}

/// Create a position oracle matching [`create_filter`] for the same arguments.
/// 创建与相同参数的 [`create_filter`] 一致的位置预言机
pub fn create_position_oracle(kind: Kind, max_size: usize) -> Result<PositionOracle> {
  PositionOracle::new(kind, max_size)
}

/// Upper bound of the saved size in bytes, all slots counted as occupied.
/// 序列化字节数上界，所有槽位按已占用计算
pub fn estimate_byte_size(kind: Kind, max_size: usize) -> Result<usize> {
  if max_size == 0 || max_size > u32::MAX as usize {
    return Err(Error::InvalidMaxSize(max_size));
  }
  let slots = kind.layout(max_size).bucket_num() * ENTRIES_PER_BUCKET;
  let body = slots * kind.fp_bytes();
  Ok(match kind {
    Kind::Naive => TAG_LEN + HEAD_LEN + body,
    Kind::Mobile => TAG_LEN + HEAD_LEN + bitmap_len(slots) + body,
  })
}

/// Decode a packet list, dispatching on its type tag.
/// 解码数据包列表，按类型标签分发
pub fn load(packets: &[Vec<u8>]) -> Result<Box<dyn Filter>> {
  load_with(packets, &[])
}

/// Decode a packet list with options.
/// 使用选项解码数据包列表
pub fn load_with(packets: &[Vec<u8>], conf: &[Conf]) -> Result<Box<dyn Filter>> {
  let Some(tag) = packets.first() else {
    return Err(malformed("empty packet list"));
  };
  Ok(match wire::decode_tag(tag)? {
    Kind::Naive => Box::new(NaiveVacuumFilter::load_with(packets, conf)?),
    Kind::Mobile => Box::new(MobileVacuumFilter::load_with(packets, conf)?),
  })
}

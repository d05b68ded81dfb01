//! Filter variants: fingerprint width, load factor and wire encoding.
//! 过滤器变体：指纹宽度、负载因子与序列化编码

mod mobile;
mod naive;

pub use mobile::Mobile;
pub use naive::Naive;

use std::fmt;

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

use crate::{Bucket, error::Result, layout::Layout, wire::Packets};

/// Variant type tag, written as the first packet.
/// 变体类型标签，作为第一个数据包写入
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
#[repr(u32)]
pub enum Kind {
  /// Flat slot array, empty slots as zero.
  /// 扁平槽位数组，空槽位写零
  Naive = 0,
  /// Occupancy bitmap plus occupied fingerprints only.
  /// 占用位图加已占用指纹
  Mobile = 1,
}

impl Kind {
  /// Fingerprint width in bytes.
  /// 指纹字节宽度
  pub const fn fp_bytes(self) -> usize {
    match self {
      Self::Naive => Naive::FP_BYTES,
      Self::Mobile => Mobile::FP_BYTES,
    }
  }

  /// Target load factor.
  /// 目标负载因子
  pub const fn load_factor(self) -> f64 {
    match self {
      Self::Naive => Naive::LOAD_FACTOR,
      Self::Mobile => Mobile::LOAD_FACTOR,
    }
  }

  /// Packets in a saved filter, tag and header included.
  /// 序列化过滤器的数据包数量，含标签与头部
  pub const fn packet_num(self) -> usize {
    2 + match self {
      Self::Naive => Naive::BODY_PACKETS,
      Self::Mobile => Mobile::BODY_PACKETS,
    }
  }

  /// Geometry of a filter of this kind.
  /// 此类过滤器的几何结构
  pub fn layout(self, max_size: usize) -> Layout {
    Layout::new(max_size, self.load_factor(), self.fp_bytes())
  }
}

impl TryFrom<u32> for Kind {
  type Error = u32;

  fn try_from(tag: u32) -> std::result::Result<Self, u32> {
    match tag {
      0 => Ok(Self::Naive),
      1 => Ok(Self::Mobile),
      _ => Err(tag),
    }
  }
}

/// Parameter binding of the filter core.
/// 过滤器核心的参数绑定
pub trait Variant: fmt::Debug + Clone + Send + Sync + 'static {
  /// Type tag.
  /// 类型标签
  const KIND: Kind;
  /// Fingerprint width in bytes.
  /// 指纹字节宽度
  const FP_BYTES: usize;
  /// Target load factor.
  /// 目标负载因子
  const LOAD_FACTOR: f64;
  /// Packets after tag and header.
  /// 标签与头部之后的数据包数量
  const BODY_PACKETS: usize;

  /// Append body packets.
  /// 追加主体数据包
  fn encode(layout: &Layout, buckets: &[Bucket], out: &mut Packets);

  /// Rebuild buckets from body packets. `body.len()` is already checked.
  /// 从主体数据包重建桶，`body.len()` 已校验
  fn decode(layout: &Layout, body: &[Vec<u8>]) -> Result<Vec<Bucket>>;
}

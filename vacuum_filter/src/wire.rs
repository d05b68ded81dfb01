//! Packet list codec shared by all variants.
//! 所有变体共用的数据包列表编解码
//!
//! A saved filter is a list of byte packets:
//! `[type tag: u32 BE] [max_size: u32 BE | size: u32 BE] [body...]`.
//! 序列化后的过滤器是字节包列表：类型标签、头部、变体自定义的主体

use log::warn;

use crate::{
  error::{Error, Result},
  variant::Kind,
};

/// Type tag packet length.
/// 类型标签包长度
pub const TAG_LEN: usize = 4;

/// Header packet length.
/// 头部包长度
pub const HEAD_LEN: usize = 8;

/// Packet list, one owned buffer per element.
/// 数据包列表，每个元素一个缓冲区
pub type Packets = Vec<Vec<u8>>;

/// Reject wire data, logging the reason.
/// 拒绝序列化数据并记录原因
#[cold]
pub(crate) fn malformed(msg: impl Into<String>) -> Error {
  let msg = msg.into();
  warn!("vacuum filter load rejected: {msg}");
  Error::Malformed(msg)
}

pub(crate) fn encode_tag(kind: Kind) -> Vec<u8> {
  (kind as u32).to_be_bytes().to_vec()
}

pub(crate) fn decode_tag(packet: &[u8]) -> Result<Kind> {
  let bytes: [u8; TAG_LEN] = packet
    .try_into()
    .map_err(|_| malformed(format!("tag len {} != {TAG_LEN}", packet.len())))?;
  let tag = u32::from_be_bytes(bytes);
  Kind::try_from(tag).map_err(|_| malformed(format!("unknown tag {tag}")))
}

pub(crate) fn encode_head(max_size: usize, size: usize) -> Vec<u8> {
  let mut out = Vec::with_capacity(HEAD_LEN);
  out.extend_from_slice(&(max_size as u32).to_be_bytes());
  out.extend_from_slice(&(size as u32).to_be_bytes());
  out
}

/// Decode `(max_size, size)`.
/// 解码 `(max_size, size)`
pub(crate) fn decode_head(packet: &[u8]) -> Result<(usize, usize)> {
  if packet.len() != HEAD_LEN {
    return Err(malformed(format!("head len {} != {HEAD_LEN}", packet.len())));
  }
  let max_size = u32::from_be_bytes([packet[0], packet[1], packet[2], packet[3]]) as usize;
  let size = u32::from_be_bytes([packet[4], packet[5], packet[6], packet[7]]) as usize;
  if max_size == 0 {
    return Err(malformed("max_size 0"));
  }
  if size > max_size {
    return Err(malformed(format!("size {size} > max_size {max_size}")));
  }
  Ok((max_size, size))
}

/// Append `fp` as `fp_bytes` big-endian bytes.
/// 以 `fp_bytes` 字节大端序追加 `fp`
#[inline]
pub(crate) fn put_fp(out: &mut Vec<u8>, fp: u64, fp_bytes: usize) {
  out.extend_from_slice(&fp.to_be_bytes()[8 - fp_bytes..]);
}

#[inline]
pub(crate) fn get_fp(chunk: &[u8]) -> u64 {
  chunk.iter().fold(0, |acc, &b| (acc << 8) | b as u64)
}

/// Bytes needed for a one-bit-per-slot bitmap.
/// 每槽位一位的位图所需字节数
#[inline]
pub fn bitmap_len(slots: usize) -> usize {
  slots.div_ceil(8)
}

/// Set bit `i`, most significant bit first within each byte.
/// 设置第 `i` 位，字节内高位在前
#[inline]
pub(crate) fn set_bit(bitmap: &mut [u8], i: usize) {
  bitmap[i >> 3] |= 0x80 >> (i & 7);
}

#[inline]
pub(crate) fn get_bit(bitmap: &[u8], i: usize) -> bool {
  bitmap[i >> 3] & (0x80 >> (i & 7)) != 0
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn fp_is_big_endian() {
    let mut out = Vec::new();
    put_fp(&mut out, 0x0102_0304_0506, 6);
    put_fp(&mut out, 0xaabb_ccdd, 4);
    assert_eq!(out, [1, 2, 3, 4, 5, 6, 0xaa, 0xbb, 0xcc, 0xdd]);
    assert_eq!(get_fp(&out[..6]), 0x0102_0304_0506);
    assert_eq!(get_fp(&out[6..]), 0xaabb_ccdd);
  }

  #[test]
  fn bitmap_msb_first() {
    let mut bitmap = vec![0; bitmap_len(12)];
    assert_eq!(bitmap.len(), 2);
    set_bit(&mut bitmap, 0);
    set_bit(&mut bitmap, 9);
    assert_eq!(bitmap, [0x80, 0x40]);
    assert!(get_bit(&bitmap, 0));
    assert!(!get_bit(&bitmap, 1));
    assert!(get_bit(&bitmap, 9));
  }

  #[test]
  fn head_checks() {
    assert_eq!(decode_head(&encode_head(1000, 7)), Ok((1000, 7)));
    assert!(matches!(decode_head(&encode_head(0, 0)), Err(Error::Malformed(_))));
    assert!(matches!(decode_head(&encode_head(5, 6)), Err(Error::Malformed(_))));
    assert!(matches!(decode_head(&[0; 7]), Err(Error::Malformed(_))));
  }

  #[test]
  fn tag_checks() {
    assert_eq!(encode_tag(Kind::Mobile), [0, 0, 0, 1]);
    assert_eq!(decode_tag(&[0, 0, 0, 0]), Ok(Kind::Naive));
    assert!(matches!(decode_tag(&[0, 0, 0, 9]), Err(Error::Malformed(_))));
    assert!(matches!(decode_tag(&[0, 0, 1]), Err(Error::Malformed(_))));
  }
}

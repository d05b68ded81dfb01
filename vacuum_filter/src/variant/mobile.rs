//! Mobile variant: occupancy bitmap, then occupied fingerprints only.
//! 移动端变体：占用位图，之后仅写出已占用指纹
//!
//! Saves bandwidth on sparse filters at the cost of a bit scan on load.
//! 稀疏过滤器可节省带宽，代价是加载时需扫描位图

use super::{Kind, Variant};
use crate::{
  Bucket, ENTRIES_PER_BUCKET,
  error::Result,
  layout::Layout,
  wire::{Packets, bitmap_len, get_bit, get_fp, malformed, put_fp, set_bit},
};

/// 32-bit fingerprints, bitmap encoding.
/// 32 位指纹，位图编码
#[derive(Debug, Clone, Copy, Default)]
pub struct Mobile;

impl Variant for Mobile {
  const KIND: Kind = Kind::Mobile;
  const FP_BYTES: usize = 4;
  const LOAD_FACTOR: f64 = 0.955;
  const BODY_PACKETS: usize = 2;

  fn encode(layout: &Layout, buckets: &[Bucket], out: &mut Packets) {
    let fp_bytes = layout.fp_bytes();
    let mut bitmap = vec![0; bitmap_len(buckets.len() * ENTRIES_PER_BUCKET)];
    let mut payload = Vec::new();
    for (i, bucket) in buckets.iter().enumerate() {
      let base = i * ENTRIES_PER_BUCKET;
      for (j, &fp) in bucket.as_slice().iter().enumerate() {
        set_bit(&mut bitmap, base + j);
        put_fp(&mut payload, fp, fp_bytes);
      }
    }
    out.push(bitmap);
    out.push(payload);
  }

  fn decode(layout: &Layout, body: &[Vec<u8>]) -> Result<Vec<Bucket>> {
    let [bitmap, payload] = body else {
      return Err(malformed(format!("mobile body packets {} != 2", body.len())));
    };
    let fp_bytes = layout.fp_bytes();
    let slots = layout.bucket_num() * ENTRIES_PER_BUCKET;
    if bitmap.len() != bitmap_len(slots) {
      return Err(malformed(format!(
        "bitmap len {} != {}",
        bitmap.len(),
        bitmap_len(slots)
      )));
    }
    let count: usize = bitmap.iter().map(|b| b.count_ones() as usize).sum();
    if payload.len() != count * fp_bytes {
      return Err(malformed(format!(
        "payload len {} != {count} * {fp_bytes}",
        payload.len()
      )));
    }

    let mut buckets = vec![Bucket::default(); layout.bucket_num()];
    let mut fps = payload.chunks_exact(fp_bytes).map(get_fp);
    for slot in (0..slots).filter(|&i| get_bit(bitmap, i)) {
      // Length check above guarantees one fingerprint per set bit
      // 上面的长度校验保证每个置位都有一个指纹
      let fp = fps.next().unwrap_or(0);
      if fp == 0 {
        return Err(malformed(format!("zero fingerprint at slot {slot}")));
      }
      let ok = buckets[slot / ENTRIES_PER_BUCKET].try_insert(fp);
      debug_assert!(ok);
    }
    Ok(buckets)
  }
}

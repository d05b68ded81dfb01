//! Naive variant: every slot on the wire, empty slots as zero.
//! 朴素变体：所有槽位都写出，空槽位为零

use super::{Kind, Variant};
use crate::{
  Bucket, ENTRIES_PER_BUCKET,
  error::Result,
  layout::Layout,
  wire::{Packets, get_fp, malformed, put_fp},
};

/// 48-bit fingerprints, fixed-size encoding.
/// 48 位指纹，定长编码
#[derive(Debug, Clone, Copy, Default)]
pub struct Naive;

impl Variant for Naive {
  const KIND: Kind = Kind::Naive;
  const FP_BYTES: usize = 6;
  const LOAD_FACTOR: f64 = 0.955;
  const BODY_PACKETS: usize = 1;

  fn encode(layout: &Layout, buckets: &[Bucket], out: &mut Packets) {
    let fp_bytes = layout.fp_bytes();
    let mut data = Vec::with_capacity(buckets.len() * ENTRIES_PER_BUCKET * fp_bytes);
    for bucket in buckets {
      for &fp in bucket.slots() {
        put_fp(&mut data, fp, fp_bytes);
      }
    }
    out.push(data);
  }

  fn decode(layout: &Layout, body: &[Vec<u8>]) -> Result<Vec<Bucket>> {
    let [data] = body else {
      return Err(malformed(format!("naive body packets {} != 1", body.len())));
    };
    let fp_bytes = layout.fp_bytes();
    let expect = layout.bucket_num() * ENTRIES_PER_BUCKET * fp_bytes;
    if data.len() != expect {
      return Err(malformed(format!("slot array len {} != {expect}", data.len())));
    }

    let mut buckets = vec![Bucket::default(); layout.bucket_num()];
    for (slot, chunk) in data.chunks_exact(fp_bytes).enumerate() {
      let fp = get_fp(chunk);
      if fp != 0 {
        // At most ENTRIES_PER_BUCKET chunks map to one bucket
        // 每个桶最多对应 ENTRIES_PER_BUCKET 个块
        let ok = buckets[slot / ENTRIES_PER_BUCKET].try_insert(fp);
        debug_assert!(ok);
      }
    }
    Ok(buckets)
  }
}

//! 64-bit mixing hash.
//! 64 位混合哈希

/// Domain separation for the bucket hash.
/// 桶哈希的域分离常量
pub const K1: u64 = 0x9e37_79b9_7f4a_7c15;

/// Domain separation for the fingerprint hash.
/// 指纹哈希的域分离常量
pub const K2: u64 = 0xc2b2_ae3d_27d4_eb4f;

/// MurmurHash3 fmix64 finalizer, full avalanche over 64 bits.
/// MurmurHash3 fmix64 终结函数，64 位完全雪崩
#[inline(always)]
pub const fn mix(k: u64) -> u64 {
  let mut h = k;
  h ^= h >> 33;
  h = h.wrapping_mul(0xff51_afd7_ed55_8ccd);
  h ^= h >> 33;
  h = h.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
  h ^= h >> 33;
  h
}

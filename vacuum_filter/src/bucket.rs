//! Fixed-capacity fingerprint bucket.
//! 固定容量指纹桶

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

/// Slots per bucket.
/// 每桶槽位数
pub const ENTRIES_PER_BUCKET: usize = 4;

/// Inline bucket of up to 4 non-zero fingerprints.
/// 最多容纳 4 个非零指纹的内联桶
///
/// Occupied slots are kept packed at the front, so `slots[len..]` is zero.
/// 已占用槽位紧凑存放在前部，`slots[len..]` 恒为零
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub struct Bucket {
  slots: [u64; ENTRIES_PER_BUCKET],
  len: u8,
}

impl Bucket {
  /// Returns occupied slot count.
  /// 返回已占用槽位数
  #[inline]
  pub fn len(&self) -> usize {
    self.len as usize
  }

  /// Returns true if no slot is occupied.
  /// 无已占用槽位时返回 true
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  /// Returns true if all slots are occupied.
  /// 所有槽位已占用时返回 true
  #[inline]
  pub fn is_full(&self) -> bool {
    self.len() == ENTRIES_PER_BUCKET
  }

  /// Occupied fingerprints.
  /// 已占用的指纹
  #[inline]
  pub fn as_slice(&self) -> &[u64] {
    &self.slots[..self.len()]
  }

  /// Raw slots including empty (zero) ones.
  /// 原始槽位，含空（零）槽位
  #[inline]
  pub fn slots(&self) -> &[u64; ENTRIES_PER_BUCKET] {
    &self.slots
  }

  /// Check if bucket holds fingerprint.
  /// 检查桶是否包含指纹
  #[inline]
  pub fn contains(&self, fp: u64) -> bool {
    debug_assert_ne!(fp, 0);
    // Empty slots are zero and never match
    // 空槽位为零，永不匹配
    (self.slots[0] == fp) | (self.slots[1] == fp) | (self.slots[2] == fp) | (self.slots[3] == fp)
  }

  /// Append fingerprint if a slot is free.
  /// 有空槽位时追加指纹
  #[inline]
  pub fn try_insert(&mut self, fp: u64) -> bool {
    debug_assert_ne!(fp, 0);
    if self.is_full() {
      return false;
    }
    self.slots[self.len()] = fp;
    self.len += 1;
    true
  }

  /// Remove one matching fingerprint.
  /// 移除一个匹配的指纹
  #[inline]
  pub fn remove(&mut self, fp: u64) -> bool {
    debug_assert_ne!(fp, 0);
    match self.as_slice().iter().position(|&x| x == fp) {
      Some(i) => {
        let last = self.len() - 1;
        self.slots[i] = self.slots[last];
        self.slots[last] = 0;
        self.len -= 1;
        true
      }
      None => false,
    }
  }

  /// Replace occupied slot `i`, returning the old fingerprint.
  /// 替换已占用槽位 `i`，返回旧指纹
  #[inline]
  pub fn replace(&mut self, i: usize, fp: u64) -> u64 {
    debug_assert!(i < self.len());
    debug_assert_ne!(fp, 0);
    std::mem::replace(&mut self.slots[i], fp)
  }
}

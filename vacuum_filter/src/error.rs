//! Error types / 错误类型

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
  /// Filter holds `max_size` items / 过滤器已满
  #[error("filter full: max_size {max_size}")]
  Full { max_size: usize },

  /// Item already tests positive / 元素已存在
  #[error("duplicate item")]
  Duplicate,

  /// Eviction walk exceeded the kick bound; buckets in `touched` were modified
  /// 驱逐次数超限；`touched` 中的桶已被修改
  #[error("insertion exhausted after touching {} buckets", .touched.len())]
  Exhausted { touched: Vec<usize> },

  /// Fingerprint in neither candidate bucket / 两个候选桶都不含指纹
  #[error("item not found")]
  NotFound,

  /// Fingerprint in both candidate buckets / 两个候选桶都含指纹
  #[error("fingerprint in both buckets {bucket1} and {bucket2}")]
  Ambiguous { bucket1: usize, bucket2: usize },

  /// max_size is zero or exceeds the 32-bit wire header / 容量为零或超出 32 位头部
  #[error("invalid max_size: {0}")]
  InvalidMaxSize(usize),

  /// Bad wire data / 无效的序列化数据
  #[error("malformed: {0}")]
  Malformed(String),
}

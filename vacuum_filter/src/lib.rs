//! [Vacuum Filter][vacuum filter]: a cuckoo filter whose two candidate buckets
//! share a small aligned chunk, for better locality at high load.
//! 真空过滤器：两个候选桶位于同一小型对齐块内的布谷鸟过滤器，高负载下局部性更好
//!
//! # Examples
//!
//! ```
//! use vacuum_filter::{Filter, Kind, factory};
//!
//! let mut filter = factory::create_filter(Kind::Mobile, 1000).unwrap();
//! filter.insert(1).unwrap();
//! filter.insert(2).unwrap();
//!
//! let packets = filter.save();
//! let loaded = factory::load(&packets).unwrap();
//! assert!(loaded.contains(1));
//! assert!(loaded.contains(2));
//! assert_eq!(loaded.size(), 2);
//! ```
//!
//! # References
//!
//! - [Vacuum Filters: More Space-Efficient and Faster Replacement for Bloom and Cuckoo Filters][vacuum filter]
//! - [Cuckoo Filter: Practically Better Than Bloom][cuckoo filter]
//!
//! [vacuum filter]: https://www.vldb.org/pvldb/vol13/p197-wang.pdf
//! [cuckoo filter]: https://www.cs.cmu.edu/~dga/papers/cuckoo-conext2014.pdf
#![cfg_attr(docsrs, feature(doc_cfg))]

mod bucket;
mod conf;
pub mod error;
pub mod factory;
mod filter;
pub mod hash;
mod layout;
mod oracle;
pub mod param;
mod variant;
pub mod wire;

pub use bucket::{Bucket, ENTRIES_PER_BUCKET};
pub use conf::{Conf, MAX_NUM_KICKS};
pub use error::{Error, Result};
pub use factory::Filter;
pub use filter::VacuumFilter;
pub use layout::{LARGE_FILTER, Layout, Pos};
pub use oracle::PositionOracle;
pub use variant::{Kind, Mobile, Naive, Variant};

/// 48-bit fingerprints, flat slot encoding.
/// 48 位指纹，扁平槽位编码
pub type NaiveVacuumFilter = VacuumFilter<Naive>;

/// 32-bit fingerprints, bitmap encoding.
/// 32 位指纹，位图编码
pub type MobileVacuumFilter = VacuumFilter<Mobile>;

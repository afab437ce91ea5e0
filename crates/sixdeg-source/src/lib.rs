//! Sixdeg Source - Entity sources for the connection engine
//!
//! This crate provides a dataset format and an in-memory
//! [`EntitySource`](sixdeg_core::EntitySource) backed by it.

pub mod dataset;
pub mod detail;
pub mod error;
pub mod memory;

pub use dataset::{Dataset, EntityRecord, GroupRecord, LocationRecord};
pub use detail::{GroupDetail, LocationDetail, NamePage};
pub use error::{DatasetError, DatasetResult};
pub use memory::MemorySource;

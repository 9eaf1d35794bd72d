//! # iesgo-shared
//!
//! Domain types and pure logic shared by the IESGO Connect crates: the data
//! model, the seed catalog, the discovery filters and the compatibility
//! badge.

pub mod catalog;
pub mod compat;
pub mod constants;
pub mod error;
pub mod filter;
pub mod types;
pub mod validation;

pub use catalog::Catalog;
pub use error::ValidationError;
pub use filter::Filters;

//! HTTP handlers for the catalog and resource rows.

pub mod resource;
pub use resource::*;

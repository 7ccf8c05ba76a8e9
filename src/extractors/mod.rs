//! Request extractors.

pub mod resource;
pub use resource::ResourcePath;

//! Route table for the resource API.

mod resource;
pub use resource::{resource_routes, router};

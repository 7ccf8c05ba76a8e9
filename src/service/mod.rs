//! ResourceService: schema-agnostic row access using the safe SQL builder.

mod resource;
pub use resource::ResourceService;

//! Safe SQL building: validated identifiers in the text, everything else as parameters.

mod builder;
pub mod ident;
pub mod params;
pub use builder::*;
pub use ident::*;
pub use params::*;

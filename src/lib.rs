//! Grotto: every PostgreSQL table as a generic REST resource.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod marshal;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;

pub use error::{Access, AppError, ErrorBody, Severity};
pub use response::{success_ok, Envelope, TableSummary};
pub use routes::{resource_routes, router};
pub use service::ResourceService;
pub use sql::{Identifier, RowId};
pub use state::AppState;

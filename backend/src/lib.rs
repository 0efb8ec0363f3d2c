//! Blood-pressure measurement service library.
//!
//! Layout follows a hexagonal split: [`domain`] holds validation,
//! aggregation and the ports; [`inbound`] adapts HTTP requests onto the
//! driving ports; [`outbound`] implements the storage port in memory and on
//! PostgreSQL.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;

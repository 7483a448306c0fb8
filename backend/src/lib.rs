//! Backend library for the referral rewards service.
//!
//! Layout follows a hexagonal shape: `domain` holds entities, services, and
//! ports; `inbound` adapts HTTP requests onto driving ports; `outbound`
//! implements driven ports against PostgreSQL via Diesel.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Tracing middleware attaching a request-scoped trace identifier.
pub use middleware::trace::Trace;

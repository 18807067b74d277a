//! `congrego-api`: HTTP surface and guard-chain wiring.
//!
//! Every administrative request passes Authentication → Role → Tenant
//! Boundary, in that order, before any business logic runs. Authentication
//! is an axum middleware layer; the role and tenant stages are enforced per
//! operation against static guard declarations.

pub mod app;
pub mod guard;
pub mod middleware;

//! HTTP transport layer
//!
//! Routes the `/api/brandfetch` proxy endpoint and the health check.

pub mod handlers;

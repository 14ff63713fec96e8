//! HTTP server: routes, docs, landing page and rate limiting

pub mod api;
pub mod docs;
pub mod pages;
pub mod rate_limit;

//! HTTP layer for chatrelay.
//!
//! Adapts axum requests into gateway events for the chat handler and
//! renders gateway responses back out.

pub mod handlers;
pub mod response;
pub mod router;

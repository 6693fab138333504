//! The chat request pipeline.
//!
//! `handler` orchestrates one request end to end; `validate` and `response`
//! are the pure edges on either side of it.

pub mod handler;
pub mod response;
pub mod validate;

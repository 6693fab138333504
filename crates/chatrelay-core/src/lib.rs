//! Request handling and port trait definitions for chatrelay.
//!
//! This crate defines the "ports" (store, provider, and secret traits) that
//! the infrastructure layer implements, plus the chat request pipeline built
//! on top of them. It depends only on `chatrelay-types` -- never on
//! `chatrelay-infra` or any database/IO crate.

pub mod chat;
pub mod llm;
pub mod repository;
pub mod service;

#[cfg(test)]
mod testing;

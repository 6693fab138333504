//! Cryptographic primitives for secrets at rest.

pub mod vault;

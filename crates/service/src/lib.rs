//! Service layer providing the business operations of the registry.
//! - Separates business logic from data access (repository traits with a
//!   sea-orm implementation and an in-memory mock each).
//! - Reuses validation and entity definitions in `models` crate.
//! - Owns password hashing, token signing and the authorization gate.

pub mod errors;
pub mod auth;
pub mod company;
pub mod origin;
#[cfg(test)]
pub mod test_support;

//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Password hashing and token signing live beside the service so the HTTP
//! layer only ever talks to `AuthService`.

pub mod domain;
pub mod errors;
pub mod hasher;
pub mod token;
pub mod repository;
pub mod service;
pub mod repo;

pub use hasher::CredentialHasher;
pub use service::AuthService;
pub use token::TokenManager;

//! Company module: companies and the countries they reference.

pub mod domain;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::CompanyService;

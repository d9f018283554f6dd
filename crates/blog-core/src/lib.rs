//! # Blog Core
//!
//! The domain layer of the blog API.
//! This crate contains entities, store ports, query shaping, validation and the
//! resource assembler, with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod query;
pub mod resource;
pub mod services;
pub mod validation;

pub use error::{DomainError, RepoError};

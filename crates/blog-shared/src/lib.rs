//! # Blog Shared
//!
//! Wire types shared by the server and its clients: request parameters,
//! submission results and the error body.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;

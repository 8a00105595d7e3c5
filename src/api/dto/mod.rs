//! Data Transfer Objects for REST request/response serialization.
//!
//! Request bodies use the same camelCase naming as the banner wire
//! shape. Banner types arrive as strings and are parsed in the handlers
//! so an unknown type is a 400 with a structured error body.

pub mod banner_dto;
pub mod common_dto;
pub mod home_banner_dto;

pub use banner_dto::*;
pub use common_dto::*;
pub use home_banner_dto::*;

//! Shared building blocks for the pet-listings Lambda functions.
//!
//! Each Lambda crate under `lambda/` stays a thin HTTP handler; everything
//! with any behavior worth testing lives here: the record model, the
//! filter/update expression builders, the record store behind the `PetStore`
//! trait, and the S3 upload-URL issuer.

pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod request;
pub mod response;
pub mod store;
pub mod update;
pub mod upload;

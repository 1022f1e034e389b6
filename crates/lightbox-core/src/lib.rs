//! Core types and trait definitions for the Lightbox photo service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod error;
pub mod event;
pub mod files;
pub mod gateway;
pub mod geometry;
pub mod photo;
pub mod store;
pub mod user;
pub mod view;

pub use error::{Error, Result};

//! Custom extractors for Axum handlers.
//!
//! These normalize rejections into the shared [`ErrorResponse`](crate::ErrorResponse)
//! shape so handlers never see raw axum rejections.

pub mod id_path;
pub mod json_body;

pub use id_path::IdPath;
pub use json_body::JsonBody;

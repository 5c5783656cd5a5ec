//! Quill API - remote post API client
//!
//! Wire types and HTTP client for the backend the editor publishes to. The
//! backend itself is an external collaborator; this crate only consumes its
//! JSON envelope contract.

pub mod client;
pub mod types;

pub use client::{ApiError, HttpPostApi, PostApi};
pub use types::{parse_datetime_millis, ApiResponse, PostAddRequest, PostUpdateRequest, PostVo};

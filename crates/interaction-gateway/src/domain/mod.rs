//! # Domain Layer
//!
//! Pure request-handling logic with no I/O dependencies: verification,
//! classification, the dispatch decision and response rendering.

pub mod config;
pub mod dispatch;
pub mod entities;
pub mod errors;
pub mod interaction;
pub mod response;
pub mod signature;

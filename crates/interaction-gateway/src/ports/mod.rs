//! # Ports Layer
//!
//! Trait definitions for the hexagonal architecture.
//! - **Inbound (Driving)**: API the HTTP surface calls
//! - **Outbound (Driven)**: worker submission and observability

pub mod inbound;
pub mod outbound;

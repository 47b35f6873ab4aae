//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repositories, aggregation and persistence into session-level
//!   APIs.
//! - Keep rendering layers decoupled from storage details.

pub mod session_service;

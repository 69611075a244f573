//! Shared domain types for Parley.
//!
//! This crate contains the core domain types used across the Parley support
//! assistant: chat sessions and messages, the menu catalog, FAQ entries,
//! generation requests, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, indexmap,
//! thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod faq;
pub mod generation;
pub mod menu;

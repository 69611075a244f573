//! Business logic and port trait definitions for Parley.
//!
//! This crate defines the "ports" (store, generator, FAQ source traits) that
//! the infrastructure layer implements, plus the components built on them:
//! the menu tree navigator, FAQ tracker, grounding prompt builder, resilient
//! generation wrapper, fallback chat store, and the per-turn dialogue engine.
//! It depends only on `parley-types` -- never on `parley-infra` or any IO
//! crate.

pub mod chat;
pub mod engine;
pub mod faq;
pub mod generation;
pub mod menu;
pub mod prompt;

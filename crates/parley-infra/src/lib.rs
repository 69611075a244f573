//! Infrastructure layer for Parley.
//!
//! Contains implementations of the port traits defined in `parley-core`:
//! the REST document-store client, the Gemini generation client, the
//! filesystem data catalog, and configuration loading.

pub mod catalog;
pub mod config;
pub mod llm;
pub mod store;

//! Request handlers.

pub mod contact;
pub mod turn;

//! # Users Module
//!
//! Local user records provisioned on first OIDC login, plus the post
//! schema those users own.

pub mod models;
pub mod store;

#[cfg(test)]
mod tests;

pub use models::{Post, User};

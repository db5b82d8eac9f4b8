//! # Pages Module
//!
//! The single landing page and its flash-message rendering.

pub mod handlers;
pub mod routes;


pub use routes::pages_routes;

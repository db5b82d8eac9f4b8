//! # Auth Module
//!
//! This module handles all authentication-related functionality including:
//! - The OIDC authorization-code flow (`/login`, `/callback`, `/logout`)
//! - Signed session, flow, and flash cookies
//! - CurrentUser extractor for handlers that read the session

pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod session;


pub use extractors::CurrentUser;
pub use routes::auth_routes;

// Services module - external integrations

pub mod oidc;

pub use oidc::{IdentityClaims, OidcError, OidcService};

//! Authentication and authorization
//!
//! - [`JwtService`] - token validation
//! - [`CurrentUser`] - principal extracted from the bearer token
//! - [`policy`] - role and ownership rules for order operations

pub mod extractor;
pub mod jwt;
pub mod policy;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};

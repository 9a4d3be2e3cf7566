//! Bearer credential issuance and verification.
//!
//! A request carries `Authorization: <scheme> <token>`; [`parse_authorization`]
//! splits the header, [`TokenService`] verifies the HS256 token and the
//! resulting [`RequestContext`] is what the rest of the request sees.

pub mod claims;
pub mod context;
pub mod error;
pub mod header;
pub mod token;

pub use claims::Claims;
pub use context::RequestContext;
pub use error::{AuthError, Result};
pub use header::parse_authorization;
pub use token::TokenService;

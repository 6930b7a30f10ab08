//! Bearer-token authentication

pub mod authenticator;

pub use authenticator::{AccessTokenProvider, Authenticator, TOKEN_EXPIRY_BUFFER};

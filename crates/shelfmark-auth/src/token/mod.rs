//! Access token signing and the refresh token lifecycle.

pub mod claims;
pub mod decoder;
pub mod encoder;
pub mod lifecycle;

pub use claims::AccessClaims;
pub use decoder::AccessTokenDecoder;
pub use encoder::AccessTokenEncoder;
pub use lifecycle::{TokenLifecycle, TokenPair};

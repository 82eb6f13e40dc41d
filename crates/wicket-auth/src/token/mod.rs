//! Token signing, verification, and issuance.

pub mod issuer;
pub mod jwt;

pub use issuer::{IssuedToken, TokenIssuer, TokenPair};
pub use jwt::{Claims, JwtError, JwtSigner, TokenKind};

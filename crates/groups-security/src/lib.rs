//! # Groups Security
//! 
//! Bearer token handling for authenticated actors.

pub mod jwt;

pub use jwt::{Claims, JwtError, JwtService};

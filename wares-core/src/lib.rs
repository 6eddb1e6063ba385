//! Shared foundation for the wares client and server.
//!
//! Everything that crosses the HTTP boundary lives in [`types`] so the
//! server handlers and the CLI client agree on the wire shapes, and both
//! binaries initialize logging through [`logging`].

pub mod logging;
pub mod types;

// Re-export main types
pub use logging::init_logging;
pub use types::{
    AuthResponse, CreateProductRequest, ErrorBody, LoginRequest, Product, SignupRequest, UserInfo,
};

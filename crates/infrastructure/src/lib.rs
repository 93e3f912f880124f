//! Cove Infrastructure - adapters
//!
//! Concrete implementations behind the application ports: the
//! reqwest-backed HTTP client and the per-language snippet generators.

pub mod adapters;
pub mod codegen;

pub use adapters::ReqwestHttpClient;
pub use codegen::generate_code;

// CPF Auth - Core Library
// Exposes all modules for use in the CLI, the API server, and tests

pub mod config;
pub mod db;
pub mod pipeline;
pub mod token;
pub mod validator;

// Re-export commonly used types
pub use config::Config;
pub use db::{customer_count, customer_exists, insert_customer, setup_database, SqliteLookup};
pub use pipeline::{Pipeline, PipelineOutcome, RegistrationLookup};
pub use token::{Claims, SigningKey, TokenIssuer, ISSUER, TOKEN_TTL_SECS};
pub use validator::{validate, ValidationResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

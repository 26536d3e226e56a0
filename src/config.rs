// ⚙️ Configuration - environment-derived process settings

use anyhow::Result;
use std::env;
use std::path::PathBuf;

use crate::token::SigningKey;

/// Default customer store location
pub const DEFAULT_DB_PATH: &str = "cpf-auth.db";

/// Default HTTP bind address
pub const DEFAULT_ADDR: &str = "0.0.0.0:3000";

/// Process configuration, read once at startup.
///
/// - `CPF_AUTH_DB`: path to the SQLite customer store
/// - `CPF_AUTH_SIGNING_KEY`: optional 64-char hex key; generated when absent
/// - `CPF_AUTH_ADDR`: HTTP bind address (server binary only)
#[derive(Debug)]
pub struct Config {
    pub db_path: PathBuf,
    pub signing_key: SigningKey,
    pub addr: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let db_path = env::var("CPF_AUTH_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DB_PATH));

        let signing_key = match env::var("CPF_AUTH_SIGNING_KEY") {
            Ok(encoded) => SigningKey::from_hex(&encoded)?,
            Err(_) => SigningKey::generate()?,
        };

        let addr = env::var("CPF_AUTH_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());

        Ok(Config {
            db_path,
            signing_key,
            addr,
        })
    }
}

// 🔁 Request Pipeline - Validator → Lookup → Issuer
// One linear pass per request, exactly one terminal outcome

use anyhow::Result;

use crate::token::TokenIssuer;
use crate::validator::{validate, ValidationResult};

// ============================================================================
// LOOKUP CAPABILITY
// ============================================================================

/// The single capability the pipeline needs from the customer store.
///
/// `Err` is the transient collaborator failure signal; the pipeline converts
/// it to InternalError and never retries.
pub trait RegistrationLookup {
    fn exists(&self, cpf: &str) -> Result<bool>;
}

// ============================================================================
// PIPELINE OUTCOME
// ============================================================================

/// Terminal state of one pipeline run.
#[derive(Debug)]
pub enum PipelineOutcome {
    /// Token issued; carries the identifier and registration flag so the
    /// boundary can surface them alongside the token
    Success {
        cpf: String,
        registered: bool,
        token: String,
    },

    /// Caller-correctable rejection (missing field, malformed identifier)
    BadInput(&'static str),

    /// Collaborator or signing failure. The message is the internal cause,
    /// for diagnostics only; the boundary surfaces a generic error instead
    InternalError(String),
}

// ============================================================================
// PIPELINE
// ============================================================================

/// Sequences validation, registration lookup and token issuance.
///
/// Stateless across calls: the only shared state is the issuer's immutable
/// signing key and whatever the lookup implementation owns.
pub struct Pipeline {
    lookup: Box<dyn RegistrationLookup + Send + Sync>,
    issuer: TokenIssuer,
}

impl Pipeline {
    pub fn new(lookup: Box<dyn RegistrationLookup + Send + Sync>, issuer: TokenIssuer) -> Self {
        Pipeline { lookup, issuer }
    }

    /// Run one request through the pipeline.
    ///
    /// Linear, no backtracking: presence check, structural validation,
    /// registration lookup, issuance. The lookup is only consulted for a
    /// structurally valid CPF, and the issuer only runs after a successful
    /// lookup.
    pub fn process(&self, raw_cpf: Option<&str>) -> PipelineOutcome {
        // 1. Input presence
        let cpf = match raw_cpf {
            Some(c) if !c.is_empty() => c,
            _ => return PipelineOutcome::BadInput("cpf field is required"),
        };

        // 2. Structural validation
        if validate(cpf) == ValidationResult::Malformed {
            return PipelineOutcome::BadInput("invalid cpf");
        }

        // 3. Registration lookup
        let registered = match self.lookup.exists(cpf) {
            Ok(found) => found,
            Err(e) => return PipelineOutcome::InternalError(format!("lookup failed: {:#}", e)),
        };

        // 4. Issuance
        match self.issuer.issue(cpf, registered) {
            Ok(token) => PipelineOutcome::Success {
                cpf: cpf.to_string(),
                registered,
                token,
            },
            Err(e) => PipelineOutcome::InternalError(format!("token issuance failed: {:#}", e)),
        }
    }
}

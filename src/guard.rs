//! # Injection Guard
//!
//! Screens write payloads for script markup before they reach the store.
//!
//! The shipped screen is a substring heuristic. It is input hygiene, not a
//! security control: obfuscated markup slips through, and legitimate text
//! that happens to contain `<script` is refused. Swap in a real sanitizer by
//! implementing [`ContentScreen`].

use serde_json::Value;
use thiserror::Error;

/// Query parameter that lets a trusted caller skip screening
pub const BYPASS_PARAM: &str = "script";

/// Payload refused by a content screen
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn script_tags() -> Self {
        Self("Script tags are not allowed.".to_string())
    }
}

/// Content screen trait
pub trait ContentScreen: Send + Sync {
    /// Check a parsed payload for executable markup
    fn contains_script_markup(&self, json: &Value) -> bool;

    /// Screen a payload according to the request's screening mode
    fn screen(&self, json: &Value, screening: Screening) -> Result<(), ValidationError> {
        if screening == Screening::Enforce && self.contains_script_markup(json) {
            return Err(ValidationError::script_tags());
        }
        Ok(())
    }
}

/// Looks for `<script` anywhere in the serialized payload, ignoring case
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptTagScreen;

impl ContentScreen for ScriptTagScreen {
    fn contains_script_markup(&self, json: &Value) -> bool {
        json.to_string().to_lowercase().contains("<script")
    }
}

/// Whether a write request is screened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screening {
    Enforce,
    Bypass,
}

impl Screening {
    /// Decide from the request's `script` parameter.
    ///
    /// Only the exact value `1` bypasses, and only when the deployment
    /// allows it.
    pub fn from_param(script: Option<&str>, allow_bypass: bool) -> Self {
        match script {
            Some("1") if allow_bypass => Screening::Bypass,
            _ => Screening::Enforce,
        }
    }
}

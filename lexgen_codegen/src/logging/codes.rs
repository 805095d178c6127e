//! Consolidated error codes and classification system
//!
//! Single source of truth for all error codes, their metadata, and
//! classification functions.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for an error code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub description: &'static str,
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// IR document error codes
pub mod ir {
    use super::Code;

    pub const PARSE_FAILED: Code = Code::new("E005");
    pub const VALIDATION_FAILED: Code = Code::new("E006");
}

/// Renderer error codes
pub mod render {
    use super::Code;

    pub const UNKNOWN_PLACEHOLDER: Code = Code::new("E020");
    pub const INVALID_OPTIONS: Code = Code::new("E021");
    pub const RESERVED_IDENTIFIER: Code = Code::new("E022");
    pub const MODES_UNSUPPORTED: Code = Code::new("E023");
    pub const UNIT_TOO_LARGE: Code = Code::new("E024");
}

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I001");
    pub const IR_VALIDATED: Code = Code::new("I005");
    pub const UNIT_RENDERED: Code = Code::new("I006");
    pub const GENERATION_COMPLETE: Code = Code::new("I007");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

fn metadata() -> &'static HashMap<&'static str, ErrorMetadata> {
    static METADATA: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();
    METADATA.get_or_init(|| {
        let entries = [
            ErrorMetadata {
                code: "ERR001",
                category: "System",
                severity: Severity::Critical,
                recoverable: false,
                description: "Internal error",
            },
            ErrorMetadata {
                code: "ERR002",
                category: "System",
                severity: Severity::Critical,
                recoverable: false,
                description: "Logging initialization failed",
            },
            ErrorMetadata {
                code: "E005",
                category: "Ir",
                severity: Severity::High,
                recoverable: true,
                description: "IR document could not be parsed",
            },
            ErrorMetadata {
                code: "E006",
                category: "Ir",
                severity: Severity::High,
                recoverable: true,
                description: "IR document failed validation",
            },
            ErrorMetadata {
                code: "E020",
                category: "Render",
                severity: Severity::High,
                recoverable: false,
                description: "Template placeholder has no binding",
            },
            ErrorMetadata {
                code: "E021",
                category: "Render",
                severity: Severity::Medium,
                recoverable: true,
                description: "Renderer options are invalid",
            },
            ErrorMetadata {
                code: "E022",
                category: "Render",
                severity: Severity::Medium,
                recoverable: true,
                description: "Identifier collides with a reserved keyword",
            },
            ErrorMetadata {
                code: "E023",
                category: "Render",
                severity: Severity::Medium,
                recoverable: true,
                description: "Backend does not support multiple modes",
            },
            ErrorMetadata {
                code: "E024",
                category: "Render",
                severity: Severity::High,
                recoverable: false,
                description: "Rendered unit exceeds the size bound",
            },
        ];
        entries
            .into_iter()
            .map(|entry| (entry.code, entry))
            .collect()
    })
}

pub fn get_severity(code: &str) -> Severity {
    metadata()
        .get(code)
        .map(|m| m.severity)
        .unwrap_or(Severity::Medium)
}

pub fn get_category(code: &str) -> &'static str {
    metadata().get(code).map(|m| m.category).unwrap_or("Unknown")
}

pub fn get_description(code: &str) -> &'static str {
    metadata()
        .get(code)
        .map(|m| m.description)
        .unwrap_or("Unknown error")
}

pub fn is_recoverable(code: &str) -> bool {
    metadata().get(code).map(|m| m.recoverable).unwrap_or(false)
}

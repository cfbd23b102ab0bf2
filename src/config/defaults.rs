//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#true() -> bool {
    true
}

pub fn r#false() -> bool {
    false
}

// ============================================================================
// [base] Section Defaults
// ============================================================================

pub mod base {
    pub fn url() -> Option<String> {
        None
    }
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use std::path::PathBuf;

    pub fn root() -> Option<PathBuf> {
        None
    }

    pub fn output() -> PathBuf {
        "public".into()
    }

    pub fn ui() -> PathBuf {
        "ui".into()
    }

    pub fn landing_page() -> String {
        "index.adoc".into()
    }

    pub mod asciidoc {
        pub fn command() -> Vec<String> {
            vec!["asciidoctor".into()]
        }
    }

    pub mod redirects {
        use super::super::super::RedirectFacility;

        pub fn facility() -> RedirectFacility {
            RedirectFacility::default()
        }
    }
}

// ============================================================================
// [blog] Section Defaults
// ============================================================================

pub mod blog {
    pub fn component() -> String {
        "blog".into()
    }

    pub fn version() -> String {
        "1.0".into()
    }

    pub fn module() -> String {
        "ROOT".into()
    }

    pub fn title() -> String {
        "Blog".into()
    }
}

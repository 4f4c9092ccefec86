// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Document parsing entry point

use crate::document::Document;
use crate::validate::{validate_document, ValidationError};
use thiserror::Error;

/// Errors that can occur while turning text into a validated document.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Not well-formed JSON, or a step shape matched no variant
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Parse and validate a configuration document from JSON text.
pub fn parse_document(content: &str) -> Result<Document, ParseError> {
    // 1. Serde does the heavy lifting (step discrimination included)
    let doc: Document = serde_json::from_str(content)?;

    // 2. Rule validation with path-qualified errors
    validate_document(&doc)?;

    Ok(doc)
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;

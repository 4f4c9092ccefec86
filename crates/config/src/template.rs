// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fact substitution in command strings
//!
//! Commands reference gathered facts as `{{fact_name}}` or `{{.fact_name}}`.
//! Referencing a fact that was not gathered is an error, never an empty
//! substitution: a command with a hole in it is more dangerous than a
//! refused one. There is no escaping mechanism; any brace pair that is not
//! a well-formed token is rejected.

use regex::Regex;
use sink_core::Facts;
use std::sync::LazyLock;
use thiserror::Error;

/// Token pattern: `{{name}}` or `{{.name}}`, optional inner whitespace.
// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*\.?([a-z_][a-z0-9_]*)\s*\}\}").expect("constant regex pattern is valid")
});

/// Template interpolation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("undefined fact '{name}'")]
    UndefinedFact { name: String },

    #[error("malformed template delimiters")]
    Malformed,
}

/// Substitute fact tokens into a command template.
pub fn interpolate(template: &str, facts: &Facts) -> Result<String, TemplateError> {
    // Syntax check first: with all well-formed tokens removed, any brace
    // delimiter left over is malformed. Checked against the template, not
    // the substituted output, so fact values may contain braces.
    let stripped = TOKEN_PATTERN.replace_all(template, "");
    if stripped.contains("{{") || stripped.contains("}}") {
        return Err(TemplateError::Malformed);
    }

    let mut missing: Option<String> = None;
    let result = TOKEN_PATTERN.replace_all(template, |caps: &regex::Captures| {
        let name = &caps[1];
        match facts.get(name) {
            Some(value) => value.to_string(),
            None => {
                if missing.is_none() {
                    missing = Some(name.to_string());
                }
                String::new()
            }
        }
    });

    match missing {
        Some(name) => Err(TemplateError::UndefinedFact { name }),
        None => Ok(result.into_owned()),
    }
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;

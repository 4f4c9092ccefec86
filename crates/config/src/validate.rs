// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Validation of decoded documents

use crate::document::{DistributionDef, Document, FactDef, FactType, PlatformDef};
use crate::step::Step;
use regex::Regex;
use sink_core::Os;
use std::sync::LazyLock;
use thiserror::Error;

// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static FACT_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z_][a-z0-9_]*$").expect("constant regex pattern is valid"));

#[allow(clippy::expect_used)]
static EXPORT_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z_][A-Z0-9_]*$").expect("constant regex pattern is valid"));

/// A document rule violation with a path-qualified location.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{location}: {message}")]
pub struct ValidationError {
    pub location: String,
    pub message: String,
}

impl ValidationError {
    fn new(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            message: message.into(),
        }
    }
}

/// Validate a decoded document. Rules compose; the first failure aborts.
pub fn validate_document(doc: &Document) -> Result<(), ValidationError> {
    // 1. Document-level requirements
    if doc.version.trim().is_empty() {
        return Err(ValidationError::new("document", "version is required"));
    }
    if doc.platforms.is_empty() {
        return Err(ValidationError::new(
            "document",
            "at least one platform is required",
        ));
    }

    // 2. Fact definitions
    for (name, fact) in &doc.facts {
        validate_fact(name, fact)?;
    }

    // 3. Platforms (and their distributions and steps)
    for (i, platform) in doc.platforms.iter().enumerate() {
        validate_platform(i, platform)?;
    }

    Ok(())
}

fn validate_fact(name: &str, fact: &FactDef) -> Result<(), ValidationError> {
    let location = format!("fact {}", name);

    if !FACT_NAME_PATTERN.is_match(name) {
        return Err(ValidationError::new(
            location,
            "fact name must match [a-z_][a-z0-9_]*",
        ));
    }
    if fact.command.trim().is_empty() {
        return Err(ValidationError::new(location, "command must not be empty"));
    }
    if let Some(export) = &fact.export {
        if !EXPORT_NAME_PATTERN.is_match(export) {
            return Err(ValidationError::new(
                location,
                format!("export '{}' must match [A-Z_][A-Z0-9_]*", export),
            ));
        }
    }
    for platform in &fact.platforms {
        if Os::parse(platform).is_none() {
            return Err(ValidationError::new(
                location,
                format!(
                    "unknown platform '{}'; valid platforms: darwin, linux, windows",
                    platform
                ),
            ));
        }
    }
    let transform_allowed = matches!(fact.fact_type, None | Some(FactType::String));
    if fact.transform.is_some() && !transform_allowed {
        return Err(ValidationError::new(
            location,
            "transform requires a string fact",
        ));
    }
    Ok(())
}

fn validate_platform(index: usize, platform: &PlatformDef) -> Result<(), ValidationError> {
    let location = if platform.name.is_empty() {
        format!("platform[{}]", index)
    } else {
        format!("platform[{}] {}", index, platform.name)
    };

    if platform.os.trim().is_empty() {
        return Err(ValidationError::new(location, "os is required"));
    }
    if Os::parse(&platform.os).is_none() {
        return Err(ValidationError::new(
            location,
            format!(
                "unknown os '{}'; valid values: darwin, linux, windows",
                platform.os
            ),
        ));
    }
    if platform.match_pattern.trim().is_empty() {
        return Err(ValidationError::new(location, "match is required"));
    }
    if platform.name.trim().is_empty() {
        return Err(ValidationError::new(location, "name is required"));
    }

    let has_steps = !platform.install_steps.is_empty();
    let has_distributions = !platform.distributions.is_empty();
    if has_steps && has_distributions {
        return Err(ValidationError::new(
            location,
            "install_steps and distributions are mutually exclusive",
        ));
    }
    if !has_steps && !has_distributions {
        return Err(ValidationError::new(
            location,
            "either install_steps or distributions is required",
        ));
    }
    if has_distributions && platform.os != "linux" {
        return Err(ValidationError::new(
            location,
            "distributions are only supported on linux",
        ));
    }

    for (j, step) in platform.install_steps.iter().enumerate() {
        validate_step(&format!("{}: step[{}]", location, j), step)?;
    }
    for (j, distribution) in platform.distributions.iter().enumerate() {
        validate_distribution(&location, j, distribution)?;
    }
    Ok(())
}

fn validate_distribution(
    platform_location: &str,
    index: usize,
    distribution: &DistributionDef,
) -> Result<(), ValidationError> {
    let location = if distribution.name.is_empty() {
        format!("{}: distribution[{}]", platform_location, index)
    } else {
        format!(
            "{}: distribution[{}] {}",
            platform_location, index, distribution.name
        )
    };

    if distribution.ids.is_empty() {
        return Err(ValidationError::new(
            location,
            "at least one distribution id is required",
        ));
    }
    if distribution.name.trim().is_empty() {
        return Err(ValidationError::new(location, "name is required"));
    }
    if distribution.install_steps.is_empty() {
        return Err(ValidationError::new(
            location,
            "at least one install step is required",
        ));
    }
    for (k, step) in distribution.install_steps.iter().enumerate() {
        validate_step(&format!("{}: step[{}]", location, k), step)?;
    }
    Ok(())
}

fn validate_step(location: &str, step: &Step) -> Result<(), ValidationError> {
    match step {
        Step::Command(s) => {
            if s.command.trim().is_empty() {
                return Err(ValidationError::new(location, "command must not be empty"));
            }
        }
        Step::CheckError(s) => {
            if s.check.trim().is_empty() {
                return Err(ValidationError::new(location, "check must not be empty"));
            }
            if s.error.trim().is_empty() {
                return Err(ValidationError::new(location, "error must not be empty"));
            }
        }
        Step::CheckRemediate(s) => {
            if s.check.trim().is_empty() {
                return Err(ValidationError::new(location, "check must not be empty"));
            }
            if s.on_missing.is_empty() {
                return Err(ValidationError::new(
                    location,
                    "at least one remediation step is required",
                ));
            }
            for (k, sub) in s.on_missing.iter().enumerate() {
                let sub_location = if sub.name.is_empty() {
                    format!("{}: on_missing[{}]", location, k)
                } else {
                    format!("{}: on_missing[{}] {}", location, k, sub.name)
                };
                if sub.name.trim().is_empty() {
                    return Err(ValidationError::new(sub_location, "name is required"));
                }
                if sub.command.trim().is_empty() {
                    return Err(ValidationError::new(
                        sub_location,
                        "command must not be empty",
                    ));
                }
            }
        }
        Step::ErrorOnly(s) => {
            if s.error.trim().is_empty() {
                return Err(ValidationError::new(location, "error must not be empty"));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;

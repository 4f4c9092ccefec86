// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fact gathering
//!
//! Facts run once per run, in declaration order, before any step. A
//! failing optional fact simply stays out of the mapping; a failing
//! required fact aborts the run before the first step executes.

use sink_config::{Document, FactDef, FactType};
use sink_core::{FactValue, Facts, Os};
use sink_shell::{run_with_deadline, Transport};
use std::sync::Arc;
use thiserror::Error;

/// A required fact could not be gathered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FactError {
    #[error("required fact '{name}' failed: {reason}")]
    Required { name: String, reason: String },
}

/// Gathers facts through the transport.
///
/// The OS identifier is captured at construction so tests can override
/// the platform filter's view of the host.
pub struct FactGatherer {
    transport: Arc<dyn Transport>,
    os: Os,
}

impl FactGatherer {
    pub fn new(transport: Arc<dyn Transport>, os: Os) -> Self {
        Self { transport, os }
    }

    /// Run every fact command and build the facts mapping.
    ///
    /// The mapping is seeded from the document's `defaults`; gathered
    /// values overwrite seeds of the same name.
    pub async fn gather(&self, doc: &Document) -> Result<Facts, FactError> {
        let mut facts = Facts::new();
        for (name, value) in &doc.defaults {
            facts.insert(name.clone(), FactValue::Str(value.clone()));
        }

        for (name, def) in &doc.facts {
            if !def.platforms.is_empty() && !def.platforms.iter().any(|p| p == self.os.as_str()) {
                tracing::debug!(fact = %name, os = %self.os, "skipped by platform filter");
                continue;
            }

            match self.gather_one(name, def).await? {
                Some(value) => {
                    if def.verbose {
                        eprintln!("[VERBOSE] fact {}={}", name, value);
                    }
                    facts.insert(name.clone(), value);
                }
                None => continue,
            }

            if let Some(sleep) = &def.sleep {
                tokio::time::sleep(sleep.duration()).await;
            }
        }
        Ok(facts)
    }

    /// Gather a single fact. `Ok(None)` means an optional fact failed and
    /// was dropped.
    async fn gather_one(&self, name: &str, def: &FactDef) -> Result<Option<FactValue>, FactError> {
        let out = match &def.timeout {
            Some(timeout) => {
                run_with_deadline(
                    self.transport.as_ref(),
                    &def.command,
                    timeout.interval.duration(),
                )
                .await
            }
            None => self.transport.run(&def.command).await,
        };

        if !out.ok() {
            return self.fail_or_skip(name, def, out.summary());
        }

        let mut value = out.stdout.trim().to_string();
        if let Some(transform) = &def.transform {
            match transform.get(&value) {
                Some(mapped) => value = mapped.clone(),
                None if def.strict => {
                    let reason = format!("value '{}' not present in transform map", value);
                    return self.fail_or_skip(name, def, reason);
                }
                None => {}
            }
        }

        match coerce(&value, def.fact_type) {
            Ok(fact_value) => Ok(Some(fact_value)),
            Err(reason) => self.fail_or_skip(name, def, reason),
        }
    }

    fn fail_or_skip(
        &self,
        name: &str,
        def: &FactDef,
        reason: String,
    ) -> Result<Option<FactValue>, FactError> {
        if def.required {
            Err(FactError::Required {
                name: name.to_string(),
                reason,
            })
        } else {
            tracing::warn!(fact = %name, %reason, "optional fact failed; dropped");
            Ok(None)
        }
    }
}

/// Coerce a trimmed string into the declared fact type.
fn coerce(value: &str, fact_type: Option<FactType>) -> Result<FactValue, String> {
    match fact_type {
        None | Some(FactType::String) => Ok(FactValue::Str(value.to_string())),
        Some(FactType::Boolean) => match value {
            "true" => Ok(FactValue::Bool(true)),
            "false" => Ok(FactValue::Bool(false)),
            other => Err(format!("'{}' is not a boolean", other)),
        },
        Some(FactType::Integer) => value
            .parse::<i64>()
            .map(FactValue::Int)
            .map_err(|_| format!("'{}' is not an integer", value)),
    }
}

/// Render `NAME=value` lines for every gathered fact with an export name.
///
/// Booleans format as `true`/`false`, integers in decimal.
pub fn export(doc: &Document, facts: &Facts) -> Vec<String> {
    let mut lines = Vec::new();
    for (name, def) in &doc.facts {
        let Some(export_name) = def.export.as_deref().filter(|e| !e.is_empty()) else {
            continue;
        };
        if let Some(value) = facts.get(name) {
            lines.push(format!("{}={}", export_name, value));
        }
    }
    lines
}

#[cfg(test)]
#[path = "facts_tests.rs"]
mod tests;

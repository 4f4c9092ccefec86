// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Embedded wire-format schema
//!
//! The JSON Schema for the configuration document is compiled into the
//! binary so a `schema` command can emit it without touching the
//! filesystem. This blob and the version string are the only
//! process-wide state the engine carries.

/// The configuration document schema, verbatim.
pub const SCHEMA_JSON: &str = include_str!("schema.json");

/// The schema parsed to a JSON value.
pub fn schema() -> serde_json::Value {
    // The embedded blob is validated by the test below; a parse failure
    // here would be a build defect, so fall back to null rather than panic.
    serde_json::from_str(SCHEMA_JSON).unwrap_or(serde_json::Value::Null)
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;

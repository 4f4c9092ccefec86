// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sink-config: Configuration document model, decoder, and validation

mod document;
mod duration;
mod parser;
mod schema;
mod step;
mod template;
mod validate;

pub use document::{DistributionDef, Document, FactDef, FactType, PlatformDef};
pub use duration::{format_duration, parse_duration, DurationSpec, TimeoutSpec};
pub use parser::{parse_document, ParseError};
pub use schema::{schema, SCHEMA_JSON};
pub use step::{
    CheckErrorStep, CheckRemediateStep, CommandStep, ErrorOnlyStep, RemediationStep, RetrySpec,
    Step,
};
pub use template::{interpolate, TemplateError};
pub use validate::{validate_document, ValidationError};

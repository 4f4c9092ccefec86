// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Duration and timeout wire forms

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Parse a duration string like `"30s"`, `"2m"`, `"1h"`.
///
/// Integer scalar with unit `s`, `m`, or `h`; a bare integer is seconds.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    let (num_str, suffix) = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| (&s[..i], &s[i..]))
        .unwrap_or((s, ""));

    let num: u64 = num_str
        .parse()
        .map_err(|_| format!("invalid number in duration: {}", s))?;

    let secs = match suffix.trim() {
        "" | "s" => num,
        "m" => num * 60,
        "h" => num * 3600,
        other => return Err(format!("unknown duration suffix: {}", other)),
    };
    Ok(Duration::from_secs(secs))
}

/// Format a duration back to its shortest wire form: `"90s"`, `"2m"`, `"1h"`.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs > 0 && secs % 3600 == 0 {
        format!("{}h", secs / 3600)
    } else if secs > 0 && secs % 60 == 0 {
        format!("{}m", secs / 60)
    } else {
        format!("{}s", secs)
    }
}

/// A duration carried in the configuration, serialized as a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationSpec(Duration);

impl DurationSpec {
    pub fn new(d: Duration) -> Self {
        Self(d)
    }

    pub fn from_secs(secs: u64) -> Self {
        Self(Duration::from_secs(secs))
    }

    pub fn duration(&self) -> Duration {
        self.0
    }
}

impl fmt::Display for DurationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_duration(self.0))
    }
}

impl Serialize for DurationSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_duration(self.0))
    }
}

impl<'de> Deserialize<'de> for DurationSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_duration(&raw).map(DurationSpec).map_err(de::Error::custom)
    }
}

/// Timeout specification for retry polling.
///
/// Wire forms:
///   `"timeout": "30s"`                                 (interval only)
///   `"timeout": {"interval": "2m", "error_code": 124}`  (with exit-code override)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutSpec {
    pub interval: DurationSpec,
    /// Exit code reported instead of the last attempt's when the deadline
    /// is reached.
    pub error_code: Option<i32>,
}

impl TimeoutSpec {
    pub fn interval_only(interval: DurationSpec) -> Self {
        Self {
            interval,
            error_code: None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TimeoutRaw {
    Short(DurationSpec),
    Long {
        interval: DurationSpec,
        #[serde(default)]
        error_code: Option<i32>,
    },
}

impl<'de> Deserialize<'de> for TimeoutSpec {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = TimeoutRaw::deserialize(d)?;
        Ok(match raw {
            TimeoutRaw::Short(interval) => TimeoutSpec {
                interval,
                error_code: None,
            },
            TimeoutRaw::Long {
                interval,
                error_code,
            } => TimeoutSpec {
                interval,
                error_code,
            },
        })
    }
}

impl Serialize for TimeoutSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.error_code {
            None => self.interval.serialize(serializer),
            Some(code) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("interval", &self.interval)?;
                map.serialize_entry("error_code", &code)?;
                map.end()
            }
        }
    }
}

#[cfg(test)]
#[path = "duration_tests.rs"]
mod tests;

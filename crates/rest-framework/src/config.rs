//! # Configuration
//!
//! Settings for the pipeline, the REST interceptor and the request controller.
//! Every field has a default, so a partial JSON document or a bare environment works.

use crate::envelope::JsonMode;
use serde::{Deserialize, Serialize};
use std::env;
use tracing::warn;

pub const ENV_PRETTY_JSON: &str = "REST_PRETTY_JSON";
pub const ENV_ALWAYS_INVOKE_VALIDATION: &str = "REST_ALWAYS_INVOKE_VALIDATION";
pub const ENV_EVENT_PARAMETER: &str = "REST_EVENT_PARAMETER";
pub const ENV_CONTROLLER_BUFFER: &str = "REST_CONTROLLER_BUFFER";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterceptorConfig {
    /// Pretty-print JSON bodies (cosmetic).
    #[serde(default)]
    pub pretty_json: bool,
    /// Run custom validation even when binding already produced findings.
    #[serde(default)]
    pub always_invoke_validation: bool,
    /// Request parameter that names an explicit event.
    #[serde(default = "default_event_parameter")]
    pub event_parameter: String,
    /// Capacity of the controller's request channel.
    #[serde(default = "default_controller_buffer")]
    pub controller_buffer: usize,
}

fn default_event_parameter() -> String {
    "_eventName".to_string()
}

fn default_controller_buffer() -> usize {
    32
}

impl Default for InterceptorConfig {
    fn default() -> Self {
        Self {
            pretty_json: false,
            always_invoke_validation: false,
            event_parameter: default_event_parameter(),
            controller_buffer: default_controller_buffer(),
        }
    }
}

impl InterceptorConfig {
    pub fn json_mode(&self) -> JsonMode {
        JsonMode::from_pretty(self.pretty_json)
    }

    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Defaults overlaid with any `REST_*` environment variables that are set.
    pub fn from_env() -> Self {
        Self::default().overlay(|key| env::var(key).ok())
    }

    /// Applies overrides from `lookup`; values that fail to parse are ignored.
    fn overlay(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(value) = lookup(ENV_PRETTY_JSON) {
            match parse_flag(&value) {
                Some(flag) => self.pretty_json = flag,
                None => warn!(key = ENV_PRETTY_JSON, %value, "Ignoring invalid flag"),
            }
        }
        if let Some(value) = lookup(ENV_ALWAYS_INVOKE_VALIDATION) {
            match parse_flag(&value) {
                Some(flag) => self.always_invoke_validation = flag,
                None => warn!(key = ENV_ALWAYS_INVOKE_VALIDATION, %value, "Ignoring invalid flag"),
            }
        }
        if let Some(value) = lookup(ENV_EVENT_PARAMETER) {
            if !value.trim().is_empty() {
                self.event_parameter = value.trim().to_string();
            }
        }
        if let Some(value) = lookup(ENV_CONTROLLER_BUFFER) {
            match value.trim().parse::<usize>() {
                Ok(size) if size > 0 => self.controller_buffer = size,
                _ => warn!(key = ENV_CONTROLLER_BUFFER, %value, "Ignoring invalid buffer size"),
            }
        }
        self
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

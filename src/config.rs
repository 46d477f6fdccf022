// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Per-request evaluation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct EvaluationConfig {
    /// Maximum number of scopes, including the request scope, that may be live at once.
    pub max_scope_depth: usize,
    pub enable_tracing: bool,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            max_scope_depth: 64,
            enable_tracing: false,
        }
    }
}

impl EvaluationConfig {
    pub fn from_json_str(json: &str) -> Result<EvaluationConfig> {
        Ok(serde_json::from_str(json)?)
    }

    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(yaml: &str) -> Result<EvaluationConfig> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

//! Runtime settings: endpoint paths, storage key, preview caps.

use serde::{Deserialize, Serialize};

/// Local-storage key holding the serialized history blob.
pub const HISTORY_STORAGE_KEY: &str = "modelHistory";

/// Name of the hidden form field carrying the CSRF token.
pub const CSRF_FIELD: &str = "csrfmiddlewaretoken";

/// Backend endpoint paths, relative to `api_base`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub upload: String,
    pub clean_data: String,
    pub compatible_features: String,
    pub run_model: String,
    pub variables: String,
    pub plot_data: String,
    pub workflow_statistics: String,
    pub update_email: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            upload: "/upload/".to_string(),
            clean_data: "/clean_data/".to_string(),
            compatible_features: "/get-compatible-features/".to_string(),
            run_model: "/run_model/".to_string(),
            variables: "/get-variables/".to_string(),
            plot_data: "/get-plot-data/".to_string(),
            workflow_statistics: "/api/workflow-statistics".to_string(),
            update_email: "/api/update-email".to_string(),
        }
    }
}

/// Everything the UI needs to know about its surroundings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkbenchConfig {
    /// Prefix for every endpoint, e.g. `https://api.example.org`. Empty
    /// means same origin.
    pub api_base: String,
    pub endpoints: Endpoints,
    pub history_key: String,
    pub csrf_field: String,
    /// Lines of CSV text shown in the upload preview.
    pub preview_lines: usize,
    /// Rows of an Excel sheet shown in the upload preview.
    pub preview_rows: usize,
}

impl Default for WorkbenchConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            endpoints: Endpoints::default(),
            history_key: HISTORY_STORAGE_KEY.to_string(),
            csrf_field: CSRF_FIELD.to_string(),
            preview_lines: 20,
            preview_rows: 20,
        }
    }
}

impl WorkbenchConfig {
    /// Same-origin defaults with a different API prefix.
    pub fn with_api_base(api_base: &str) -> Self {
        Self {
            api_base: api_base.trim().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// Absolute (or origin-relative) URL for an endpoint path.
    pub fn url(&self, path: &str) -> String {
        if self.api_base.is_empty() {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.api_base, path)
        } else {
            format!("{}/{}", self.api_base, path)
        }
    }
}

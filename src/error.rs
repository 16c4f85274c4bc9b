//! Error types.
//!
//! Every failure ends up in front of the user as a single message, so the
//! `Display` text of each variant is written to be shown as-is.

use thiserror::Error;

/// Failure talking to the backend.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The request never completed (offline, CORS, aborted).
    #[error("network error: {0}")]
    Network(String),
    /// The backend answered with a non-2xx status.
    #[error("request failed with status {status}{}", status_detail(.detail))]
    Status { status: u16, detail: Option<String> },
    /// The body was not the JSON shape we expected.
    #[error("malformed response: {0}")]
    Decode(String),
    /// The backend answered but reported failure in the payload.
    #[error("{0}")]
    Backend(String),
}

impl ApiError {
    /// Build a decode error from a serde_json failure.
    pub fn decode(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

fn status_detail(detail: &Option<String>) -> String {
    detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default()
}

/// Failure persisting or hydrating the run history.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("storage unavailable: {0}")]
    Storage(String),
    #[error("history could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("no stored CSV with id {0}")]
    UnknownCsv(u64),
}

/// Plot request rejected before hitting the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlotError {
    #[error("Please select a plot type.")]
    MissingPlotType,
    #[error("Please select an X variable.")]
    MissingX,
    #[error("Please select a Y variable.")]
    MissingY,
    #[error("Unsupported plot type.")]
    UnsupportedPlotType(String),
}

/// Custom table export failure.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("table has no columns")]
    NoColumns,
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv export failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Umbrella error for the command line tool.
#[derive(Debug, Error)]
pub enum WorkbenchError {
    #[error(transparent)]
    History(#[from] HistoryError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("unknown model: {0}")]
    UnknownModel(String),
    #[error("unknown target type: {0}")]
    UnknownTargetType(String),
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display_with_and_without_detail() {
        let bare = ApiError::Status {
            status: 500,
            detail: None,
        };
        assert_eq!(bare.to_string(), "request failed with status 500");

        let detailed = ApiError::Status {
            status: 400,
            detail: Some("No data available".to_string()),
        };
        assert_eq!(
            detailed.to_string(),
            "request failed with status 400: No data available"
        );
    }

    #[test]
    fn test_backend_error_is_shown_verbatim() {
        let err = ApiError::Backend("No cleaned data found in session.".to_string());
        assert_eq!(err.to_string(), "No cleaned data found in session.");
    }

    #[test]
    fn test_plot_errors_match_user_messages() {
        assert_eq!(PlotError::MissingX.to_string(), "Please select an X variable.");
        assert_eq!(
            PlotError::UnsupportedPlotType("pie".into()).to_string(),
            "Unsupported plot type."
        );
    }
}

//! # ml-workbench
//!
//! Client-side logic for a data-science workbench: upload a dataset, look
//! at its statistics, pick a target type and a compatible model, run it on
//! the backend and keep a history of runs.
//!
//! Everything here is plain Rust with no browser dependencies. The
//! `workbench-ui` crate renders it with Yew and performs the HTTP calls,
//! local-storage writes and chart drawing that this crate describes.
//!
//! ## Overview
//!
//! - **Compatibility gating**: which models make sense for which target type
//! - **Session**: the upload → explore → select → results lifecycle
//! - **History**: append-only record of uploads and runs, persisted as JSON
//! - **Views**: statistics tables, chart specs, previews, a custom table
//!
//! ## Example
//!
//! ```
//! use ml_workbench::{ModelKind, Session, TargetType, ModelHistory};
//!
//! let mut session = Session::new(ModelHistory::default());
//! session.select_target_type(TargetType::Regression);
//!
//! let knn = session
//!     .model_buttons()
//!     .into_iter()
//!     .find(|(model, _)| *model == ModelKind::Knn)
//!     .map(|(_, enabled)| enabled);
//! assert_eq!(knn, Some(false));
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod history;
pub mod inspect;
pub mod model;
pub mod plot;
pub mod preview;
pub mod session;
pub mod stats;
pub mod table;
pub mod theme;
pub mod workflow;

pub use api::{
    CompatibleFeatures, DatasetStatistics, FeatureInfo, OrderedMap, PlotData, RunModelRequest,
    WorkflowStats,
};
pub use config::{Endpoints, WorkbenchConfig};
pub use error::{ApiError, HistoryError, PlotError, TableError, WorkbenchError};
pub use history::{HistoryStorage, MemoryStorage, ModelHistory, Timestamp};
pub use model::{ModelKind, TargetType, button_enabled, is_compatible};
pub use plot::{ChartSpec, MetricsView, PlotKind, PlotRequest};
pub use preview::{FileKind, FilePreview, PreviewBody};
pub use session::{PrepareCommand, RunDecision, Session};
pub use stats::StatisticsView;
pub use table::CustomTable;
pub use theme::Theme;
pub use workflow::{Navigator, Page, WorkflowStep};

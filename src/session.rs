//! Per-page-load session: dataset, cleaning status, target/feature choice,
//! model gating and the history that runs are appended to.
//!
//! A `Session` is created when the page loads and can be reset explicitly.
//! All asynchronous answers come back through `*_finished`/`*_loaded`
//! methods tagged with the token handed out when the request started, so
//! late answers for superseded requests are dropped instead of clobbering
//! newer state.

use serde_json::{Map, Value};

use crate::api::{
    CleanSummary, CompatibleFeatures, CompatibleFeaturesRequest, DatasetStatistics, FeatureInfo,
    RunModelRequest,
};
use crate::error::ApiError;
use crate::history::{ModelHistory, Timestamp};
use crate::model::{self, ModelKind, TargetType};
use crate::workflow::{Navigator, WorkflowStep};

/// Message shown when a model is clicked before cleaning.
pub const NOT_CLEANED_MESSAGE: &str = "Please clean the data first.";

/// Alert text for a failed model run.
pub fn run_failure_message(err: &ApiError) -> String {
    format!("Model execution failed: {err}")
}

/// Dataset the backend currently holds for us.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub file_name: String,
    pub statistics: DatasetStatistics,
    /// Bumped on every upload; ties cleaning results to one dataset.
    pub generation: u64,
}

/// State of the prepare-for-modeling (clean data) action.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PrepareStatus {
    #[default]
    Idle,
    InFlight { generation: u64 },
    Ready { generation: u64, summary: CleanSummary },
    Failed { generation: u64, message: String },
}

/// What the caller should do after asking to prepare the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrepareCommand {
    /// Post to the clean endpoint, then report back with this generation.
    Dispatch { generation: u64 },
    /// A clean for this dataset is already running.
    InFlight,
    /// This dataset is already clean.
    AlreadyPrepared,
    /// Nothing uploaded yet.
    NoDataset,
}

/// What the selection step shows about cleaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrepareNotice {
    NoDataset,
    Preparing,
    /// Not started or failed; the step offers to run it.
    NotPrepared { error: Option<String> },
    Ready,
}

/// Contents of the feature dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FeatureList {
    #[default]
    Empty,
    Loading,
    Loaded(Vec<FeatureInfo>),
    Failed(String),
}

/// Token for an in-flight compatible-features request.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureQuery {
    pub seq: u64,
    pub body: CompatibleFeaturesRequest,
}

/// Outcome of clicking a model button.
#[derive(Debug, Clone, PartialEq)]
pub enum RunDecision {
    /// Abort and tell the user why.
    Blocked(String),
    /// Ask the user first; the run is parked until [`Session::confirm_run`].
    NeedsConfirmation { message: String },
    /// Send this request.
    Proceed(RunModelRequest),
}

/// Session state for one page load.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub nav: Navigator,
    pub history: ModelHistory,
    dataset: Option<Dataset>,
    generation: u64,
    prepare: PrepareStatus,
    target_type: TargetType,
    recommendation: Option<String>,
    features: FeatureList,
    selected_feature: Option<String>,
    feature_seq: u64,
    pending_run: Option<RunModelRequest>,
    running: Option<ModelKind>,
    last_results: Option<(ModelKind, Map<String, Value>)>,
}

impl Session {
    /// Fresh session around an already-hydrated history.
    pub fn new(history: ModelHistory) -> Self {
        Self {
            nav: Navigator::new(),
            history,
            dataset: None,
            generation: 0,
            prepare: PrepareStatus::Idle,
            target_type: TargetType::Classification,
            recommendation: None,
            features: FeatureList::Empty,
            selected_feature: None,
            feature_seq: 0,
            pending_run: None,
            running: None,
            last_results: None,
        }
    }

    /// Forget the dataset and every choice made about it. History is kept;
    /// sequence counters keep counting so in-flight answers stay stale.
    pub fn reset(&mut self) {
        let history = std::mem::take(&mut self.history);
        let generation = self.generation;
        let feature_seq = self.feature_seq;
        *self = Session::new(history);
        self.generation = generation;
        self.feature_seq = feature_seq + 1;
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn prepare_status(&self) -> &PrepareStatus {
        &self.prepare
    }

    pub fn target_type(&self) -> TargetType {
        self.target_type
    }

    pub fn features(&self) -> &FeatureList {
        &self.features
    }

    pub fn selected_feature(&self) -> Option<&str> {
        self.selected_feature.as_deref()
    }

    pub fn running(&self) -> Option<ModelKind> {
        self.running
    }

    pub fn pending_run(&self) -> Option<&RunModelRequest> {
        self.pending_run.as_ref()
    }

    pub fn last_results(&self) -> Option<&(ModelKind, Map<String, Value>)> {
        self.last_results.as_ref()
    }

    /// Recommendation label text: the backend's word when it gave one.
    pub fn recommendation(&self) -> Option<&str> {
        self.recommendation.as_deref()
    }

    fn recommended_type(&self) -> Option<TargetType> {
        self.recommendation.as_deref().and_then(|r| r.parse().ok())
    }

    /// The upload succeeded. Records the CSV text in history when given and
    /// moves the wizard on to exploration.
    pub fn dataset_uploaded(
        &mut self,
        file_name: &str,
        statistics: DatasetStatistics,
        csv_text: Option<String>,
        at: &Timestamp,
    ) {
        self.generation += 1;
        // Answers for the previous dataset's feature request are now stale.
        self.feature_seq += 1;
        self.recommendation = statistics.task_type.clone();
        if let Some(rec) = statistics.recommended_type() {
            self.target_type = rec;
        }
        self.dataset = Some(Dataset {
            file_name: file_name.to_string(),
            statistics,
            generation: self.generation,
        });
        self.prepare = PrepareStatus::Idle;
        self.features = FeatureList::Empty;
        self.selected_feature = None;
        self.pending_run = None;
        self.last_results = None;
        if let Some(text) = csv_text {
            self.history.push_csv(file_name, text, at);
        }
        self.nav.show(WorkflowStep::Exploration);
        log::info!("dataset {file_name} uploaded (generation {})", self.generation);
    }

    /// Start prepare-for-modeling. Idempotent per dataset: only the first
    /// call (or the first after a failure) asks for a request.
    pub fn begin_prepare(&mut self) -> PrepareCommand {
        let Some(dataset) = &self.dataset else {
            return PrepareCommand::NoDataset;
        };
        let generation = dataset.generation;
        match &self.prepare {
            PrepareStatus::Ready { generation: g, .. } if *g == generation => {
                log::debug!("prepare skipped: generation {generation} already clean");
                PrepareCommand::AlreadyPrepared
            }
            PrepareStatus::InFlight { generation: g } if *g == generation => {
                log::debug!("prepare skipped: generation {generation} in flight");
                PrepareCommand::InFlight
            }
            _ => {
                self.prepare = PrepareStatus::InFlight { generation };
                log::info!("preparing generation {generation} for modeling");
                PrepareCommand::Dispatch { generation }
            }
        }
    }

    /// Record the clean-data answer. Answers for an older upload are ignored.
    pub fn prepare_finished(&mut self, generation: u64, result: Result<CleanSummary, ApiError>) {
        if self.dataset.as_ref().map(|d| d.generation) != Some(generation) {
            log::debug!("dropping clean result for stale generation {generation}");
            return;
        }
        self.prepare = match result {
            Ok(summary) => {
                // Recommendation is cleared on upload, so anything held here
                // already belongs to this dataset.
                if self.recommendation.is_none() {
                    self.recommendation = summary.problem_type.clone();
                }
                PrepareStatus::Ready {
                    generation,
                    summary,
                }
            }
            Err(e) => {
                log::warn!("cleaning failed: {e}");
                PrepareStatus::Failed {
                    generation,
                    message: e.to_string(),
                }
            }
        };
    }

    /// The "data cleaned" flag.
    pub fn is_cleaned(&self) -> bool {
        match (&self.prepare, &self.dataset) {
            (PrepareStatus::Ready { generation, .. }, Some(d)) => *generation == d.generation,
            _ => false,
        }
    }

    pub fn prepare_notice(&self) -> PrepareNotice {
        let Some(dataset) = &self.dataset else {
            return PrepareNotice::NoDataset;
        };
        let current = dataset.generation;
        match &self.prepare {
            PrepareStatus::InFlight { generation } if *generation == current => {
                PrepareNotice::Preparing
            }
            PrepareStatus::Ready { generation, .. } if *generation == current => {
                PrepareNotice::Ready
            }
            PrepareStatus::Failed {
                generation,
                message,
            } if *generation == current => PrepareNotice::NotPrepared {
                error: Some(message.clone()),
            },
            _ => PrepareNotice::NotPrepared { error: None },
        }
    }

    /// Change the target type; the caller fetches features with the token.
    pub fn select_target_type(&mut self, target: TargetType) -> FeatureQuery {
        self.target_type = target;
        self.features = FeatureList::Loading;
        self.selected_feature = None;
        self.feature_seq += 1;
        FeatureQuery {
            seq: self.feature_seq,
            body: CompatibleFeaturesRequest {
                target_type: target,
            },
        }
    }

    /// Apply a compatible-features answer if it belongs to the latest
    /// request. Returns whether it was applied.
    pub fn features_loaded(
        &mut self,
        seq: u64,
        result: Result<CompatibleFeatures, ApiError>,
    ) -> bool {
        if seq != self.feature_seq {
            log::debug!("dropping features answer {seq}, latest is {}", self.feature_seq);
            return false;
        }
        match result {
            Ok(found) => {
                if found.recommendation.is_some() {
                    self.recommendation = found.recommendation;
                }
                self.selected_feature = if self.target_type.needs_target_feature() {
                    found.features.first().map(|f| f.name.clone())
                } else {
                    None
                };
                self.features = FeatureList::Loaded(found.features);
            }
            Err(e) => {
                self.features = FeatureList::Failed(e.to_string());
            }
        }
        true
    }

    /// Feature dropdown is usable only for supervised targets with a list.
    pub fn feature_selector_enabled(&self) -> bool {
        self.target_type.needs_target_feature()
            && matches!(self.features, FeatureList::Loaded(_))
    }

    pub fn guidance(&self) -> &'static str {
        self.target_type.guidance()
    }

    /// Pick the target column. Ignored for clustering or unknown names.
    pub fn select_feature(&mut self, name: &str) {
        if !self.target_type.needs_target_feature() {
            return;
        }
        if let FeatureList::Loaded(list) = &self.features
            && list.iter().any(|f| f.name == name)
        {
            self.selected_feature = Some(name.to_string());
        }
    }

    /// Enabled state of every model button under the current target type.
    pub fn model_buttons(&self) -> Vec<(ModelKind, bool)> {
        model::button_states(self.target_type)
    }

    fn run_request(&self, model: ModelKind) -> RunModelRequest {
        RunModelRequest {
            model,
            target_type: self.target_type,
            features_name_target: if self.target_type.needs_target_feature() {
                self.selected_feature.clone()
            } else {
                None
            },
        }
    }

    /// Gate a model-button click.
    pub fn request_run(&mut self, model: ModelKind) -> RunDecision {
        if !self.is_cleaned() {
            return RunDecision::Blocked(NOT_CLEANED_MESSAGE.to_string());
        }
        if !model::button_enabled(model, self.target_type) {
            return RunDecision::Blocked(format!(
                "{} does not support {} problems.",
                model.label(),
                self.target_type
            ));
        }
        let request = self.run_request(model);
        if model::is_compatible(model, self.recommended_type(), self.target_type) {
            return RunDecision::Proceed(request);
        }
        self.pending_run = Some(request);
        RunDecision::NeedsConfirmation {
            message: self.warning_message(model),
        }
    }

    fn warning_message(&self, model: ModelKind) -> String {
        let recommended = self
            .recommendation
            .clone()
            .unwrap_or_else(|| self.target_type.to_string());
        format!(
            "This model ({}) is not recommended for {} problems. Do you want to continue anyway?",
            model.id(),
            recommended
        )
    }

    /// Text of the warning dialog while a run waits for confirmation.
    pub fn run_warning(&self) -> Option<String> {
        self.pending_run
            .as_ref()
            .map(|pending| self.warning_message(pending.model))
    }

    /// Resolve the warning dialog. Returns the parked request on "continue".
    pub fn confirm_run(&mut self, proceed: bool) -> Option<RunModelRequest> {
        let pending = self.pending_run.take();
        if proceed { pending } else { None }
    }

    pub fn run_started(&mut self, model: ModelKind) {
        self.running = Some(model);
    }

    /// Record a run answer. Success is appended to history and shown on the
    /// results step; failure comes back as the alert text.
    pub fn run_finished(
        &mut self,
        model: ModelKind,
        result: Result<Map<String, Value>, ApiError>,
        at: &Timestamp,
    ) -> Result<(), String> {
        self.running = None;
        match result {
            Ok(results) => {
                let csv_name = self.dataset.as_ref().map(|d| d.file_name.clone());
                self.history.push_run(model, results.clone(), csv_name, at);
                self.last_results = Some((model, results));
                self.nav.show(WorkflowStep::Results);
                Ok(())
            }
            Err(e) => Err(run_failure_message(&e)),
        }
    }

    /// Show a past run's results again.
    pub fn view_run(&mut self, id: u64) -> bool {
        let Some(run) = self.history.find_run(id) else {
            return false;
        };
        let Ok(model) = run.model_type.parse::<ModelKind>() else {
            return false;
        };
        self.last_results = Some((model, run.results.clone()));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FeatureInfo;

    fn at() -> Timestamp {
        Timestamp {
            millis: 1_700_000_000_000,
            display: "11/14/2023, 10:13:20 PM".into(),
        }
    }

    fn stats(task: &str) -> DatasetStatistics {
        DatasetStatistics {
            task_type: Some(task.to_string()),
            ..DatasetStatistics::default()
        }
    }

    fn feature(name: &str, dtype: &str) -> FeatureInfo {
        FeatureInfo {
            name: name.into(),
            dtype: Some(dtype.into()),
            unique_count: None,
        }
    }

    fn cleaned_session(task: &str) -> Session {
        let mut session = Session::new(ModelHistory::default());
        session.dataset_uploaded("iris.csv", stats(task), Some("a,b\n1,2".into()), &at());
        let PrepareCommand::Dispatch { generation } = session.begin_prepare() else {
            panic!("expected dispatch");
        };
        session.prepare_finished(generation, Ok(CleanSummary::default()));
        session
    }

    #[test]
    fn test_upload_records_csv_and_advances() {
        let mut session = Session::new(ModelHistory::default());
        session.dataset_uploaded("iris.csv", stats("classification"), Some("x".into()), &at());
        assert_eq!(session.nav.step(), WorkflowStep::Exploration);
        assert_eq!(session.history.csvs.len(), 1);
        assert_eq!(
            session.history.current_csv.as_ref().map(|c| c.file_name.as_str()),
            Some("iris.csv")
        );
        assert_eq!(session.recommendation(), Some("classification"));
    }

    #[test]
    fn test_prepare_is_idempotent_per_dataset() {
        let mut session = Session::new(ModelHistory::default());
        assert_eq!(session.begin_prepare(), PrepareCommand::NoDataset);

        session.dataset_uploaded("a.csv", stats("regression"), None, &at());
        let first = session.begin_prepare();
        assert_eq!(first, PrepareCommand::Dispatch { generation: 1 });
        assert_eq!(session.begin_prepare(), PrepareCommand::InFlight);

        session.prepare_finished(1, Ok(CleanSummary::default()));
        assert!(session.is_cleaned());
        assert_eq!(session.begin_prepare(), PrepareCommand::AlreadyPrepared);
    }

    #[test]
    fn test_failed_prepare_can_be_retried() {
        let mut session = Session::new(ModelHistory::default());
        session.dataset_uploaded("a.csv", stats("regression"), None, &at());
        session.begin_prepare();
        session.prepare_finished(1, Err(ApiError::Backend("No data available".into())));
        assert!(!session.is_cleaned());
        assert_eq!(session.begin_prepare(), PrepareCommand::Dispatch { generation: 1 });
    }

    #[test]
    fn test_prepare_notice_follows_cleaning() {
        let mut session = Session::new(ModelHistory::default());
        assert_eq!(session.prepare_notice(), PrepareNotice::NoDataset);

        session.dataset_uploaded("a.csv", stats("regression"), None, &at());
        assert_eq!(session.prepare_notice(), PrepareNotice::NotPrepared { error: None });

        session.begin_prepare();
        assert_eq!(session.prepare_notice(), PrepareNotice::Preparing);

        session.prepare_finished(1, Err(ApiError::Backend("No data available".into())));
        assert!(matches!(
            session.prepare_notice(),
            PrepareNotice::NotPrepared { error: Some(e) } if e.contains("No data available")
        ));

        session.begin_prepare();
        session.prepare_finished(1, Ok(CleanSummary::default()));
        assert_eq!(session.prepare_notice(), PrepareNotice::Ready);
    }

    #[test]
    fn test_new_upload_invalidates_cleaning() {
        let mut session = cleaned_session("classification");
        assert!(session.is_cleaned());
        session.dataset_uploaded("b.csv", stats("classification"), None, &at());
        assert!(!session.is_cleaned());

        // A late answer for the first dataset must not mark the second clean.
        session.prepare_finished(1, Ok(CleanSummary::default()));
        assert!(!session.is_cleaned());
    }

    #[test]
    fn test_run_blocked_until_cleaned() {
        let mut session = Session::new(ModelHistory::default());
        session.dataset_uploaded("a.csv", stats("classification"), None, &at());
        assert_eq!(
            session.request_run(ModelKind::Svm),
            RunDecision::Blocked(NOT_CLEANED_MESSAGE.to_string())
        );
    }

    #[test]
    fn test_regression_scenario_disables_knn() {
        let mut session = cleaned_session("regression");
        let query = session.select_target_type(TargetType::Regression);
        let applied = session.features_loaded(
            query.seq,
            Ok(CompatibleFeatures {
                features: vec![feature("price", "float64"), feature("rooms", "int64")],
                recommendation: Some("regression".into()),
            }),
        );
        assert!(applied);
        let names: Vec<String> = match session.features() {
            FeatureList::Loaded(list) => list.iter().map(|f| f.name.clone()).collect(),
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(names, ["price", "rooms"]);
        let knn = session
            .model_buttons()
            .into_iter()
            .find(|(m, _)| *m == ModelKind::Knn)
            .unwrap();
        assert!(!knn.1);
        assert!(matches!(
            session.request_run(ModelKind::Knn),
            RunDecision::Blocked(_)
        ));
    }

    #[test]
    fn test_kmeans_clustering_omits_feature() {
        let mut session = cleaned_session("clustering");
        let query = session.select_target_type(TargetType::Clustering);
        session.features_loaded(
            query.seq,
            Ok(CompatibleFeatures {
                features: vec![feature("price", "float64")],
                recommendation: Some("clustering".into()),
            }),
        );
        assert!(!session.feature_selector_enabled());
        session.select_feature("price");
        assert_eq!(session.selected_feature(), None);

        match session.request_run(ModelKind::KMeans) {
            RunDecision::Proceed(req) => {
                assert_eq!(req.target_type, TargetType::Clustering);
                assert_eq!(req.features_name_target, None);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_stale_feature_answer_is_dropped() {
        let mut session = cleaned_session("classification");
        let first = session.select_target_type(TargetType::Classification);
        let second = session.select_target_type(TargetType::Regression);

        assert!(session.features_loaded(
            second.seq,
            Ok(CompatibleFeatures {
                features: vec![feature("price", "float64")],
                recommendation: None,
            })
        ));
        // The older answer arrives last.
        assert!(!session.features_loaded(
            first.seq,
            Ok(CompatibleFeatures {
                features: vec![feature("species", "object")],
                recommendation: None,
            })
        ));
        assert_eq!(session.selected_feature(), Some("price"));
    }

    #[test]
    fn test_mismatch_needs_confirmation() {
        let mut session = cleaned_session("regression");
        session.select_target_type(TargetType::Classification);
        let decision = session.request_run(ModelKind::NaiveBayes);
        match decision {
            RunDecision::NeedsConfirmation { message } => {
                assert!(message.contains("naive-bayes"));
                assert!(message.contains("regression problems"));
                assert_eq!(session.run_warning(), Some(message));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(session.pending_run().is_some());
        assert_eq!(session.confirm_run(false), None);
        assert!(session.pending_run().is_none());
        assert_eq!(session.run_warning(), None);

        session.request_run(ModelKind::NaiveBayes);
        let req = session.confirm_run(true).unwrap();
        assert_eq!(req.model, ModelKind::NaiveBayes);
    }

    #[test]
    fn test_successful_run_lands_in_history() {
        let mut session = cleaned_session("classification");
        let mut results = Map::new();
        results.insert("accuracy".into(), Value::from(0.93));
        session.run_started(ModelKind::DecisionTree);
        session
            .run_finished(ModelKind::DecisionTree, Ok(results), &at())
            .unwrap();
        assert_eq!(session.running(), None);
        assert_eq!(session.nav.step(), WorkflowStep::Results);
        let run = &session.history.models[0];
        assert_eq!(run.model_type, "decision-tree");
        assert_eq!(run.csv_name.as_deref(), Some("iris.csv"));

        let id = run.id;
        session.reset();
        assert!(session.last_results().is_none());
        assert!(session.view_run(id));
        assert_eq!(session.last_results().unwrap().0, ModelKind::DecisionTree);
    }

    #[test]
    fn test_failed_run_message() {
        let mut session = cleaned_session("classification");
        let err = session
            .run_finished(ModelKind::Svm, Err(ApiError::Network("offline".into())), &at())
            .unwrap_err();
        assert_eq!(err, "Model execution failed: network error: offline");
        assert!(session.history.models.is_empty());
    }

    #[test]
    fn test_feature_answer_for_previous_upload_is_dropped() {
        let mut session = Session::new(ModelHistory::default());
        session.dataset_uploaded("old.csv", stats("regression"), None, &at());
        let old = session.select_target_type(TargetType::Regression);

        session.dataset_uploaded("new.csv", stats("classification"), None, &at());
        assert!(!session.features_loaded(
            old.seq,
            Ok(CompatibleFeatures {
                features: vec![feature("old_price", "float64")],
                recommendation: Some("regression".into()),
            })
        ));
        assert_eq!(session.features(), &FeatureList::Empty);
        assert_eq!(session.selected_feature(), None);
        assert_eq!(session.recommendation(), Some("classification"));
    }

    #[test]
    fn test_feature_answer_before_reset_is_dropped() {
        let mut session = cleaned_session("regression");
        let query = session.select_target_type(TargetType::Regression);
        session.reset();
        assert!(!session.features_loaded(query.seq, Ok(CompatibleFeatures::default())));
        assert_eq!(session.features(), &FeatureList::Empty);
    }

    #[test]
    fn test_recommendation_does_not_outlive_its_dataset() {
        let mut session = Session::new(ModelHistory::default());
        session.dataset_uploaded("a.csv", stats("regression"), None, &at());
        session.dataset_uploaded("b.csv", DatasetStatistics::default(), None, &at());
        assert_eq!(session.recommendation(), None);

        let PrepareCommand::Dispatch { generation } = session.begin_prepare() else {
            panic!("expected dispatch");
        };
        session.prepare_finished(
            generation,
            Ok(CleanSummary {
                problem_type: Some("classification".into()),
                ..CleanSummary::default()
            }),
        );
        assert_eq!(session.recommendation(), Some("classification"));

        session.select_target_type(TargetType::Classification);
        assert!(matches!(
            session.request_run(ModelKind::Knn),
            RunDecision::Proceed(_)
        ));
    }

    #[test]
    fn test_reset_keeps_history_but_drops_dataset() {
        let mut session = cleaned_session("classification");
        session.reset();
        assert!(session.dataset().is_none());
        assert!(!session.is_cleaned());
        assert_eq!(session.history.csvs.len(), 1);
        assert_eq!(session.nav.step(), WorkflowStep::Upload);
    }
}

//! Session state shared by every page, driven through a Yew reducer.
//!
//! Async answers are dispatched as actions, so they always apply to the
//! latest session rather than to the copy captured when the request began.
//! Callers that need a decision up front (the prepare command, the feature
//! token, the run gate) compute it on a clone of the current session; the
//! reducer replays the same call and reaches the same result.

use std::rc::Rc;

use ml_workbench::api::{CleanSummary, CompatibleFeatures, DatasetStatistics};
use ml_workbench::{ApiError, ModelHistory, ModelKind, Page, Session, TargetType, Timestamp, WorkflowStep};
use serde_json::{Map, Value};
use yew::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState(pub Session);

pub type SessionHandle = UseReducerHandle<SessionState>;

impl SessionState {
    pub fn new(history: ModelHistory) -> Self {
        Self(Session::new(history))
    }

    pub fn session(&self) -> &Session {
        &self.0
    }
}

pub enum Action {
    Reset,
    Open(Page),
    Show(WorkflowStep),
    Next,
    Back,
    Uploaded {
        file_name: String,
        statistics: DatasetStatistics,
        csv_text: Option<String>,
        at: Timestamp,
    },
    BeginPrepare,
    PrepareFinished {
        generation: u64,
        result: Result<CleanSummary, ApiError>,
    },
    SelectTarget(TargetType),
    FeaturesLoaded {
        seq: u64,
        result: Result<CompatibleFeatures, ApiError>,
    },
    SelectFeature(String),
    RequestRun(ModelKind),
    ConfirmRun(bool),
    RunStarted(ModelKind),
    RunFinished {
        model: ModelKind,
        result: Result<Map<String, Value>, ApiError>,
        at: Timestamp,
    },
    ViewRun(u64),
    ClearHistory,
}

impl Reducible for SessionState {
    type Action = Action;

    fn reduce(self: Rc<Self>, action: Action) -> Rc<Self> {
        let mut next = (*self).clone();
        let session = &mut next.0;
        match action {
            Action::Reset => {
                let page = session.nav.page();
                session.reset();
                session.nav.open(page);
            }
            Action::Open(page) => session.nav.open(page),
            Action::Show(step) => session.nav.show(step),
            Action::Next => {
                session.nav.advance();
            }
            Action::Back => {
                session.nav.back();
            }
            Action::Uploaded {
                file_name,
                statistics,
                csv_text,
                at,
            } => session.dataset_uploaded(&file_name, statistics, csv_text, &at),
            Action::BeginPrepare => {
                session.begin_prepare();
            }
            Action::PrepareFinished { generation, result } => {
                session.prepare_finished(generation, result)
            }
            Action::SelectTarget(target) => {
                session.select_target_type(target);
            }
            Action::FeaturesLoaded { seq, result } => {
                session.features_loaded(seq, result);
            }
            Action::SelectFeature(name) => session.select_feature(&name),
            Action::RequestRun(model) => {
                session.request_run(model);
            }
            Action::ConfirmRun(proceed) => {
                session.confirm_run(proceed);
            }
            Action::RunStarted(model) => session.run_started(model),
            Action::RunFinished { model, result, at } => {
                if let Err(message) = session.run_finished(model, result, &at) {
                    log::debug!("run not recorded: {message}");
                }
            }
            Action::ViewRun(id) => {
                if session.view_run(id) {
                    session.nav.open(Page::Workflow);
                    session.nav.show(WorkflowStep::Results);
                }
            }
            Action::ClearHistory => session.history = ModelHistory::default(),
        }
        Rc::new(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ml_workbench::session::{FeatureList, PrepareCommand, PrepareStatus};
    use ml_workbench::{FeatureInfo, RunDecision};

    fn at(millis: u64) -> Timestamp {
        Timestamp {
            millis,
            display: format!("t{millis}"),
        }
    }

    fn reduce(state: Rc<SessionState>, action: Action) -> Rc<SessionState> {
        state.reduce(action)
    }

    fn uploaded() -> Rc<SessionState> {
        let state = Rc::new(SessionState::new(ModelHistory::default()));
        reduce(
            state,
            Action::Uploaded {
                file_name: "iris.csv".into(),
                statistics: DatasetStatistics::default(),
                csv_text: Some("a,b\n1,2".into()),
                at: at(1),
            },
        )
    }

    #[test]
    fn test_probe_and_reducer_agree_on_prepare() {
        let state = uploaded();
        let mut probe = state.session().clone();
        let command = probe.begin_prepare();
        let state = reduce(state, Action::BeginPrepare);
        let PrepareCommand::Dispatch { generation } = command else {
            panic!("expected dispatch, got {command:?}");
        };
        assert_eq!(
            state.session().prepare_status(),
            &PrepareStatus::InFlight { generation }
        );
        let mut probe = state.session().clone();
        assert_eq!(probe.begin_prepare(), PrepareCommand::InFlight);
    }

    #[test]
    fn test_probe_and_reducer_agree_on_feature_token() {
        let state = uploaded();
        let seq = state.session().clone().select_target_type(TargetType::Regression).seq;
        let state = reduce(state, Action::SelectTarget(TargetType::Regression));
        let state = reduce(
            state,
            Action::FeaturesLoaded {
                seq,
                result: Ok(CompatibleFeatures {
                    features: vec![FeatureInfo {
                        name: "price".into(),
                        dtype: Some("float64".into()),
                        unique_count: None,
                    }],
                    recommendation: None,
                }),
            },
        );
        assert!(matches!(state.session().features(), FeatureList::Loaded(f) if f.len() == 1));
        assert_eq!(state.session().selected_feature(), Some("price"));
    }

    #[test]
    fn test_late_feature_answer_is_dropped() {
        let state = uploaded();
        let first = state.session().clone().select_target_type(TargetType::Regression).seq;
        let state = reduce(state, Action::SelectTarget(TargetType::Regression));
        let state = reduce(state, Action::SelectTarget(TargetType::Clustering));
        let state = reduce(
            state,
            Action::FeaturesLoaded {
                seq: first,
                result: Ok(CompatibleFeatures::default()),
            },
        );
        assert_eq!(state.session().features(), &FeatureList::Loading);
    }

    #[test]
    fn test_successful_run_lands_in_history_and_results() {
        let state = uploaded();
        let state = reduce(state, Action::RunStarted(ModelKind::Knn));
        let mut results = Map::new();
        results.insert("accuracy".into(), Value::from(0.9));
        let state = reduce(
            state,
            Action::RunFinished {
                model: ModelKind::Knn,
                result: Ok(results),
                at: at(5),
            },
        );
        let session = state.session();
        assert_eq!(session.running(), None);
        assert_eq!(session.history.models.len(), 1);
        assert_eq!(session.history.models[0].csv_name.as_deref(), Some("iris.csv"));
        assert_eq!(session.nav.step(), WorkflowStep::Results);
    }

    #[test]
    fn test_blocked_run_does_not_change_state() {
        let state = uploaded();
        let mut probe = state.session().clone();
        assert!(matches!(probe.request_run(ModelKind::Knn), RunDecision::Blocked(_)));
        let after = reduce(state.clone(), Action::RequestRun(ModelKind::Knn));
        assert_eq!(after.session().pending_run(), None);
    }

    #[test]
    fn test_next_and_back_walk_the_wizard() {
        let state = uploaded();
        assert_eq!(state.session().nav.step(), WorkflowStep::Exploration);
        let state = reduce(state, Action::Next);
        assert_eq!(state.session().nav.step(), WorkflowStep::Selection);
        let state = reduce(state, Action::Back);
        let state = reduce(state, Action::Back);
        let state = reduce(state, Action::Back);
        assert_eq!(state.session().nav.step(), WorkflowStep::Upload);
    }

    #[test]
    fn test_failed_run_leaves_history_alone() {
        let state = reduce(uploaded(), Action::RunStarted(ModelKind::Svm));
        let state = reduce(
            state,
            Action::RunFinished {
                model: ModelKind::Svm,
                result: Err(ApiError::Network("offline".into())),
                at: at(6),
            },
        );
        assert_eq!(state.session().running(), None);
        assert!(state.session().history.models.is_empty());
        assert_eq!(state.session().nav.step(), WorkflowStep::Exploration);
    }

    #[test]
    fn test_clear_history_keeps_dataset() {
        let state = reduce(uploaded(), Action::ClearHistory);
        assert!(state.session().history.is_empty());
        assert!(state.session().dataset().is_some());
    }
}

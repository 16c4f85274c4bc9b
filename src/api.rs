//! Backend wire types.
//!
//! The backend is a collection of JSON endpoints that grew over time, so
//! the shapes here are deliberately lenient: optional fields default, and
//! the two historical shapes of the compatible-features answer are both
//! accepted. Decoding never panics; anything unexpected becomes
//! [`ApiError::Decode`].

use std::fmt;
use std::marker::PhantomData;

use serde::de::{DeserializeOwned, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::model::{ModelKind, TargetType};

/// Header carrying the CSRF token on mutating calls.
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// A JSON object whose key order is kept as received.
///
/// Column order matters for the statistics tables, and `serde_json::Map`
/// sorts keys unless a crate-wide feature is switched on.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V>(pub Vec<(String, V)>);

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        OrderedMap(Vec::new())
    }
}

impl<V> OrderedMap<V> {
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedVisitor<V> {
            type Value = OrderedMap<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    entries.push((key, value));
                }
                Ok(OrderedMap(entries))
            }
        }

        deserializer.deserialize_map(OrderedVisitor(PhantomData))
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}

/// Decode a JSON body into `T`.
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(ApiError::decode)
}

/// Turn a non-2xx answer into an error, keeping the backend's `error`
/// field when the body carries one.
pub fn check_status(status: u16, body: &str) -> Result<(), ApiError> {
    if (200..300).contains(&status) {
        return Ok(());
    }
    let detail = serde_json::from_str::<Value>(body).ok().and_then(|v| {
        v.get("error")
            .or_else(|| v.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
    });
    Err(ApiError::Status { status, detail })
}

fn backend_error(error: Option<String>, fallback: &str) -> ApiError {
    ApiError::Backend(error.unwrap_or_else(|| fallback.to_string()))
}

/// JS-style truthiness; `/clean_data/` answers `success` with a sentence.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Answer of `POST /upload/`.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub statistics: Option<DatasetStatistics>,
    #[serde(default)]
    pub error: Option<String>,
}

impl UploadResponse {
    pub fn into_result(self) -> Result<DatasetStatistics, ApiError> {
        match (self.success, self.statistics) {
            (true, Some(stats)) => Ok(stats),
            (true, None) => Err(ApiError::Decode("upload succeeded without statistics".into())),
            (false, _) => Err(backend_error(self.error, "Upload failed")),
        }
    }
}

/// Dataset profile computed by the backend on upload.
///
/// Counts arrive as floats because the backend's numpy encoder widens them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DatasetStatistics {
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub shape: [f64; 2],
    #[serde(default)]
    pub null_values: OrderedMap<f64>,
    #[serde(default)]
    pub duplicates_count: f64,
    #[serde(default)]
    pub dtypes: OrderedMap<String>,
    #[serde(default)]
    pub mean_values: OrderedMap<Option<f64>>,
    #[serde(default)]
    pub variance_values: OrderedMap<Option<f64>>,
    #[serde(default)]
    pub std_values: OrderedMap<Option<f64>>,
    #[serde(default)]
    pub correlation_with_all_variables: OrderedMap<OrderedMap<Option<f64>>>,
    #[serde(default)]
    pub category_analysis: OrderedMap<OrderedMap<f64>>,
    #[serde(default)]
    pub target_column: Option<String>,
    #[serde(default)]
    pub task_type: Option<String>,
    #[serde(default)]
    pub analysis_error: Option<String>,
}

impl DatasetStatistics {
    /// Backend's guess at the problem type, if it made a recognizable one.
    pub fn recommended_type(&self) -> Option<TargetType> {
        self.task_type.as_deref().and_then(|t| t.parse().ok())
    }
}

/// Answer of `POST /clean_data/`.
#[derive(Debug, Clone, Deserialize)]
pub struct CleanResponse {
    #[serde(default)]
    pub success: Value,
    #[serde(default)]
    pub target_column: Option<String>,
    #[serde(default)]
    pub problem_type: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// What cleaning reported back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanSummary {
    pub message: Option<String>,
    pub target_column: Option<String>,
    pub problem_type: Option<String>,
}

impl CleanResponse {
    pub fn into_result(self) -> Result<CleanSummary, ApiError> {
        if !truthy(&self.success) {
            return Err(backend_error(self.error, "Error cleaning data"));
        }
        Ok(CleanSummary {
            message: self.success.as_str().map(str::to_string),
            target_column: self.target_column,
            problem_type: self.problem_type,
        })
    }
}

/// Body of `POST /get-compatible-features/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompatibleFeaturesRequest {
    pub target_type: TargetType,
}

/// One column usable as a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureInfo {
    pub name: String,
    pub dtype: Option<String>,
    pub unique_count: Option<u64>,
}

impl FeatureInfo {
    /// Option text, e.g. `price (float64)`.
    pub fn label(&self) -> String {
        match &self.dtype {
            Some(dtype) => format!("{} ({})", self.name, dtype),
            None => self.name.clone(),
        }
    }
}

impl<'de> Deserialize<'de> for FeatureInfo {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Detailed {
            name: String,
            #[serde(default)]
            dtype: Option<String>,
            #[serde(default)]
            unique_count: Option<u64>,
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Entry {
            Bare(String),
            Detailed(Detailed),
        }

        Ok(match Entry::deserialize(deserializer)? {
            Entry::Bare(name) => FeatureInfo {
                name,
                dtype: None,
                unique_count: None,
            },
            Entry::Detailed(d) => FeatureInfo {
                name: d.name,
                dtype: d.dtype,
                unique_count: d.unique_count,
            },
        })
    }
}

/// Decoded compatible-features answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompatibleFeatures {
    pub features: Vec<FeatureInfo>,
    /// Raw recommendation text as sent by the backend.
    pub recommendation: Option<String>,
}

/// Decode the compatible-features body. Older backends answer with a bare
/// list of column names; newer ones with `{features, recommendation}`.
pub fn parse_compatible_features(body: &str) -> Result<CompatibleFeatures, ApiError> {
    #[derive(Deserialize)]
    struct Envelope {
        #[serde(default)]
        features: Vec<FeatureInfo>,
        #[serde(default)]
        recommendation: Option<String>,
        #[serde(default)]
        error: Option<String>,
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Shape {
        List(Vec<FeatureInfo>),
        Envelope(Envelope),
    }

    match decode::<Shape>(body)? {
        Shape::List(features) => Ok(CompatibleFeatures {
            features,
            recommendation: None,
        }),
        Shape::Envelope(Envelope {
            error: Some(error), ..
        }) => Err(ApiError::Backend(error)),
        Shape::Envelope(env) => Ok(CompatibleFeatures {
            features: env.features,
            recommendation: env.recommendation,
        }),
    }
}

/// Body of the run endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunModelRequest {
    pub model: ModelKind,
    pub target_type: TargetType,
    /// Omitted for clustering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features_name_target: Option<String>,
}

/// Answer of the run endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RunModelResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub results: Option<Map<String, Value>>,
    #[serde(default)]
    pub error: Option<String>,
}

impl RunModelResponse {
    pub fn into_result(self) -> Result<Map<String, Value>, ApiError> {
        match (self.success, self.results) {
            (true, Some(results)) => Ok(results),
            _ => Err(backend_error(self.error, "Unknown error occurred")),
        }
    }
}

/// Answer of `GET /get-variables/`.
#[derive(Debug, Clone, Deserialize)]
pub struct VariablesResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub variables: Option<Vec<String>>,
    #[serde(default)]
    pub error: Option<String>,
}

impl VariablesResponse {
    pub fn into_result(self) -> Result<Vec<String>, ApiError> {
        if !self.success {
            return Err(backend_error(self.error, "Unknown error in response"));
        }
        self.variables
            .ok_or_else(|| ApiError::Decode("Invalid variables data received".into()))
    }
}

/// A scatter point.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Series returned by `GET /get-plot-data/`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PlotData {
    /// Category labels or bin edges; kept as JSON so numbers stay numbers.
    #[serde(default)]
    pub labels: Vec<Value>,
    #[serde(default)]
    pub values: Vec<f64>,
    #[serde(default)]
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlotDataResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub plot_data: Option<PlotData>,
    #[serde(default)]
    pub error: Option<String>,
}

impl PlotDataResponse {
    pub fn into_result(self) -> Result<PlotData, ApiError> {
        match (self.success, self.plot_data) {
            (true, Some(data)) => Ok(data),
            _ => Err(backend_error(self.error, "Failed to load plot data")),
        }
    }
}

/// Dashboard counter from `GET /api/workflow-statistics`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct WorkflowStats {
    pub completed: u64,
    #[serde(default)]
    pub in_progress: u64,
    pub total: u64,
}

impl fmt::Display for WorkflowStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.completed, self.total)
    }
}

/// Body of `POST /api/update-email`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateEmailRequest {
    pub email: String,
}

impl UpdateEmailRequest {
    /// Trims the address; an empty one is rejected before any request.
    pub fn new(raw: &str) -> Option<Self> {
        let email = raw.trim();
        (!email.is_empty()).then(|| UpdateEmailRequest {
            email: email.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_statistics_keep_column_order() {
        let body = r#"{
            "success": true,
            "message": "File uploaded successfully",
            "statistics": {
                "columns": ["zeta", "alpha", "mid"],
                "shape": [150, 3],
                "null_values": {"zeta": 0.0, "alpha": 2.0, "mid": 0.0},
                "duplicates_count": 1.0,
                "dtypes": {"zeta": "float64", "alpha": "object", "mid": "int64"},
                "mean_values": {"zeta": 5.8, "mid": 3.0},
                "variance_values": {"zeta": 0.68, "mid": 1.0},
                "std_values": {"zeta": 0.82, "mid": 1.0},
                "correlation_with_all_variables": {
                    "zeta": {"zeta": 1.0, "mid": 0.5},
                    "mid": {"zeta": 0.5, "mid": 1.0}
                },
                "category_analysis": {"alpha": {"setosa": 50.0, "virginica": 48.0}},
                "target_column": "alpha",
                "task_type": "classification"
            }
        }"#;
        let stats = decode::<UploadResponse>(body).unwrap().into_result().unwrap();
        assert_eq!(stats.null_values.keys().collect::<Vec<_>>(), ["zeta", "alpha", "mid"]);
        assert_eq!(stats.shape, [150.0, 3.0]);
        assert_eq!(stats.recommended_type(), Some(TargetType::Classification));
        assert_eq!(
            stats.category_analysis.get("alpha").and_then(|c| c.get("virginica")),
            Some(&48.0)
        );
    }

    #[test]
    fn test_upload_failure_carries_backend_error() {
        let body = r#"{"success": false, "error": "Unsupported file type"}"#;
        let err = decode::<UploadResponse>(body).unwrap().into_result().unwrap_err();
        assert_eq!(err, ApiError::Backend("Unsupported file type".into()));
    }

    #[test]
    fn test_clean_success_is_a_sentence() {
        let body = r#"{"success": "Data has been cleaned and preprocessed successfully.",
                       "target_column": "species", "problem_type": "classification"}"#;
        let summary = decode::<CleanResponse>(body).unwrap().into_result().unwrap();
        assert_eq!(summary.target_column.as_deref(), Some("species"));
        assert!(summary.message.unwrap().starts_with("Data has been cleaned"));

        let body = r#"{"error": "No data available for cleaning."}"#;
        let err = decode::<CleanResponse>(body).unwrap().into_result().unwrap_err();
        assert_eq!(err.to_string(), "No data available for cleaning.");
    }

    #[test]
    fn test_compatible_features_detailed_shape() {
        let body = r#"{"features": [
                {"name": "price", "dtype": "float64", "unique_count": 97},
                {"name": "rooms", "dtype": "int64", "unique_count": 6}
            ], "recommendation": "regression"}"#;
        let parsed = parse_compatible_features(body).unwrap();
        assert_eq!(parsed.features.len(), 2);
        assert_eq!(parsed.features[0].label(), "price (float64)");
        assert_eq!(parsed.features[1].unique_count, Some(6));
        assert_eq!(parsed.recommendation.as_deref(), Some("regression"));
    }

    #[test]
    fn test_compatible_features_bare_list_shape() {
        let parsed = parse_compatible_features(r#"["a", "b"]"#).unwrap();
        assert_eq!(parsed.features[1].name, "b");
        assert_eq!(parsed.features[1].label(), "b");
        assert!(parsed.recommendation.is_none());
    }

    #[test]
    fn test_compatible_features_error_shape() {
        let err = parse_compatible_features(r#"{"error": "No data available"}"#).unwrap_err();
        assert_eq!(err, ApiError::Backend("No data available".into()));
        assert!(matches!(
            parse_compatible_features("<html>").unwrap_err(),
            ApiError::Decode(_)
        ));
    }

    #[test]
    fn test_run_request_omits_feature_for_clustering() {
        let req = RunModelRequest {
            model: ModelKind::KMeans,
            target_type: TargetType::Clustering,
            features_name_target: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"model": "k-means", "target_type": "clustering"})
        );

        let req = RunModelRequest {
            model: ModelKind::Svm,
            target_type: TargetType::Regression,
            features_name_target: Some("price".into()),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["features_name_target"], "price");
    }

    #[test]
    fn test_run_response_without_success_is_error() {
        let err = decode::<RunModelResponse>(r#"{"error": "Unknown model."}"#)
            .unwrap()
            .into_result()
            .unwrap_err();
        assert_eq!(err.to_string(), "Unknown model.");

        let err = decode::<RunModelResponse>(r#"{"success": true}"#)
            .unwrap()
            .into_result()
            .unwrap_err();
        assert_eq!(err.to_string(), "Unknown error occurred");
    }

    #[test]
    fn test_check_status_extracts_detail() {
        assert!(check_status(204, "").is_ok());
        let err = check_status(400, r#"{"error": "No cleaned data found in session."}"#).unwrap_err();
        assert_eq!(
            err,
            ApiError::Status {
                status: 400,
                detail: Some("No cleaned data found in session.".into())
            }
        );
        let err = check_status(502, "Bad Gateway").unwrap_err();
        assert_eq!(err, ApiError::Status { status: 502, detail: None });
    }

    #[test]
    fn test_variables_and_plot_data() {
        let vars = decode::<VariablesResponse>(r#"{"success": true, "variables": ["x", "y"]}"#)
            .unwrap()
            .into_result()
            .unwrap();
        assert_eq!(vars, ["x", "y"]);
        assert!(
            decode::<VariablesResponse>(r#"{"success": true}"#)
                .unwrap()
                .into_result()
                .is_err()
        );

        let body = r#"{"success": true, "plot_data": {"points": [{"x": 1, "y": 2.5}]}}"#;
        let data = decode::<PlotDataResponse>(body).unwrap().into_result().unwrap();
        assert_eq!(data.points, [Point { x: 1.0, y: 2.5 }]);
        assert!(data.labels.is_empty());
    }

    #[test]
    fn test_workflow_stats_display() {
        let stats: WorkflowStats =
            decode(r#"{"completed": 5, "in_progress": 2, "total": 7}"#).unwrap();
        assert_eq!(stats.to_string(), "5 / 7");
    }

    #[test]
    fn test_update_email_rejects_blank() {
        assert!(UpdateEmailRequest::new("   ").is_none());
        assert_eq!(
            UpdateEmailRequest::new(" me@example.org ").unwrap().email,
            "me@example.org"
        );
    }
}

//! Problem types, model identifiers and the static compatibility table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The ML problem category the user is solving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    Classification,
    Regression,
    Clustering,
}

impl TargetType {
    pub const ALL: [TargetType; 3] = [
        TargetType::Classification,
        TargetType::Regression,
        TargetType::Clustering,
    ];

    /// Wire and `<option value>` form.
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::Classification => "classification",
            TargetType::Regression => "regression",
            TargetType::Clustering => "clustering",
        }
    }

    /// Human label for selectors.
    pub fn label(&self) -> &'static str {
        match self {
            TargetType::Classification => "Classification",
            TargetType::Regression => "Regression",
            TargetType::Clustering => "Clustering",
        }
    }

    /// Guidance shown next to the feature selector.
    pub fn guidance(&self) -> &'static str {
        match self {
            TargetType::Classification => "Select a categorical target variable",
            TargetType::Regression => "Select a numerical target variable",
            TargetType::Clustering => "No target variable needed for clustering",
        }
    }

    /// Clustering is unsupervised, so no target feature is picked.
    pub fn needs_target_feature(&self) -> bool {
        !matches!(self, TargetType::Clustering)
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetType {
    type Err = String;

    /// Case-insensitive; the backend recommendation sometimes arrives capitalized.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classification" => Ok(TargetType::Classification),
            "regression" => Ok(TargetType::Regression),
            "clustering" => Ok(TargetType::Clustering),
            other => Err(format!("unknown target type: {other}")),
        }
    }
}

/// A model the backend can train.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelKind {
    Regression,
    DecisionTree,
    Svm,
    RandomForest,
    Knn,
    NeuralNetwork,
    KMeans,
    NaiveBayes,
}

impl ModelKind {
    /// Button order on the selection page.
    pub const ALL: [ModelKind; 8] = [
        ModelKind::Regression,
        ModelKind::DecisionTree,
        ModelKind::Svm,
        ModelKind::RandomForest,
        ModelKind::Knn,
        ModelKind::NeuralNetwork,
        ModelKind::KMeans,
        ModelKind::NaiveBayes,
    ];

    /// Identifier sent to the run endpoint.
    pub fn id(&self) -> &'static str {
        match self {
            ModelKind::Regression => "regression",
            ModelKind::DecisionTree => "decision-tree",
            ModelKind::Svm => "svm",
            ModelKind::RandomForest => "random-forest",
            ModelKind::Knn => "knn",
            ModelKind::NeuralNetwork => "neural-network",
            ModelKind::KMeans => "k-means",
            ModelKind::NaiveBayes => "naive-bayes",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ModelKind::Regression => "Linear Regression",
            ModelKind::DecisionTree => "Decision Tree",
            ModelKind::Svm => "SVM",
            ModelKind::RandomForest => "Random Forest",
            ModelKind::Knn => "KNN",
            ModelKind::NeuralNetwork => "Neural Network",
            ModelKind::KMeans => "K-Means",
            ModelKind::NaiveBayes => "Naive Bayes",
        }
    }

    /// Problem types this model applies to.
    pub fn supported(&self) -> &'static [TargetType] {
        use TargetType::*;
        match self {
            ModelKind::Regression => &[Regression],
            ModelKind::DecisionTree => &[Classification, Regression],
            ModelKind::Svm => &[Classification, Regression],
            ModelKind::RandomForest => &[Classification, Regression],
            ModelKind::Knn => &[Classification],
            ModelKind::NeuralNetwork => &[Classification, Regression],
            ModelKind::KMeans => &[Clustering],
            ModelKind::NaiveBayes => &[Classification],
        }
    }

    pub fn supports(&self, target: TargetType) -> bool {
        self.supported().contains(&target)
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ModelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelKind::ALL
            .into_iter()
            .find(|m| m.id() == s.trim())
            .ok_or_else(|| format!("unknown model: {s}"))
    }
}

/// Whether a button for `model` is clickable under `target`.
pub fn button_enabled(model: ModelKind, target: TargetType) -> bool {
    model.supports(target)
}

/// Enabled state of every model button, in display order.
pub fn button_states(target: TargetType) -> Vec<(ModelKind, bool)> {
    ModelKind::ALL
        .into_iter()
        .map(|m| (m, button_enabled(m, target)))
        .collect()
}

/// Whether running `model` needs no warning.
///
/// The model has to support the selected target type and, when the backend
/// has made one, its recommendation as well.
pub fn is_compatible(
    model: ModelKind,
    recommendation: Option<TargetType>,
    target: TargetType,
) -> bool {
    model.supports(target) && recommendation.is_none_or(|r| model.supports(r))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_state_matches_table_for_every_pair() {
        for target in TargetType::ALL {
            for (model, enabled) in button_states(target) {
                assert_eq!(
                    enabled,
                    model.supported().contains(&target),
                    "{model} under {target}"
                );
            }
        }
    }

    #[test]
    fn test_knn_disabled_for_regression() {
        assert!(!button_enabled(ModelKind::Knn, TargetType::Regression));
        assert!(button_enabled(ModelKind::Regression, TargetType::Regression));
    }

    #[test]
    fn test_only_kmeans_clusters() {
        let enabled: Vec<ModelKind> = button_states(TargetType::Clustering)
            .into_iter()
            .filter(|(_, on)| *on)
            .map(|(m, _)| m)
            .collect();
        assert_eq!(enabled, vec![ModelKind::KMeans]);
    }

    #[test]
    fn test_compatibility_checks_recommendation() {
        // Supported target but the backend recommends regression.
        assert!(!is_compatible(
            ModelKind::Knn,
            Some(TargetType::Regression),
            TargetType::Classification
        ));
        assert!(is_compatible(
            ModelKind::Svm,
            Some(TargetType::Regression),
            TargetType::Classification
        ));
        assert!(is_compatible(ModelKind::Knn, None, TargetType::Classification));
        assert!(!is_compatible(ModelKind::KMeans, None, TargetType::Regression));
    }

    #[test]
    fn test_parse_ids() {
        assert_eq!("k-means".parse::<ModelKind>(), Ok(ModelKind::KMeans));
        assert_eq!("naive-bayes".parse::<ModelKind>(), Ok(ModelKind::NaiveBayes));
        assert!("logistic".parse::<ModelKind>().is_err());
        assert_eq!(
            "Classification".parse::<TargetType>(),
            Ok(TargetType::Classification)
        );
        assert!("ranking".parse::<TargetType>().is_err());
    }

    #[test]
    fn test_serde_uses_wire_ids() {
        let json = serde_json::to_string(&ModelKind::RandomForest).unwrap();
        assert_eq!(json, "\"random-forest\"");
        let json = serde_json::to_string(&ModelKind::KMeans).unwrap();
        assert_eq!(json, "\"k-means\"");
        let t: TargetType = serde_json::from_str("\"clustering\"").unwrap();
        assert_eq!(t, TargetType::Clustering);
    }
}

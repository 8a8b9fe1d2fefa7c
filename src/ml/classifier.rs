use crate::error::{AppError, Result};
use crate::ml::models::{ClassMetrics, ModelMetadata, ModelMetrics, Prediction, TrainingDataset};
use crate::models::Species;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_classifier::{
    DecisionTreeClassifier, DecisionTreeClassifierParameters, SplitCriterion,
};
use std::collections::HashMap;

/// Random forest classifier built from bagged decision trees
///
/// Each tree is fit on a bootstrap resample of the training data drawn from a
/// seeded RNG, so training is reproducible run to run. Class probabilities are
/// the fraction of trees voting for each class.
pub struct RandomForestClassifier {
    /// Model metadata
    metadata: ModelMetadata,

    /// Fitted trees
    trees: Vec<DecisionTreeClassifier<f64, i32, DenseMatrix<f64>, Vec<i32>>>,

    /// Number of trees in the ensemble
    n_trees: usize,

    /// Maximum tree depth (unlimited when None)
    max_depth: Option<u16>,

    /// Seed for bootstrap sampling
    seed: u64,

    /// Is trained
    trained: bool,
}

impl RandomForestClassifier {
    pub fn new(n_trees: usize, max_depth: Option<u16>, seed: u64) -> Self {
        let mut hyperparameters: HashMap<String, String> = [
            ("n_trees".to_string(), n_trees.to_string()),
            ("seed".to_string(), seed.to_string()),
        ]
        .into_iter()
        .collect();
        if let Some(depth) = max_depth {
            hyperparameters.insert("max_depth".to_string(), depth.to_string());
        }

        Self {
            metadata: ModelMetadata {
                name: "Random Forest".to_string(),
                trained_at: chrono::Utc::now(),
                n_training_samples: 0,
                n_features: 0,
                training_metrics: ModelMetrics::new(),
                hyperparameters,
            },
            trees: Vec::new(),
            n_trees,
            max_depth,
            seed,
            trained: false,
        }
    }

    /// Train the ensemble on the full dataset
    pub fn train(&mut self, dataset: &TrainingDataset) -> Result<ModelMetrics> {
        if dataset.n_samples == 0 {
            return Err(AppError::Training(
                "cannot train on an empty dataset".to_string(),
            ));
        }
        if self.n_trees == 0 {
            return Err(AppError::Training(
                "ensemble must contain at least one tree".to_string(),
            ));
        }

        let labels = dataset.label_indices();
        let n_samples = dataset.n_samples;
        let n_features = dataset.n_features;

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut trees = Vec::with_capacity(self.n_trees);

        for _ in 0..self.n_trees {
            // Bootstrap resample with replacement, one draw per training row
            let mut sample_data = Vec::with_capacity(n_samples * n_features);
            let mut sample_labels = Vec::with_capacity(n_samples);

            for _ in 0..n_samples {
                let idx = rng.gen_range(0..n_samples);
                sample_data.extend(dataset.features.row(idx).iter().copied());
                sample_labels.push(labels[idx] as i32);
            }

            let x = DenseMatrix::new(n_samples, n_features, sample_data, false);

            let mut params =
                DecisionTreeClassifierParameters::default().with_criterion(SplitCriterion::Gini);
            if let Some(depth) = self.max_depth {
                params = params.with_max_depth(depth);
            }

            let tree = DecisionTreeClassifier::fit(&x, &sample_labels, params)
                .map_err(|e| AppError::Training(format!("failed to fit decision tree: {}", e)))?;

            trees.push(tree);
        }

        self.trees = trees;
        self.trained = true;

        let predictions = self.predict(&dataset.features)?;
        let metrics = Self::calculate_metrics(&labels, &predictions);

        self.metadata.n_training_samples = dataset.n_samples;
        self.metadata.n_features = dataset.n_features;
        self.metadata.trained_at = chrono::Utc::now();
        self.metadata.training_metrics = metrics.clone();

        Ok(metrics)
    }

    /// Predict class indices, one per feature row
    ///
    /// Ties between classes resolve to the lowest class index.
    pub fn predict(&self, features: &Array2<f64>) -> Result<Vec<usize>> {
        let proba = self.predict_proba(features)?;

        let predictions = proba
            .rows()
            .into_iter()
            .map(|row| {
                let mut best = 0;
                for (idx, &p) in row.iter().enumerate() {
                    if p > row[best] {
                        best = idx;
                    }
                }
                best
            })
            .collect();

        Ok(predictions)
    }

    /// Predict class probabilities (n_samples × n_classes)
    ///
    /// Each row holds vote fractions over the ensemble and sums to 1.0.
    pub fn predict_proba(&self, features: &Array2<f64>) -> Result<Array2<f64>> {
        if !self.trained {
            return Err(AppError::Internal("Model not trained".to_string()));
        }

        let n_classes = Species::ALL.len();
        let n_samples = features.nrows();
        let x = Self::ndarray_to_densematrix(features);

        let mut proba = Array2::zeros((n_samples, n_classes));

        for tree in &self.trees {
            let votes = tree
                .predict(&x)
                .map_err(|e| AppError::Prediction(format!("tree prediction failed: {}", e)))?;

            for (i, &vote) in votes.iter().enumerate() {
                let class = vote as usize;
                if class < n_classes {
                    proba[[i, class]] += 1.0;
                }
            }
        }

        let n_trees = self.trees.len() as f64;
        proba.mapv_inplace(|v| v / n_trees);

        Ok(proba)
    }

    /// Get model metadata
    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    /// Check if model is trained
    pub fn is_trained(&self) -> bool {
        self.trained
    }

    fn ndarray_to_densematrix(arr: &Array2<f64>) -> DenseMatrix<f64> {
        let shape = arr.shape();
        let data: Vec<f64> = arr.iter().copied().collect();
        DenseMatrix::new(shape[0], shape[1], data, false)
    }

    fn calculate_metrics(y_true: &[usize], y_pred: &[usize]) -> ModelMetrics {
        let n_samples = y_true.len();
        if n_samples == 0 {
            return ModelMetrics::new();
        }

        let n_classes = Species::ALL.len();

        let correct = y_true
            .iter()
            .zip(y_pred.iter())
            .filter(|(t, p)| t == p)
            .count();
        let accuracy = correct as f64 / n_samples as f64;

        let mut per_class = HashMap::new();

        for species in Species::ALL {
            let class_idx = species.index();

            let tp = y_true
                .iter()
                .zip(y_pred.iter())
                .filter(|(t, p)| **t == class_idx && **p == class_idx)
                .count();

            let fp = y_pred
                .iter()
                .zip(y_true.iter())
                .filter(|(p, t)| **p == class_idx && **t != class_idx)
                .count();

            let fn_count = y_true
                .iter()
                .zip(y_pred.iter())
                .filter(|(t, p)| **t == class_idx && **p != class_idx)
                .count();

            let precision = if tp + fp > 0 {
                tp as f64 / (tp + fp) as f64
            } else {
                0.0
            };

            let recall = if tp + fn_count > 0 {
                tp as f64 / (tp + fn_count) as f64
            } else {
                0.0
            };

            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };

            let support = y_true.iter().filter(|&&t| t == class_idx).count();

            per_class.insert(
                species.to_string(),
                ClassMetrics {
                    precision,
                    recall,
                    f1_score: f1,
                    support,
                },
            );
        }

        let avg_precision: f64 =
            per_class.values().map(|m| m.precision).sum::<f64>() / n_classes as f64;
        let avg_recall: f64 = per_class.values().map(|m| m.recall).sum::<f64>() / n_classes as f64;
        let avg_f1: f64 = per_class.values().map(|m| m.f1_score).sum::<f64>() / n_classes as f64;

        ModelMetrics {
            accuracy,
            precision: avg_precision,
            recall: avg_recall,
            f1_score: avg_f1,
            per_class_metrics: per_class,
        }
    }
}

/// Species classifier wrapping the forest for single-sample prediction
pub struct SpeciesClassifier {
    forest: RandomForestClassifier,
}

impl SpeciesClassifier {
    /// Create a new species classifier
    pub fn new(n_trees: usize, max_depth: Option<u16>, seed: u64) -> Self {
        Self {
            forest: RandomForestClassifier::new(n_trees, max_depth, seed),
        }
    }

    /// Train the classifier
    pub fn train(&mut self, dataset: &TrainingDataset) -> Result<ModelMetrics> {
        self.forest.train(dataset)
    }

    /// Predict the species for a single set of measurements
    pub fn predict_species(&self, features: &[f64; 4]) -> Result<Prediction> {
        let features_array = Array2::from_shape_vec((1, features.len()), features.to_vec())
            .map_err(|e| AppError::Prediction(format!("failed to create feature array: {}", e)))?;

        let predictions = self.forest.predict(&features_array)?;
        let proba = self.forest.predict_proba(&features_array)?;

        let pred_idx = predictions[0];
        let species = Species::from_index(pred_idx).ok_or_else(|| {
            AppError::Prediction(format!("prediction produced unknown class index: {}", pred_idx))
        })?;
        let confidence = proba[[0, pred_idx]];

        let probabilities: HashMap<String, f64> = Species::ALL
            .iter()
            .map(|s| (s.to_string(), proba[[0, s.index()]]))
            .collect();

        Ok(Prediction::new(species, confidence).with_probabilities(probabilities))
    }

    /// Check if model is trained
    pub fn is_trained(&self) -> bool {
        self.forest.is_trained()
    }

    /// Get model metadata
    pub fn metadata(&self) -> &ModelMetadata {
        self.forest.metadata()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Three well-separated clusters, ten samples per class
    fn create_test_dataset() -> TrainingDataset {
        let n_samples = 30;
        let mut data = Vec::with_capacity(n_samples * 4);
        let mut labels = Vec::with_capacity(n_samples);

        for i in 0..n_samples {
            let class = i % 3;
            let base = class as f64 * 10.0;
            let jitter = (i / 3) as f64 * 0.1;
            data.extend([base + jitter, base - jitter, base + 1.0, base - 1.0]);
            labels.push(Species::from_index(class).unwrap());
        }

        let features = Array2::from_shape_vec((n_samples, 4), data).unwrap();
        TrainingDataset::new(features, labels).unwrap()
    }

    #[test]
    fn test_forest_trains_on_separable_data() {
        let dataset = create_test_dataset();
        let mut forest = RandomForestClassifier::new(10, None, 42);

        assert!(!forest.is_trained());

        let metrics = forest.train(&dataset).unwrap();

        assert!(forest.is_trained());
        assert!(metrics.accuracy > 0.9);
        assert_eq!(forest.metadata().n_training_samples, 30);
        assert_eq!(forest.metadata().n_features, 4);
    }

    #[test]
    fn test_probabilities_are_vote_fractions() {
        let dataset = create_test_dataset();
        let mut forest = RandomForestClassifier::new(10, None, 42);
        forest.train(&dataset).unwrap();

        let proba = forest.predict_proba(&dataset.features).unwrap();

        for row in proba.rows() {
            let sum: f64 = row.iter().sum();
            assert!((sum - 1.0).abs() < 1e-9);
            for &p in row {
                assert!((0.0..=1.0).contains(&p));
            }
        }
    }

    #[test]
    fn test_same_seed_reproduces_predictions() {
        let dataset = create_test_dataset();

        let mut first = RandomForestClassifier::new(10, None, 7);
        let mut second = RandomForestClassifier::new(10, None, 7);
        first.train(&dataset).unwrap();
        second.train(&dataset).unwrap();

        let proba_first = first.predict_proba(&dataset.features).unwrap();
        let proba_second = second.predict_proba(&dataset.features).unwrap();

        assert_eq!(proba_first, proba_second);
    }

    #[test]
    fn test_untrained_forest_rejects_prediction() {
        let forest = RandomForestClassifier::new(10, None, 42);
        let features = Array2::zeros((1, 4));

        assert!(forest.predict(&features).is_err());
        assert!(forest.predict_proba(&features).is_err());
    }

    #[test]
    fn test_zero_trees_rejected() {
        let dataset = create_test_dataset();
        let mut forest = RandomForestClassifier::new(0, None, 42);

        assert!(forest.train(&dataset).is_err());
    }

    #[test]
    fn test_species_classifier_prediction() {
        let dataset = create_test_dataset();
        let mut classifier = SpeciesClassifier::new(10, None, 42);
        classifier.train(&dataset).unwrap();

        let prediction = classifier.predict_species(&[0.0, 0.0, 1.0, -1.0]).unwrap();

        assert_eq!(prediction.species, Species::Setosa);
        assert!(prediction.confidence >= 0.0 && prediction.confidence <= 1.0);
        assert_eq!(prediction.probabilities.len(), 3);

        let sum: f64 = prediction.probabilities.values().sum();
        assert!((sum - 1.0).abs() < 1e-9);

        let max = prediction
            .probabilities
            .values()
            .cloned()
            .fold(f64::MIN, f64::max);
        assert_eq!(prediction.confidence, max);
    }
}

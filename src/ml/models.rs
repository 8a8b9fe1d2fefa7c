use crate::error::{AppError, Result};
use crate::models::Species;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Prediction result with confidence score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted species
    pub species: Species,

    /// Confidence score (0.0 - 1.0), the ensemble probability of the
    /// predicted species
    pub confidence: f64,

    /// All class probabilities, keyed by species label
    pub probabilities: HashMap<String, f64>,
}

impl Prediction {
    pub fn new(species: Species, confidence: f64) -> Self {
        Self {
            species,
            confidence,
            probabilities: HashMap::new(),
        }
    }

    pub fn with_probabilities(mut self, probabilities: HashMap<String, f64>) -> Self {
        self.probabilities = probabilities;
        self
    }
}

/// Training dataset
#[derive(Debug, Clone)]
pub struct TrainingDataset {
    /// Feature matrix (n_samples × n_features)
    pub features: Array2<f64>,

    /// Species labels, one per row of `features`
    pub labels: Vec<Species>,

    /// Number of samples
    pub n_samples: usize,

    /// Number of features
    pub n_features: usize,
}

impl TrainingDataset {
    /// Create a training dataset, checking that labels line up with the
    /// feature rows
    pub fn new(features: Array2<f64>, labels: Vec<Species>) -> Result<Self> {
        let n_samples = features.nrows();
        let n_features = features.ncols();

        if labels.len() != n_samples {
            return Err(AppError::Dataset(format!(
                "label count {} does not match sample count {}",
                labels.len(),
                n_samples
            )));
        }

        Ok(Self {
            features,
            labels,
            n_samples,
            n_features,
        })
    }

    /// Labels as class indices
    pub fn label_indices(&self) -> Vec<usize> {
        self.labels.iter().map(|s| s.index()).collect()
    }
}

/// Model evaluation metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetrics {
    /// Accuracy
    pub accuracy: f64,

    /// Macro-averaged precision
    pub precision: f64,

    /// Macro-averaged recall
    pub recall: f64,

    /// Macro-averaged F1 score
    pub f1_score: f64,

    /// Per-class metrics, keyed by species label
    pub per_class_metrics: HashMap<String, ClassMetrics>,
}

/// Per-class evaluation metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub support: usize,
}

impl ModelMetrics {
    pub fn new() -> Self {
        Self {
            accuracy: 0.0,
            precision: 0.0,
            recall: 0.0,
            f1_score: 0.0,
            per_class_metrics: HashMap::new(),
        }
    }
}

impl Default for ModelMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Model metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Model name
    pub name: String,

    /// Training timestamp
    pub trained_at: chrono::DateTime<chrono::Utc>,

    /// Number of training samples
    pub n_training_samples: usize,

    /// Number of features
    pub n_features: usize,

    /// Training metrics
    pub training_metrics: ModelMetrics,

    /// Hyperparameters
    pub hyperparameters: HashMap<String, String>,
}

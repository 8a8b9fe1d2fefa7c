/// Machine learning module for iris species classification
///
/// This module provides the classification pipeline behind the API:
/// - Loading the bundled Fisher iris dataset
/// - A seeded random forest built from bagged decision trees
/// - Training metrics and model metadata
/// - A service wrapper trained once at startup

pub mod classifier;
pub mod dataset;
pub mod models;
pub mod service;

pub use classifier::{RandomForestClassifier, SpeciesClassifier};
pub use dataset::load_training_dataset;
pub use models::{ModelMetadata, ModelMetrics, Prediction, TrainingDataset};
pub use service::ClassifierService;

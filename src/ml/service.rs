use crate::config::ModelConfig;
use crate::error::Result;
use crate::ml::classifier::SpeciesClassifier;
use crate::ml::dataset::load_training_dataset;
use crate::ml::models::{ModelMetadata, Prediction};
use crate::models::IrisMeasurements;
use tracing::info;

/// Classifier service holding the model trained at startup
///
/// The model is fit once from the bundled dataset and never retrained, so the
/// service is immutable and safe to share across request handlers.
pub struct ClassifierService {
    classifier: SpeciesClassifier,
}

impl ClassifierService {
    /// Load the bundled dataset and train the classifier
    pub fn train(config: &ModelConfig) -> Result<Self> {
        let dataset = load_training_dataset()?;

        info!(
            "Training species classifier on {} samples ({} trees, seed {})",
            dataset.n_samples, config.n_trees, config.seed
        );

        let mut classifier = SpeciesClassifier::new(config.n_trees, config.max_depth, config.seed);
        let metrics = classifier.train(&dataset)?;

        info!(
            "Species classifier trained successfully - Accuracy: {:.2}%",
            metrics.accuracy * 100.0
        );

        Ok(Self { classifier })
    }

    /// Classify a single iris sample
    pub fn classify(&self, measurements: &IrisMeasurements) -> Result<Prediction> {
        self.classifier.predict_species(&measurements.as_features())
    }

    /// Get model metadata
    pub fn metadata(&self) -> &ModelMetadata {
        self.classifier.metadata()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Species;

    #[test]
    fn test_service_trains_on_bundled_dataset() {
        let service = ClassifierService::train(&ModelConfig::default()).unwrap();

        let metadata = service.metadata();
        assert_eq!(metadata.n_training_samples, 150);
        assert_eq!(metadata.n_features, 4);
        assert!(metadata.training_metrics.accuracy >= 0.9);
    }

    #[test]
    fn test_classify_canonical_setosa() {
        let service = ClassifierService::train(&ModelConfig::default()).unwrap();

        let prediction = service.classify(&IrisMeasurements::EXAMPLE).unwrap();

        assert_eq!(prediction.species, Species::Setosa);
        assert!(prediction.confidence >= 0.5);
    }

    #[test]
    fn test_classify_known_samples() {
        let service = ClassifierService::train(&ModelConfig::default()).unwrap();

        let virginica = IrisMeasurements {
            sepal_length: 6.3,
            sepal_width: 3.3,
            petal_length: 6.0,
            petal_width: 2.5,
        };
        let prediction = service.classify(&virginica).unwrap();
        assert_eq!(prediction.species, Species::Virginica);

        let versicolor = IrisMeasurements {
            sepal_length: 5.7,
            sepal_width: 2.8,
            petal_length: 4.1,
            petal_width: 1.3,
        };
        let prediction = service.classify(&versicolor).unwrap();
        assert_eq!(prediction.species, Species::Versicolor);
    }

    #[test]
    fn test_training_is_reproducible() {
        let config = ModelConfig::default();
        let first = ClassifierService::train(&config).unwrap();
        let second = ClassifierService::train(&config).unwrap();

        let prediction_first = first.classify(&IrisMeasurements::EXAMPLE).unwrap();
        let prediction_second = second.classify(&IrisMeasurements::EXAMPLE).unwrap();

        assert_eq!(prediction_first.species, prediction_second.species);
        assert_eq!(prediction_first.confidence, prediction_second.confidence);
        assert_eq!(prediction_first.probabilities, prediction_second.probabilities);
    }
}

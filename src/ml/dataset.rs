use crate::error::{AppError, Result};
use crate::ml::models::TrainingDataset;
use crate::models::Species;
use ndarray::Array2;
use smartcore::dataset::iris;

/// Load the bundled Fisher iris dataset as a training dataset
///
/// The dataset ships with smartcore: 150 samples, 4 measurements each, class
/// indices 0/1/2 for setosa/versicolor/virginica. Measurements are widened to
/// f64 to match the classifier's feature type.
pub fn load_training_dataset() -> Result<TrainingDataset> {
    let raw = iris::load_dataset();

    let data: Vec<f64> = raw.data.iter().map(|&v| f64::from(v)).collect();
    let features = Array2::from_shape_vec((raw.num_samples, raw.num_features), data)
        .map_err(|e| AppError::Dataset(format!("invalid iris feature matrix: {}", e)))?;

    let labels: Vec<Species> = raw
        .target
        .iter()
        .map(|&t| {
            Species::from_index(t as usize)
                .ok_or_else(|| AppError::Dataset(format!("unknown iris class index: {}", t)))
        })
        .collect::<Result<_>>()?;

    TrainingDataset::new(features, labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_training_dataset_shape() {
        let dataset = load_training_dataset().unwrap();

        assert_eq!(dataset.n_samples, 150);
        assert_eq!(dataset.n_features, 4);
        assert_eq!(dataset.labels.len(), 150);
    }

    #[test]
    fn test_all_species_present() {
        let dataset = load_training_dataset().unwrap();

        for species in Species::ALL {
            let count = dataset.labels.iter().filter(|&&l| l == species).count();
            assert_eq!(count, 50, "expected 50 samples of {}", species);
        }
    }

    #[test]
    fn test_first_sample_is_canonical_setosa() {
        let dataset = load_training_dataset().unwrap();

        let row = dataset.features.row(0);
        assert!((row[0] - 5.1).abs() < 1e-6);
        assert!((row[1] - 3.5).abs() < 1e-6);
        assert!((row[2] - 1.4).abs() < 1e-6);
        assert!((row[3] - 0.2).abs() < 1e-6);
        assert_eq!(dataset.labels[0], Species::Setosa);
    }
}

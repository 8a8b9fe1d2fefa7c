use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Iris species predicted by the classifier
///
/// The discriminants match the class indices used by the bundled training
/// dataset (0 = setosa, 1 = versicolor, 2 = virginica).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, EnumString, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Species {
    Setosa,
    Versicolor,
    Virginica,
}

impl Species {
    /// All species in class-index order
    pub const ALL: [Species; 3] = [Species::Setosa, Species::Versicolor, Species::Virginica];

    /// Class index of this species in the training dataset
    pub fn index(&self) -> usize {
        match self {
            Species::Setosa => 0,
            Species::Versicolor => 1,
            Species::Virginica => 2,
        }
    }

    /// Species for a dataset class index
    pub fn from_index(index: usize) -> Option<Species> {
        match index {
            0 => Some(Species::Setosa),
            1 => Some(Species::Versicolor),
            2 => Some(Species::Virginica),
            _ => None,
        }
    }
}

/// One iris sample: the four measurements, in centimetres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IrisMeasurements {
    /// Sepal length
    pub sepal_length: f64,

    /// Sepal width
    pub sepal_width: f64,

    /// Petal length
    pub petal_length: f64,

    /// Petal width
    pub petal_width: f64,
}

impl IrisMeasurements {
    /// The example payload documented on the root endpoint (an Iris setosa
    /// sample, the first row of the reference dataset)
    pub const EXAMPLE: IrisMeasurements = IrisMeasurements {
        sepal_length: 5.1,
        sepal_width: 3.5,
        petal_length: 1.4,
        petal_width: 0.2,
    };

    /// Feature vector in the column order the classifier was trained on
    pub fn as_features(&self) -> [f64; 4] {
        [
            self.sepal_length,
            self.sepal_width,
            self.petal_length,
            self.petal_width,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_species_index_round_trip() {
        for species in Species::ALL {
            assert_eq!(Species::from_index(species.index()), Some(species));
        }
        assert_eq!(Species::from_index(3), None);
    }

    #[test]
    fn test_species_labels() {
        assert_eq!(Species::Setosa.to_string(), "setosa");
        assert_eq!(Species::Versicolor.to_string(), "versicolor");
        assert_eq!(Species::Virginica.to_string(), "virginica");

        let parsed: Species = "virginica".parse().unwrap();
        assert_eq!(parsed, Species::Virginica);
    }

    #[test]
    fn test_species_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Species::Setosa).unwrap(),
            "\"setosa\""
        );
    }

    #[test]
    fn test_feature_order() {
        let features = IrisMeasurements::EXAMPLE.as_features();
        assert_eq!(features, [5.1, 3.5, 1.4, 0.2]);
    }
}

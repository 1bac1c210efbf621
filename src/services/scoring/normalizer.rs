use crate::models::Listing;

use super::ScoringError;

/// Number of numeric listing attributes used for content scoring
pub const FEATURE_COUNT: usize = 4;

/// One value per [`Feature`], in [`Feature::ALL`] order
pub type FeatureVector = [f64; FEATURE_COUNT];

/// Numeric listing attributes compared by the content scorer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Price,
    Bedrooms,
    Bathrooms,
    Area,
}

impl Feature {
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::Price,
        Feature::Bedrooms,
        Feature::Bathrooms,
        Feature::Area,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Feature::Price => "price",
            Feature::Bedrooms => "bedrooms",
            Feature::Bathrooms => "bathrooms",
            Feature::Area => "area",
        }
    }

    /// Reads this feature from a listing, treating a missing value as zero
    fn value_of(&self, listing: &Listing) -> f64 {
        match self {
            Feature::Price => listing.price,
            Feature::Bedrooms => listing.bedrooms.map(f64::from).unwrap_or(0.0),
            Feature::Bathrooms => listing.bathrooms.map(f64::from).unwrap_or(0.0),
            Feature::Area => listing.area.unwrap_or(0.0),
        }
    }
}

/// Extracts the raw feature vector of a listing
pub fn feature_vector(listing: &Listing) -> Result<FeatureVector, ScoringError> {
    let mut vector = [0.0; FEATURE_COUNT];
    for (slot, feature) in vector.iter_mut().zip(Feature::ALL) {
        let value = feature.value_of(listing);
        if !value.is_finite() {
            return Err(ScoringError::NonFiniteFeature {
                listing_id: listing.id,
                field: feature.name(),
            });
        }
        *slot = value;
    }
    Ok(vector)
}

/// Per-feature standardization fitted on a catalog snapshot
///
/// A standard score is `(x - mean) / std` with the population standard
/// deviation. Features that are constant across the fitted rows have a
/// recorded deviation of zero and always standardize to `0.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureNormalizer {
    mean: FeatureVector,
    std: FeatureVector,
}

impl FeatureNormalizer {
    /// Computes mean and standard deviation for each feature column
    ///
    /// Fitting zero rows yields all-zero statistics.
    pub fn fit(rows: &[FeatureVector]) -> Self {
        let mut mean = [0.0; FEATURE_COUNT];
        let mut std = [0.0; FEATURE_COUNT];

        let Some(first) = rows.first() else {
            return Self { mean, std };
        };
        let count = rows.len() as f64;

        for column in 0..FEATURE_COUNT {
            mean[column] = rows.iter().map(|row| row[column]).sum::<f64>() / count;

            // Exact comparison: rounding in the mean must not turn a constant
            // column into a tiny non-zero deviation.
            if rows.iter().all(|row| row[column] == first[column]) {
                continue;
            }

            let variance = rows
                .iter()
                .map(|row| (row[column] - mean[column]).powi(2))
                .sum::<f64>()
                / count;
            std[column] = variance.sqrt();
        }

        Self { mean, std }
    }

    /// Fits on a catalog and returns the standardized rows in catalog order
    pub fn fit_transform<'a, I>(catalog: I) -> Result<(Self, Vec<FeatureVector>), ScoringError>
    where
        I: IntoIterator<Item = &'a Listing>,
    {
        let raw = catalog
            .into_iter()
            .map(feature_vector)
            .collect::<Result<Vec<_>, _>>()?;

        let normalizer = Self::fit(&raw);
        let standardized = raw.iter().map(|row| normalizer.transform(row)).collect();

        Ok((normalizer, standardized))
    }

    /// Standardizes a vector with the fitted statistics
    pub fn transform(&self, vector: &FeatureVector) -> FeatureVector {
        let mut out = [0.0; FEATURE_COUNT];
        for column in 0..FEATURE_COUNT {
            if self.std[column] > 0.0 {
                out[column] = (vector[column] - self.mean[column]) / self.std[column];
            }
        }
        out
    }

    pub fn mean(&self) -> &FeatureVector {
        &self.mean
    }

    pub fn std(&self) -> &FeatureVector {
        &self.std
    }
}

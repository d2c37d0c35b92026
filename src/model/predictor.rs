//! Load-or-train wrapper around the fitted scaler and forest.

use super::error::ModelResult;
use super::forest::{ForestConfig, RandomForest, RankedFeature};
use super::record::PatientRecord;
use super::scaler::StandardScaler;
use super::store::{ModelStore, TrainingMetadata};
use super::synth::{generate_cohort, stratified_split, CohortConfig};

/// Knobs for a training run. Defaults reproduce the shipped model.
#[derive(Debug, Clone, Copy)]
pub struct TrainingOptions {
    pub cohort: CohortConfig,
    pub forest: ForestConfig,
    pub test_fraction: f64,
}

impl Default for TrainingOptions {
    fn default() -> Self {
        Self {
            cohort: CohortConfig::default(),
            forest: ForestConfig::default(),
            test_fraction: 0.2,
        }
    }
}

/// Immutable fitted model state. Built once at startup and shared read-only
/// with every request handler.
#[derive(Debug, Clone)]
pub struct RiskPredictor {
    scaler: StandardScaler,
    forest: RandomForest,
    metadata: TrainingMetadata,
}

impl RiskPredictor {
    /// Load the persisted artifacts, or train and persist a fresh pair when
    /// they are absent or unusable (corrupt, or fitted on another layout).
    pub fn load_or_train(store: &ModelStore) -> ModelResult<Self> {
        if store.exists() {
            match store.load() {
                Ok((scaler, forest, metadata)) => {
                    tracing::info!(
                        trees = forest.tree_count(),
                        accuracy = metadata.accuracy,
                        "loaded model artifacts from {}",
                        store.dir().display()
                    );
                    return Ok(Self {
                        scaler,
                        forest,
                        metadata,
                    });
                }
                Err(err) => {
                    tracing::warn!("persisted artifacts unusable ({err}), retraining");
                }
            }
        } else {
            tracing::info!("no model artifacts in {}, training", store.dir().display());
        }
        Self::train(store, &TrainingOptions::default())
    }

    /// Full training pipeline: synthetic cohort, stratified split, scaler fit
    /// on the training split, forest fit, held-out evaluation, persistence.
    pub fn train(store: &ModelStore, options: &TrainingOptions) -> ModelResult<Self> {
        let cohort = generate_cohort(&options.cohort)?;
        let (train, test) = stratified_split(&cohort, options.test_fraction, options.cohort.seed);

        let scaler = StandardScaler::fit(&train.rows)?;
        let train_scaled = scaler.transform_rows(&train.rows);
        let forest = RandomForest::fit(&train_scaled, &train.labels, options.forest)?;

        let test_scaled = scaler.transform_rows(&test.rows);
        let correct = test_scaled
            .iter()
            .zip(test.labels.iter())
            .filter(|(row, &label)| {
                let predicted = u8::from(forest.predict_probability(row) >= 0.5);
                predicted == label
            })
            .count();
        let accuracy = correct as f64 / test.len().max(1) as f64;

        let metadata = TrainingMetadata {
            trained_at: chrono::Utc::now(),
            accuracy,
            n_samples: cohort.len(),
            n_train: train.len(),
            n_test: test.len(),
        };
        store.save(&scaler, &forest, &metadata)?;

        tracing::info!(
            accuracy,
            n_train = train.len(),
            n_test = test.len(),
            trees = forest.tree_count(),
            "model trained and persisted to {}",
            store.dir().display()
        );

        Ok(Self {
            scaler,
            forest,
            metadata,
        })
    }

    /// Class-1 probability for one patient, rounded to 4 decimal places.
    pub fn predict(&self, record: &PatientRecord) -> f64 {
        let scaled = self.scaler.transform(&record.to_values());
        round4(self.forest.predict_probability(&scaled))
    }

    /// Full descending importance ranking over the 13 features.
    pub fn feature_importance(&self) -> Vec<RankedFeature> {
        self.forest.ranked_importances()
    }

    pub fn metadata(&self) -> &TrainingMetadata {
        &self.metadata
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

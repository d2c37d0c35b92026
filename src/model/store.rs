//! Artifact persistence for the fitted scaler and forest.
//!
//! Two bincode files under the model directory. Each artifact records the
//! feature layout version and hash it was trained with; a mismatch on load
//! is rejected so a stale artifact can never be applied to reordered
//! features.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::ModelResult;
use super::forest::RandomForest;
use super::layout::{layout_hash, validate_layout, LAYOUT_VERSION};
use super::scaler::StandardScaler;

const FOREST_FILE: &str = "forest.bin";
const SCALER_FILE: &str = "scaler.bin";

/// Facts about the training run, persisted alongside the forest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingMetadata {
    pub trained_at: DateTime<Utc>,
    /// Accuracy on the held-out split at the 0.5 cutoff.
    pub accuracy: f64,
    pub n_samples: usize,
    pub n_train: usize,
    pub n_test: usize,
}

#[derive(Debug, Serialize, Deserialize)]
struct ScalerArtifact {
    layout_version: u8,
    layout_hash: u32,
    scaler: StandardScaler,
}

#[derive(Debug, Serialize, Deserialize)]
struct ForestArtifact {
    layout_version: u8,
    layout_hash: u32,
    forest: RandomForest,
    metadata: TrainingMetadata,
}

/// Disk location of the model artifact pair.
#[derive(Debug, Clone)]
pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn forest_path(&self) -> PathBuf {
        self.dir.join(FOREST_FILE)
    }

    pub fn scaler_path(&self) -> PathBuf {
        self.dir.join(SCALER_FILE)
    }

    /// Both artifact files exist on disk.
    pub fn exists(&self) -> bool {
        self.forest_path().is_file() && self.scaler_path().is_file()
    }

    /// Persist the fitted pair, creating the directory if needed.
    pub fn save(
        &self,
        scaler: &StandardScaler,
        forest: &RandomForest,
        metadata: &TrainingMetadata,
    ) -> ModelResult<()> {
        fs::create_dir_all(&self.dir)?;

        let scaler_artifact = ScalerArtifact {
            layout_version: LAYOUT_VERSION,
            layout_hash: layout_hash(),
            scaler: scaler.clone(),
        };
        fs::write(self.scaler_path(), bincode::serialize(&scaler_artifact)?)?;

        let forest_artifact = ForestArtifact {
            layout_version: LAYOUT_VERSION,
            layout_hash: layout_hash(),
            forest: forest.clone(),
            metadata: metadata.clone(),
        };
        fs::write(self.forest_path(), bincode::serialize(&forest_artifact)?)?;

        Ok(())
    }

    /// Load and validate the artifact pair.
    pub fn load(&self) -> ModelResult<(StandardScaler, RandomForest, TrainingMetadata)> {
        let scaler_bytes = fs::read(self.scaler_path())?;
        let scaler_artifact: ScalerArtifact = bincode::deserialize(&scaler_bytes)?;
        validate_layout(scaler_artifact.layout_version, scaler_artifact.layout_hash)?;
        scaler_artifact.scaler.check_width()?;

        let forest_bytes = fs::read(self.forest_path())?;
        let forest_artifact: ForestArtifact = bincode::deserialize(&forest_bytes)?;
        validate_layout(forest_artifact.layout_version, forest_artifact.layout_hash)?;

        Ok((
            scaler_artifact.scaler,
            forest_artifact.forest,
            forest_artifact.metadata,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::error::ModelError;
    use crate::model::forest::ForestConfig;
    use crate::model::layout::FEATURE_COUNT;

    fn fitted_pair() -> (StandardScaler, RandomForest) {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for i in 0..40 {
            let mut row = [0.0; FEATURE_COUNT];
            row[0] = i as f64;
            rows.push(row);
            labels.push(u8::from(i >= 20));
        }
        let scaler = StandardScaler::fit(&rows).unwrap();
        let forest = RandomForest::fit(
            &scaler.transform_rows(&rows),
            &labels,
            ForestConfig {
                n_trees: 5,
                max_depth: 3,
                min_samples_split: 2,
                min_samples_leaf: 1,
                seed: 42,
            },
        )
        .unwrap();
        (scaler, forest)
    }

    fn metadata() -> TrainingMetadata {
        TrainingMetadata {
            trained_at: Utc::now(),
            accuracy: 0.9,
            n_samples: 40,
            n_train: 32,
            n_test: 8,
        }
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path());
        assert!(!store.exists());

        let (scaler, forest) = fitted_pair();
        store.save(&scaler, &forest, &metadata()).unwrap();
        assert!(store.exists());

        let (loaded_scaler, loaded_forest, loaded_metadata) = store.load().unwrap();
        assert_eq!(loaded_scaler, scaler);
        assert_eq!(loaded_forest.tree_count(), forest.tree_count());
        assert_eq!(loaded_metadata.n_samples, 40);

        let mut probe = [0.0; FEATURE_COUNT];
        probe[0] = 30.0;
        let scaled = scaler.transform(&probe);
        assert_eq!(
            loaded_forest.predict_probability(&scaled),
            forest.predict_probability(&scaled)
        );
    }

    #[test]
    fn test_load_missing_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path().join("nope"));
        assert!(matches!(store.load(), Err(ModelError::Io(_))));
    }

    #[test]
    fn test_load_rejects_corrupt_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path());
        let (scaler, forest) = fitted_pair();
        store.save(&scaler, &forest, &metadata()).unwrap();

        std::fs::write(store.scaler_path(), b"not an artifact").unwrap();
        assert!(matches!(store.load(), Err(ModelError::Codec(_))));
    }
}

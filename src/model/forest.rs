//! Bagged random forest over CART trees.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::error::{ModelError, ModelResult};
use super::layout::{feature_name, FEATURE_COUNT};
use super::tree::{DecisionTree, TreeParams};

/// Forest hyperparameters. Defaults match the shipped model: 100 trees,
/// depth 10, split 5, leaf 2, sqrt(13) candidate features, seed 42.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ForestConfig {
    pub n_trees: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 10,
            min_samples_split: 5,
            min_samples_leaf: 2,
            seed: 42,
        }
    }
}

impl ForestConfig {
    fn tree_params(&self) -> TreeParams {
        TreeParams {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
            max_features: (FEATURE_COUNT as f64).sqrt().floor().max(1.0) as usize,
        }
    }
}

/// One feature with its normalized importance value.
#[derive(Debug, Clone, Serialize)]
pub struct RankedFeature {
    pub feature: &'static str,
    pub importance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    importances: Vec<f64>,
    config: ForestConfig,
}

impl RandomForest {
    /// Fit the forest on (already standardized) rows. Tree `t` bootstraps
    /// and splits with its own `StdRng` seeded from `config.seed + t`, so a
    /// given configuration always grows the same forest.
    pub fn fit(
        rows: &[[f64; FEATURE_COUNT]],
        labels: &[u8],
        config: ForestConfig,
    ) -> ModelResult<Self> {
        if rows.is_empty() || rows.len() != labels.len() {
            return Err(ModelError::EmptyTrainingSet);
        }

        let params = config.tree_params();
        let n = rows.len();
        let mut trees = Vec::with_capacity(config.n_trees);
        let mut importance_sum = [0.0; FEATURE_COUNT];

        for t in 0..config.n_trees {
            let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(t as u64));
            let sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();

            let mut tree_importances = [0.0; FEATURE_COUNT];
            let tree = DecisionTree::fit(
                rows,
                labels,
                sample,
                &params,
                &mut rng,
                &mut tree_importances,
            );
            trees.push(tree);

            // normalize per tree before averaging
            let total: f64 = tree_importances.iter().sum();
            if total > 0.0 {
                for (sum, value) in importance_sum.iter_mut().zip(tree_importances.iter()) {
                    *sum += value / total;
                }
            }
        }

        let mut importances: Vec<f64> = importance_sum
            .iter()
            .map(|v| v / config.n_trees as f64)
            .collect();
        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            for value in &mut importances {
                *value /= total;
            }
        }

        Ok(Self {
            trees,
            importances,
            config,
        })
    }

    /// Class-1 probability: mean of the per-tree leaf probabilities.
    pub fn predict_probability(&self, features: &[f64; FEATURE_COUNT]) -> f64 {
        let sum: f64 = self
            .trees
            .iter()
            .map(|tree| tree.predict_probability(features))
            .sum();
        sum / self.trees.len() as f64
    }

    /// Normalized mean-decrease-in-impurity per feature, in layout order.
    pub fn importances(&self) -> &[f64] {
        &self.importances
    }

    /// Full importance ranking, descending.
    pub fn ranked_importances(&self) -> Vec<RankedFeature> {
        let mut ranking: Vec<RankedFeature> = self
            .importances
            .iter()
            .enumerate()
            .filter_map(|(i, &importance)| {
                feature_name(i).map(|feature| RankedFeature {
                    feature,
                    importance,
                })
            })
            .collect();
        ranking.sort_by(|a, b| b.importance.total_cmp(&a.importance));
        ranking
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> ForestConfig {
        ForestConfig {
            n_trees: 10,
            max_depth: 4,
            min_samples_split: 2,
            min_samples_leaf: 1,
            seed: 42,
        }
    }

    /// Class depends on features 0 and 1; feature 2 varies but is uninformative.
    fn dataset() -> (Vec<[f64; FEATURE_COUNT]>, Vec<u8>) {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for i in 0..60 {
            let mut row = [0.0; FEATURE_COUNT];
            row[0] = (i % 10) as f64;
            row[1] = (i % 7) as f64;
            row[2] = (i % 3) as f64;
            let label = u8::from(row[0] + row[1] > 8.0);
            rows.push(row);
            labels.push(label);
        }
        (rows, labels)
    }

    #[test]
    fn test_fit_rejects_empty() {
        assert!(matches!(
            RandomForest::fit(&[], &[], small_config()),
            Err(ModelError::EmptyTrainingSet)
        ));
    }

    #[test]
    fn test_probability_in_unit_interval() {
        let (rows, labels) = dataset();
        let forest = RandomForest::fit(&rows, &labels, small_config()).unwrap();
        for row in &rows {
            let p = forest.predict_probability(row);
            assert!((0.0..=1.0).contains(&p), "probability {p} outside [0,1]");
        }
    }

    #[test]
    fn test_same_seed_same_forest() {
        let (rows, labels) = dataset();
        let a = RandomForest::fit(&rows, &labels, small_config()).unwrap();
        let b = RandomForest::fit(&rows, &labels, small_config()).unwrap();
        for row in rows.iter().take(10) {
            assert_eq!(a.predict_probability(row), b.predict_probability(row));
        }
    }

    #[test]
    fn test_different_seed_differs() {
        let (rows, labels) = dataset();
        let a = RandomForest::fit(&rows, &labels, small_config()).unwrap();
        let b = RandomForest::fit(
            &rows,
            &labels,
            ForestConfig {
                seed: 7,
                ..small_config()
            },
        )
        .unwrap();
        let diverged = rows
            .iter()
            .any(|row| a.predict_probability(row) != b.predict_probability(row));
        assert!(diverged);
    }

    #[test]
    fn test_importances_sum_to_one() {
        let (rows, labels) = dataset();
        let forest = RandomForest::fit(&rows, &labels, small_config()).unwrap();
        let sum: f64 = forest.importances().iter().sum();
        assert!((sum - 1.0).abs() < 1e-9, "importance sum {sum}");
        assert!(forest.importances().iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn test_ranking_is_complete_and_descending() {
        let (rows, labels) = dataset();
        let forest = RandomForest::fit(&rows, &labels, small_config()).unwrap();
        let ranking = forest.ranked_importances();
        assert_eq!(ranking.len(), FEATURE_COUNT);
        for pair in ranking.windows(2) {
            assert!(pair[0].importance >= pair[1].importance);
        }
        // the informative features outrank the constant ones
        assert!(ranking[0].feature == "age" || ranking[0].feature == "sex");
    }
}

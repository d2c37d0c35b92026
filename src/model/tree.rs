//! CART decision tree with Gini splits.
//!
//! Trees are grown on bootstrap samples by the forest and are not exposed
//! outside the model module. Nodes live in a flat arena so the fitted tree
//! serializes as plain data.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::layout::FEATURE_COUNT;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Node {
    /// Terminal node holding the class-1 fraction of its training samples.
    Leaf { probability: f64 },
    /// Binary split: `feature <= threshold` goes left.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Growth limits shared by every tree in a forest.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TreeParams {
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Candidate features considered per split.
    pub max_features: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
    root: usize,
}

/// Gini impurity of a binary node.
fn gini(positives: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let p = positives as f64 / total as f64;
    1.0 - p * p - (1.0 - p) * (1.0 - p)
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    gain: f64,
    left: Vec<usize>,
    right: Vec<usize>,
    gini_left: f64,
    gini_right: f64,
}

impl DecisionTree {
    /// Grow a tree over `sample` (indices into `rows`). Split contributions
    /// to mean-decrease-in-impurity are accumulated into `importances`.
    pub fn fit(
        rows: &[[f64; FEATURE_COUNT]],
        labels: &[u8],
        sample: Vec<usize>,
        params: &TreeParams,
        rng: &mut StdRng,
        importances: &mut [f64; FEATURE_COUNT],
    ) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            root: 0,
        };
        let n_root = sample.len();
        tree.root = tree.grow(rows, labels, sample, 0, n_root, params, rng, importances);
        tree
    }

    #[allow(clippy::too_many_arguments)]
    fn grow(
        &mut self,
        rows: &[[f64; FEATURE_COUNT]],
        labels: &[u8],
        sample: Vec<usize>,
        depth: usize,
        n_root: usize,
        params: &TreeParams,
        rng: &mut StdRng,
        importances: &mut [f64; FEATURE_COUNT],
    ) -> usize {
        let n = sample.len();
        let positives = sample.iter().filter(|&&i| labels[i] == 1).count();
        let probability = positives as f64 / n as f64;

        let is_pure = positives == 0 || positives == n;
        if depth >= params.max_depth || n < params.min_samples_split || is_pure {
            return self.push(Node::Leaf { probability });
        }

        let node_gini = gini(positives, n);
        let split = match best_split(rows, labels, &sample, node_gini, params, rng) {
            Some(split) => split,
            None => return self.push(Node::Leaf { probability }),
        };

        let node_weight = n as f64 / n_root as f64;
        let left_weight = split.left.len() as f64 / n_root as f64;
        let right_weight = split.right.len() as f64 / n_root as f64;
        importances[split.feature] +=
            node_weight * node_gini - left_weight * split.gini_left - right_weight * split.gini_right;

        let feature = split.feature;
        let threshold = split.threshold;
        let left = self.grow(
            rows, labels, split.left, depth + 1, n_root, params, rng, importances,
        );
        let right = self.grow(
            rows, labels, split.right, depth + 1, n_root, params, rng, importances,
        );
        self.push(Node::Split {
            feature,
            threshold,
            left,
            right,
        })
    }

    fn push(&mut self, node: Node) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Class-1 probability at the leaf this feature vector falls into.
    pub fn predict_probability(&self, features: &[f64; FEATURE_COUNT]) -> f64 {
        let mut index = self.root;
        loop {
            match &self.nodes[index] {
                Node::Leaf { probability } => return *probability,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Exhaustive threshold search over a random feature subset.
fn best_split(
    rows: &[[f64; FEATURE_COUNT]],
    labels: &[u8],
    sample: &[usize],
    node_gini: f64,
    params: &TreeParams,
    rng: &mut StdRng,
) -> Option<BestSplit> {
    let n = sample.len();
    if n < 2 * params.min_samples_leaf.max(1) {
        return None;
    }
    let all_features: Vec<usize> = (0..FEATURE_COUNT).collect();
    let candidates: Vec<usize> = all_features
        .choose_multiple(rng, params.max_features.max(1))
        .copied()
        .collect();

    let mut best: Option<BestSplit> = None;

    for &feature in &candidates {
        let mut ordered: Vec<usize> = sample.to_vec();
        ordered.sort_by(|&a, &b| rows[a][feature].total_cmp(&rows[b][feature]));

        // prefix positives over the ordered sample
        let mut prefix = Vec::with_capacity(n + 1);
        let mut running = 0usize;
        prefix.push(0);
        for &i in &ordered {
            running += usize::from(labels[i] == 1);
            prefix.push(running);
        }
        let total_positives = running;

        let min_leaf = params.min_samples_leaf.max(1);
        for cut in min_leaf..=(n - min_leaf) {
            let lo = rows[ordered[cut - 1]][feature];
            let hi = rows[ordered[cut]][feature];
            if lo == hi {
                continue;
            }

            let left_pos = prefix[cut];
            let gini_left = gini(left_pos, cut);
            let gini_right = gini(total_positives - left_pos, n - cut);
            let weighted =
                (cut as f64 / n as f64) * gini_left + ((n - cut) as f64 / n as f64) * gini_right;
            let gain = node_gini - weighted;

            if gain > 1e-12 && best.as_ref().map_or(true, |b| gain > b.gain) {
                best = Some(BestSplit {
                    feature,
                    threshold: (lo + hi) / 2.0,
                    gain,
                    left: ordered[..cut].to_vec(),
                    right: ordered[cut..].to_vec(),
                    gini_left,
                    gini_right,
                });
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn params() -> TreeParams {
        TreeParams {
            max_depth: 5,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: FEATURE_COUNT,
        }
    }

    /// Labels perfectly separable on feature 0.
    fn separable() -> (Vec<[f64; FEATURE_COUNT]>, Vec<u8>) {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for i in 0..20 {
            let mut row = [0.0; FEATURE_COUNT];
            row[0] = i as f64;
            rows.push(row);
            labels.push(u8::from(i >= 10));
        }
        (rows, labels)
    }

    #[test]
    fn test_fits_separable_data() {
        let (rows, labels) = separable();
        let mut rng = StdRng::seed_from_u64(7);
        let mut importances = [0.0; FEATURE_COUNT];
        let sample: Vec<usize> = (0..rows.len()).collect();
        let tree = DecisionTree::fit(&rows, &labels, sample, &params(), &mut rng, &mut importances);

        let mut low = [0.0; FEATURE_COUNT];
        low[0] = 3.0;
        let mut high = [0.0; FEATURE_COUNT];
        high[0] = 15.0;
        assert_eq!(tree.predict_probability(&low), 0.0);
        assert_eq!(tree.predict_probability(&high), 1.0);
        // the split feature carries all the importance
        assert!(importances[0] > 0.0);
        assert!(importances[1..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_pure_sample_is_single_leaf() {
        let (rows, _) = separable();
        let labels = vec![1u8; rows.len()];
        let mut rng = StdRng::seed_from_u64(7);
        let mut importances = [0.0; FEATURE_COUNT];
        let sample: Vec<usize> = (0..rows.len()).collect();
        let tree = DecisionTree::fit(&rows, &labels, sample, &params(), &mut rng, &mut importances);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.predict_probability(&rows[0]), 1.0);
    }

    #[test]
    fn test_min_samples_leaf_respected() {
        let (rows, labels) = separable();
        let strict = TreeParams {
            min_samples_leaf: 10,
            ..params()
        };
        let mut rng = StdRng::seed_from_u64(7);
        let mut importances = [0.0; FEATURE_COUNT];
        let sample: Vec<usize> = (0..rows.len()).collect();
        let tree = DecisionTree::fit(&rows, &labels, sample, &strict, &mut rng, &mut importances);
        // only the 10/10 split is allowed
        assert!(tree.node_count() <= 3);
    }
}

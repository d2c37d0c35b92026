//! Synthetic training cohort.
//!
//! Stands in for real medical data: each feature is drawn independently from
//! a fixed distribution, and the label comes from a risk-factor heuristic.
//! Every draw, including the label draw, comes from one seeded `StdRng`, so
//! a given seed always produces the same cohort.

use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use statrs::distribution::{Exp, Normal};

use super::error::ModelResult;
use super::layout::FEATURE_COUNT;

/// Labeled feature rows in layout order.
#[derive(Debug, Clone)]
pub struct Cohort {
    pub rows: Vec<[f64; FEATURE_COUNT]>,
    pub labels: Vec<u8>,
}

impl Cohort {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Fraction of class-1 labels.
    pub fn positive_rate(&self) -> f64 {
        if self.labels.is_empty() {
            return 0.0;
        }
        let positives = self.labels.iter().filter(|&&l| l == 1).count();
        positives as f64 / self.labels.len() as f64
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CohortConfig {
    pub n_samples: usize,
    pub seed: u64,
}

impl Default for CohortConfig {
    fn default() -> Self {
        Self {
            n_samples: 1000,
            seed: 42,
        }
    }
}

/// Draw a cohort of `n_samples` patients.
pub fn generate_cohort(config: &CohortConfig) -> ModelResult<Cohort> {
    let mut rng = StdRng::seed_from_u64(config.seed);

    let age_dist = Normal::new(54.0, 9.0)?;
    let bp_dist = Normal::new(131.0, 17.0)?;
    let chol_dist = Normal::new(246.0, 51.0)?;
    let hr_dist = Normal::new(149.0, 22.0)?;
    let oldpeak_dist = Exp::new(1.0)?;

    let mut rows = Vec::with_capacity(config.n_samples);
    let mut labels = Vec::with_capacity(config.n_samples);

    for _ in 0..config.n_samples {
        let row: [f64; FEATURE_COUNT] = [
            age_dist.sample(&mut rng).trunc(), // whole years
            f64::from(rng.gen_range(0..=1u8)),
            f64::from(rng.gen_range(0..=3u8)),
            bp_dist.sample(&mut rng),
            chol_dist.sample(&mut rng),
            f64::from(u8::from(rng.gen_bool(0.15))),
            f64::from(rng.gen_range(0..=2u8)),
            hr_dist.sample(&mut rng),
            f64::from(u8::from(rng.gen_bool(0.32))),
            oldpeak_dist.sample(&mut rng),
            f64::from(rng.gen_range(0..=2u8)),
            f64::from(rng.gen_range(0..=3u8)),
            f64::from(rng.gen_range(0..=3u8)),
        ];

        let factors = risk_factor_count(&row);
        let probability = logistic(f64::from(factors) - 3.0);
        labels.push(u8::from(rng.gen_bool(probability)));
        rows.push(row);
    }

    Ok(Cohort { rows, labels })
}

/// Count of the ten boolean risk indicators for one row.
pub fn risk_factor_count(row: &[f64; FEATURE_COUNT]) -> u32 {
    let mut count = 0;
    count += u32::from(row[0] > 60.0); // age
    count += u32::from(row[1] == 1.0); // sex (male coded)
    count += u32::from(row[2] == 0.0); // typical angina
    count += u32::from(row[3] > 140.0); // resting_bp
    count += u32::from(row[4] > 240.0); // cholesterol
    count += u32::from(row[5] == 1.0); // fasting_blood_sugar
    count += u32::from(row[7] < 120.0); // max_heart_rate
    count += u32::from(row[8] == 1.0); // exercise_angina
    count += u32::from(row[9] > 1.5); // oldpeak
    count += u32::from(row[11] > 0.0); // major_vessels
    count
}

fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Split into train/test, stratified by label. Each class is shuffled with
/// its own seeded RNG stream and `test_fraction` of it is held out.
pub fn stratified_split(cohort: &Cohort, test_fraction: f64, seed: u64) -> (Cohort, Cohort) {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut train = Cohort {
        rows: Vec::new(),
        labels: Vec::new(),
    };
    let mut test = Cohort {
        rows: Vec::new(),
        labels: Vec::new(),
    };

    for class in [0u8, 1u8] {
        let mut indices: Vec<usize> = (0..cohort.len())
            .filter(|&i| cohort.labels[i] == class)
            .collect();
        indices.shuffle(&mut rng);

        let n_test = (indices.len() as f64 * test_fraction).round() as usize;
        for (position, &i) in indices.iter().enumerate() {
            let target = if position < n_test { &mut test } else { &mut train };
            target.rows.push(cohort.rows[i]);
            target.labels.push(cohort.labels[i]);
        }
    }

    (train, test)
}

//! Cardiac risk classification.
//!
//! The pipeline is linear: a 13-feature [`PatientRecord`] is standardized by
//! the fitted [`StandardScaler`], scored by the [`RandomForest`], and the
//! probability is bucketed into a [`RiskLevel`]. [`RiskPredictor`] owns the
//! fitted state and the load-or-train lifecycle.

pub mod error;
pub mod forest;
pub mod layout;
pub mod predictor;
pub mod record;
pub mod risk;
pub mod scaler;
pub mod store;
pub mod synth;
mod tree;


pub use error::{ModelError, ModelResult};
pub use forest::{ForestConfig, RankedFeature};
pub use layout::{FEATURE_COUNT, FEATURE_LAYOUT};
pub use predictor::{RiskPredictor, TrainingOptions};
pub use record::PatientRecord;
pub use risk::RiskLevel;
pub use store::{ModelStore, TrainingMetadata};

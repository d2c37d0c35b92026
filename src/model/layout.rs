//! Feature layout - the authoritative order of model inputs.
//!
//! The scaler statistics and every tree split are positional, so persisted
//! artifacts are only valid against the exact layout they were trained with.
//! Layout version + CRC32 hash are embedded in artifacts and checked on load.
//!
//! Rules:
//! 1. Add a feature -> increment LAYOUT_VERSION
//! 2. Change order -> increment LAYOUT_VERSION
//! 3. Remove a feature -> increment LAYOUT_VERSION

use crc32fast::Hasher;

/// Current feature layout version.
pub const LAYOUT_VERSION: u8 = 1;

/// Feature names in the exact order they appear in a model input vector.
pub const FEATURE_LAYOUT: &[&str] = &[
    "age",                 // 0: age in years
    "sex",                 // 1: 0 = female, 1 = male
    "chest_pain_type",     // 2: 0-3 (0 = typical angina)
    "resting_bp",          // 3: resting blood pressure, mmHg
    "cholesterol",         // 4: serum cholesterol, mg/dl
    "fasting_blood_sugar", // 5: 1 if > 120 mg/dl
    "resting_ecg",         // 6: 0-2 resting ECG category
    "max_heart_rate",      // 7: maximum heart rate achieved, bpm
    "exercise_angina",     // 8: 1 if exercise-induced angina
    "oldpeak",             // 9: ST depression relative to rest
    "slope",               // 10: 0-2 peak exercise ST slope
    "major_vessels",       // 11: 0-3 vessels colored by fluoroscopy
    "thalassemia",         // 12: 0-3 thalassemia category
];

/// Total number of features. Must match FEATURE_LAYOUT.len().
pub const FEATURE_COUNT: usize = 13;

/// CRC32 over the version byte and the ordered feature names.
pub fn layout_hash() -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[LAYOUT_VERSION]);
    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]);
    }
    hasher.finalize()
}

/// Error when a persisted artifact was trained against a different layout.
#[derive(Debug, Clone)]
pub struct LayoutMismatchError {
    pub expected_version: u8,
    pub expected_hash: u32,
    pub actual_version: u8,
    pub actual_hash: u32,
}

impl std::fmt::Display for LayoutMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "feature layout mismatch: expected v{} (hash {:08x}), got v{} (hash {:08x})",
            self.expected_version, self.expected_hash, self.actual_version, self.actual_hash
        )
    }
}

impl std::error::Error for LayoutMismatchError {}

/// Validate that an artifact's recorded layout matches the current one.
pub fn validate_layout(version: u8, hash: u32) -> Result<(), LayoutMismatchError> {
    let current_hash = layout_hash();
    if version != LAYOUT_VERSION || hash != current_hash {
        return Err(LayoutMismatchError {
            expected_version: LAYOUT_VERSION,
            expected_hash: current_hash,
            actual_version: version,
            actual_hash: hash,
        });
    }
    Ok(())
}

/// Get feature name by index.
pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_LAYOUT.get(index).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_count() {
        assert_eq!(FEATURE_COUNT, 13);
        assert_eq!(FEATURE_LAYOUT.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_layout_hash_stable() {
        assert_eq!(layout_hash(), layout_hash());
        assert_ne!(layout_hash(), 0);
    }

    #[test]
    fn test_validate_layout() {
        assert!(validate_layout(LAYOUT_VERSION, layout_hash()).is_ok());
        assert!(validate_layout(LAYOUT_VERSION + 1, layout_hash()).is_err());
        assert!(validate_layout(LAYOUT_VERSION, layout_hash().wrapping_add(1)).is_err());
    }

    #[test]
    fn test_feature_lookup() {
        assert_eq!(feature_name(0), Some("age"));
        assert_eq!(feature_name(9), Some("oldpeak"));
        assert_eq!(feature_name(12), Some("thalassemia"));
        assert_eq!(feature_name(13), None);
    }
}

//! Patient record - the 13-feature input describing one patient.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::error::{ModelError, ModelResult};
use super::layout::FEATURE_COUNT;

/// Clinical features for one prediction, in the coding of the classic UCI
/// heart disease attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Age in years
    pub age: f64,
    /// 0 = female, 1 = male
    pub sex: f64,
    /// Chest pain type, 0-3 (0 = typical angina)
    pub chest_pain_type: f64,
    /// Resting blood pressure in mmHg
    pub resting_bp: f64,
    /// Serum cholesterol in mg/dl
    pub cholesterol: f64,
    /// 1 if fasting blood sugar > 120 mg/dl
    pub fasting_blood_sugar: f64,
    /// Resting ECG category, 0-2
    pub resting_ecg: f64,
    /// Maximum heart rate achieved, bpm
    pub max_heart_rate: f64,
    /// 1 if exercise-induced angina
    pub exercise_angina: f64,
    /// ST depression induced by exercise relative to rest
    pub oldpeak: f64,
    /// Peak exercise ST segment slope, 0-2
    pub slope: f64,
    /// Number of major vessels colored by fluoroscopy, 0-3
    pub major_vessels: f64,
    /// Thalassemia category, 0-3
    pub thalassemia: f64,
}

fn take(values: &HashMap<String, f64>, key: &'static str) -> ModelResult<f64> {
    values
        .get(key)
        .copied()
        .ok_or(ModelError::MissingFeature(key))
}

impl PatientRecord {
    /// Build a record from a name/value map. Every one of the 13 keys is
    /// required; the first absent key is reported by name. Extra keys are
    /// ignored.
    pub fn from_map(values: &HashMap<String, f64>) -> ModelResult<Self> {
        Ok(Self {
            age: take(values, "age")?,
            sex: take(values, "sex")?,
            chest_pain_type: take(values, "chest_pain_type")?,
            resting_bp: take(values, "resting_bp")?,
            cholesterol: take(values, "cholesterol")?,
            fasting_blood_sugar: take(values, "fasting_blood_sugar")?,
            resting_ecg: take(values, "resting_ecg")?,
            max_heart_rate: take(values, "max_heart_rate")?,
            exercise_angina: take(values, "exercise_angina")?,
            oldpeak: take(values, "oldpeak")?,
            slope: take(values, "slope")?,
            major_vessels: take(values, "major_vessels")?,
            thalassemia: take(values, "thalassemia")?,
        })
    }

    /// Values in the order defined by [`super::layout::FEATURE_LAYOUT`].
    pub fn to_values(&self) -> [f64; FEATURE_COUNT] {
        [
            self.age,
            self.sex,
            self.chest_pain_type,
            self.resting_bp,
            self.cholesterol,
            self.fasting_blood_sugar,
            self.resting_ecg,
            self.max_heart_rate,
            self.exercise_angina,
            self.oldpeak,
            self.slope,
            self.major_vessels,
            self.thalassemia,
        ]
    }

    /// Check every feature against its accepted range. All offending fields
    /// are reported together.
    pub fn validate(&self) -> ModelResult<()> {
        let mut errors = Vec::new();

        if !(1.0..=120.0).contains(&self.age) {
            errors.push(format!("age {} out of range [1, 120]", self.age));
        }
        check_coded(&mut errors, "sex", self.sex, 1);
        check_coded(&mut errors, "chest_pain_type", self.chest_pain_type, 3);
        if !(50.0..=250.0).contains(&self.resting_bp) {
            errors.push(format!(
                "resting_bp {} out of range [50, 250]",
                self.resting_bp
            ));
        }
        if !(100.0..=600.0).contains(&self.cholesterol) {
            errors.push(format!(
                "cholesterol {} out of range [100, 600]",
                self.cholesterol
            ));
        }
        check_coded(&mut errors, "fasting_blood_sugar", self.fasting_blood_sugar, 1);
        check_coded(&mut errors, "resting_ecg", self.resting_ecg, 2);
        if !(60.0..=220.0).contains(&self.max_heart_rate) {
            errors.push(format!(
                "max_heart_rate {} out of range [60, 220]",
                self.max_heart_rate
            ));
        }
        check_coded(&mut errors, "exercise_angina", self.exercise_angina, 1);
        if !(0.0..=10.0).contains(&self.oldpeak) {
            errors.push(format!("oldpeak {} out of range [0, 10]", self.oldpeak));
        }
        check_coded(&mut errors, "slope", self.slope, 2);
        check_coded(&mut errors, "major_vessels", self.major_vessels, 3);
        check_coded(&mut errors, "thalassemia", self.thalassemia, 3);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ModelError::OutOfRange(errors.join("; ")))
        }
    }
}

/// Coded attributes must be whole numbers in 0..=max.
fn check_coded(errors: &mut Vec<String>, name: &str, value: f64, max: u8) {
    if value.fract() != 0.0 || value < 0.0 || value > f64::from(max) {
        errors.push(format!("{} {} must be an integer in 0..={}", name, value, max));
    }
}

//! Medical history record of a patient.
//!
//! The backend only accepts real booleans for the `has_*` flags, while forms
//! and older records hand out `"1"`, `0`, `"on"` or `null`. Deserialization
//! coerces all of those; serialization always writes booleans.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::Value;
use tracing::{info, instrument};

use crate::{
    backend::ClinicBackend,
    error::{FieldErrors, WorkflowError},
    wire_enum,
};

static BLOOD_PRESSURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{2,3}/[0-9]{2,3}$").expect("blood pressure pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BloodType {
    A,
    B,
    AB,
    O,
}
wire_enum!(BloodType {
    A => "A",
    B => "B",
    AB => "AB",
    O => "O",
});

/// Coerces the loose boolean encodings into a strict `bool`.
pub fn strict_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(false),
        Value::Bool(b) => Ok(b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(de::Error::custom(format!("{n} is not a boolean flag"))),
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "on" | "yes" => Ok(true),
            "0" | "false" | "off" | "no" | "" => Ok(false),
            other => Err(de::Error::custom(format!("'{other}' is not a boolean flag"))),
        },
        other => Err(de::Error::custom(format!("{other} is not a boolean flag"))),
    }
}

/// Past conditions, allergies and vital information of one patient.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MedicalHistory {
    #[serde(default, deserialize_with = "strict_bool")]
    pub has_heart_disease: bool,
    #[serde(default)]
    pub heart_disease_notes: Option<String>,

    #[serde(default, deserialize_with = "strict_bool")]
    pub has_diabetes: bool,
    #[serde(default)]
    pub diabetes_notes: Option<String>,

    #[serde(default, deserialize_with = "strict_bool")]
    pub has_hemophilia: bool,
    #[serde(default)]
    pub hemophilia_notes: Option<String>,

    #[serde(default, deserialize_with = "strict_bool")]
    pub has_hepatitis: bool,
    #[serde(default)]
    pub hepatitis_notes: Option<String>,

    #[serde(default, deserialize_with = "strict_bool")]
    pub has_gastritis: bool,
    #[serde(default)]
    pub gastritis_notes: Option<String>,

    #[serde(default, deserialize_with = "strict_bool")]
    pub has_other_disease: bool,
    #[serde(default)]
    pub other_disease_notes: Option<String>,

    #[serde(default, deserialize_with = "strict_bool")]
    pub has_drug_allergy: bool,
    #[serde(default)]
    pub drug_allergy_notes: Option<String>,

    #[serde(default, deserialize_with = "strict_bool")]
    pub has_food_allergy: bool,
    #[serde(default)]
    pub food_allergy_notes: Option<String>,

    #[serde(default)]
    pub blood_type: Option<BloodType>,
    #[serde(default)]
    pub blood_pressure: Option<String>,
}

impl MedicalHistory {
    /// Names of the conditions that are flagged.
    #[must_use]
    pub fn flagged_conditions(&self) -> Vec<&'static str> {
        [
            (self.has_heart_disease, "heart_disease"),
            (self.has_diabetes, "diabetes"),
            (self.has_hemophilia, "hemophilia"),
            (self.has_hepatitis, "hepatitis"),
            (self.has_gastritis, "gastritis"),
            (self.has_other_disease, "other_disease"),
            (self.has_drug_allergy, "drug_allergy"),
            (self.has_food_allergy, "food_allergy"),
        ]
        .into_iter()
        .filter_map(|(flagged, name)| flagged.then_some(name))
        .collect()
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        let other_described = self
            .other_disease_notes
            .as_deref()
            .is_some_and(|n| !n.trim().is_empty());
        if self.has_other_disease && !other_described {
            errors.insert("other_disease_notes", "Sebutkan penyakit lainnya.");
        }

        if let Some(pressure) = self.blood_pressure.as_deref().map(str::trim) {
            if !pressure.is_empty() && !BLOOD_PRESSURE.is_match(pressure) {
                errors.insert(
                    "blood_pressure",
                    "Tekanan darah harus berformat sistolik/diastolik, mis. 120/80.",
                );
            }
        }

        errors.into_result()
    }
}

/// Validates `history` and, if it passes, saves it for `patient_id`.
#[instrument(skip(backend, history))]
pub async fn save<B: ClinicBackend + ?Sized>(
    backend: &B,
    patient_id: i64,
    history: &MedicalHistory,
) -> Result<(), WorkflowError> {
    history.validate().map_err(WorkflowError::Invalid)?;

    backend.save_medical_history(patient_id, history).await?;
    info!(conditions = ?history.flagged_conditions(), "medical history saved");
    Ok(())
}

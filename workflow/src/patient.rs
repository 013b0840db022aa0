//! Patient registration and guardians.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use time::Date;
use tracing::{info, instrument};

use crate::{
    backend::ClinicBackend,
    error::{FieldErrors, WorkflowError},
    format::parse_iso_date,
    wire_enum,
};

static IDENTITY_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{16}$").expect("identity number pattern is valid"));

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\+62|62|0)[0-9]{8,13}$").expect("phone pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}
wire_enum!(Gender {
    Male => "male",
    Female => "female",
});

/// Checks a national identity number (NIK): exactly 16 digits.
#[must_use]
pub fn is_valid_identity_number(value: &str) -> bool {
    IDENTITY_NUMBER.is_match(value)
}

/// Checks an Indonesian phone number, ignoring spaces and dashes.
#[must_use]
pub fn is_valid_phone(value: &str) -> bool {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    PHONE.is_match(&compact)
}

/// How the guardian of a new patient is provided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "guardian_type", rename_all = "snake_case")]
pub enum Guardian {
    /// Another registered patient acts as guardian.
    ExistingPatient {
        guardian_patient_id: i64,
        relationship: String,
    },

    /// A person who is not a patient, entered by hand.
    NonPatient {
        name: String,
        relationship: String,
        phone: String,
        #[serde(default)]
        identity_number: Option<String>,
    },

    /// A guardian record that already exists.
    Existing { guardian_id: i64 },
}

/// A guardian as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardianRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub relationship: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub identity_number: Option<String>,
}

/// A registered patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    #[serde(default)]
    pub medical_record_number: Option<String>,
    pub name: String,
    #[serde(default)]
    pub identity_number: Option<String>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub guardian_id: Option<i64>,
}

/// Body of the patient registration request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRegistration {
    pub name: String,
    #[serde(default)]
    pub identity_number: Option<String>,
    #[serde(default)]
    pub birth_place: Option<String>,
    pub birth_date: String,
    pub gender: Gender,
    pub phone: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub guardian: Option<Guardian>,
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

impl PatientRegistration {
    /// Field shape checks done before anything is sent.
    ///
    /// The identity number may only be left out when a guardian is given.
    /// Relations between patient and guardian are not checked here.
    pub fn validate(&self, today: Date) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if is_blank(&self.name) {
            errors.insert("name", "Nama wajib diisi.");
        }

        match self.identity_number.as_deref().map(str::trim) {
            Some(nik) if !nik.is_empty() => {
                if !is_valid_identity_number(nik) {
                    errors.insert("identity_number", "NIK harus terdiri dari 16 digit angka.");
                }
            }
            _ if self.guardian.is_none() => {
                errors.insert("identity_number", "NIK wajib diisi.");
            }
            _ => {}
        }

        match parse_iso_date(&self.birth_date) {
            Ok(date) if date > today => {
                errors.insert("birth_date", "Tanggal lahir tidak boleh di masa depan.");
            }
            Ok(_) => {}
            Err(_) => {
                errors.insert("birth_date", "Tanggal lahir tidak valid.");
            }
        }

        if is_blank(&self.phone) {
            errors.insert("phone", "Nomor telepon wajib diisi.");
        } else if !is_valid_phone(&self.phone) {
            errors.insert("phone", "Format nomor telepon tidak valid.");
        }

        if let Some(guardian) = &self.guardian {
            validate_guardian(guardian, &mut errors);
        }

        errors.into_result()
    }
}

/// Validates `registration` and, if it passes, registers the patient.
#[instrument(skip_all)]
pub async fn register<B: ClinicBackend + ?Sized>(
    backend: &B,
    registration: &PatientRegistration,
    today: Date,
) -> Result<Patient, WorkflowError> {
    registration.validate(today).map_err(WorkflowError::Invalid)?;

    let patient = backend.register_patient(registration).await?;
    info!(id = patient.id, "patient registered");
    Ok(patient)
}

fn validate_guardian(guardian: &Guardian, errors: &mut FieldErrors) {
    match guardian {
        Guardian::ExistingPatient { relationship, .. } => {
            if is_blank(relationship) {
                errors.insert("guardian.relationship", "Hubungan wajib diisi.");
            }
        }
        Guardian::NonPatient {
            name,
            relationship,
            phone,
            identity_number,
        } => {
            if is_blank(name) {
                errors.insert("guardian.name", "Nama wali wajib diisi.");
            }
            if is_blank(relationship) {
                errors.insert("guardian.relationship", "Hubungan wajib diisi.");
            }
            if !is_valid_phone(phone) {
                errors.insert("guardian.phone", "Format nomor telepon wali tidak valid.");
            }
            if let Some(nik) = identity_number.as_deref().filter(|n| !is_blank(n)) {
                if !is_valid_identity_number(nik.trim()) {
                    errors.insert(
                        "guardian.identity_number",
                        "NIK wali harus terdiri dari 16 digit angka.",
                    );
                }
            }
        }
        Guardian::Existing { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;
    use crate::testing::FakeBackend;

    const TODAY: Date = date!(2025 - 03 - 10);

    fn registration() -> PatientRegistration {
        PatientRegistration {
            name: "Siti Aminah".into(),
            identity_number: Some("3201234567890123".into()),
            birth_place: Some("Bandung".into()),
            birth_date: "1990-04-17".into(),
            gender: Gender::Female,
            phone: "0812-3456-7890".into(),
            address: None,
            guardian: None,
        }
    }

    #[test]
    fn identity_number_must_be_sixteen_digits() {
        assert!(is_valid_identity_number("3201234567890123"));
        assert!(!is_valid_identity_number("320123456789012"));
        assert!(!is_valid_identity_number("32012345678901234"));
        assert!(!is_valid_identity_number("32012345678901a3"));
    }

    #[test]
    fn phone_numbers() {
        assert!(is_valid_phone("+62 812 3456 7890"));
        assert!(is_valid_phone("081234567890"));
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("+1 555 0100"));
    }

    #[test]
    fn valid_registration_passes() {
        assert_eq!(registration().validate(TODAY), Ok(()));
    }

    #[test]
    fn missing_fields_are_reported_per_field() {
        let mut reg = registration();
        reg.name = "  ".into();
        reg.identity_number = Some("123".into());
        reg.birth_date = "2030-01-01".into();
        reg.phone = String::new();

        let errors = reg.validate(TODAY).unwrap_err();
        for field in ["name", "identity_number", "birth_date", "phone"] {
            assert!(errors.contains(field), "missing error for {field}");
        }
    }

    #[test]
    fn identity_number_optional_only_with_guardian() {
        let mut reg = registration();
        reg.identity_number = None;
        assert!(reg.validate(TODAY).unwrap_err().contains("identity_number"));

        reg.guardian = Some(Guardian::Existing { guardian_id: 4 });
        assert_eq!(reg.validate(TODAY), Ok(()));
    }

    #[test]
    fn non_patient_guardian_needs_its_own_fields() {
        let mut reg = registration();
        reg.guardian = Some(Guardian::NonPatient {
            name: String::new(),
            relationship: "Ibu".into(),
            phone: "0812".into(),
            identity_number: Some("99".into()),
        });

        let errors = reg.validate(TODAY).unwrap_err();
        assert!(errors.contains("guardian.name"));
        assert!(errors.contains("guardian.phone"));
        assert!(errors.contains("guardian.identity_number"));
        assert!(!errors.contains("guardian.relationship"));
    }

    #[tokio::test]
    async fn invalid_registration_is_not_sent() {
        let backend = FakeBackend::default();
        let mut reg = registration();
        reg.phone = "12".into();

        let err = register(&backend, &reg, TODAY).await.unwrap_err();
        assert!(matches!(err, WorkflowError::Invalid(ref e) if e.contains("phone")));
        assert!(backend.calls().is_empty());

        let patient = register(&backend, &registration(), TODAY).await.unwrap();
        assert_eq!(patient.name, "Siti Aminah");
        assert_eq!(backend.calls(), vec!["register_patient Siti Aminah".to_string()]);
    }

    #[test]
    fn guardian_variants_are_tagged() {
        let json = serde_json::to_value(Guardian::ExistingPatient {
            guardian_patient_id: 12,
            relationship: "Ayah".into(),
        })
        .unwrap();

        assert_eq!(json["guardian_type"], "existing_patient");
        assert_eq!(json["guardian_patient_id"], 12);
    }
}

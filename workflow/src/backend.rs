//! The seams to the outside world.
//!
//! The workflow never talks to the network itself. Everything it needs from
//! the clinic backend goes through [`ClinicBackend`], and destructive actions
//! ask a [`Confirmation`] first.

use async_trait::async_trait;

use crate::{
    error::BackendError,
    medical_history::MedicalHistory,
    models::{Appointment, AppointmentPayload, AppointmentStatus, AvailableDate, Slot},
    patient::{GuardianRecord, Patient, PatientRegistration},
};

/// Operations the clinic backend offers.
///
/// Implementations report failures with the three [`BackendError`] kinds and
/// never retry on their own.
#[async_trait]
pub trait ClinicBackend: Send + Sync {
    /// Slots of `doctor_id` on `date` (`YYYY-MM-DD`).
    async fn available_schedules(
        &self,
        doctor_id: i64,
        date: &str,
    ) -> Result<Vec<Slot>, BackendError>;

    /// Per-date quota availability of `doctor_id` between two dates, inclusive.
    async fn available_dates(
        &self,
        doctor_id: i64,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<AvailableDate>, BackendError>;

    async fn create_appointment(
        &self,
        payload: &AppointmentPayload,
    ) -> Result<Appointment, BackendError>;

    async fn update_appointment(
        &self,
        id: i64,
        payload: &AppointmentPayload,
    ) -> Result<Appointment, BackendError>;

    async fn delete_appointment(&self, id: i64) -> Result<(), BackendError>;

    /// Requests a status transition; the backend decides whether it happens.
    async fn update_status(
        &self,
        id: i64,
        status: AppointmentStatus,
    ) -> Result<Appointment, BackendError>;

    async fn save_medical_history(
        &self,
        patient_id: i64,
        history: &MedicalHistory,
    ) -> Result<(), BackendError>;

    async fn register_patient(
        &self,
        registration: &PatientRegistration,
    ) -> Result<Patient, BackendError>;

    async fn search_guardians(&self, query: &str) -> Result<Vec<GuardianRecord>, BackendError>;
}

/// Asks the user to confirm a destructive action.
#[async_trait]
pub trait Confirmation: Send + Sync {
    async fn confirm(&self, prompt: &str) -> bool;
}

/// Confirms everything. Useful for non-interactive callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

#[async_trait]
impl Confirmation for AlwaysConfirm {
    async fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

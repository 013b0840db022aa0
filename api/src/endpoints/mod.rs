//! Calls to the clinic backend, one module per resource.
//!
//! Every call goes through [`ApiClient::send`], which turns non-success
//! responses into [`ApiError`]s. Nothing is retried.

use async_trait::async_trait;
use reqwest::{RequestBuilder, header::ACCEPT};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;
use workflow::{
    Appointment, AppointmentStatus, BackendError, ClinicBackend, Slot,
    medical_history::MedicalHistory,
    models::{AppointmentPayload, AvailableDate},
    patient::{GuardianRecord, Patient, PatientRegistration},
};

use crate::{
    ApiClient,
    error::{ApiError, Result},
};

mod appointments;
mod medical_history;
mod patients;
mod schedules;

pub const AVAILABLE_SCHEDULES: &str = "/api/available-schedules";
pub const AVAILABLE_DATES: &str = "/api/available-dates";
pub const APPOINTMENTS: &str = "/api/appointments";
pub const MEDICAL_HISTORY: &str = "/api/medical-history/save-or-update";
pub const PATIENTS: &str = "/api/patients";
pub const GUARDIANS: &str = "/api/guardians";

/// Success bodies come either bare or wrapped under a resource key.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Appointment { appointment: T },
    Patient { patient: T },
    Data { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Appointment { appointment: inner }
            | Envelope::Patient { patient: inner }
            | Envelope::Data { data: inner }
            | Envelope::Bare(inner) => inner,
        }
    }
}

impl ApiClient {
    /// Sends `request` and returns the body of a success response.
    async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>> {
        let response = request.header(ACCEPT, "application/json").send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        debug!(%status, bytes = body.len(), "backend responded");

        if !status.is_success() {
            return Err(ApiError::from_response(status, &body));
        }

        Ok(body.to_vec())
    }

    /// Sends `request` and decodes the (possibly wrapped) JSON body.
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let body = self.send(request).await?;
        let envelope: Envelope<T> = serde_json::from_slice(&body)?;
        Ok(envelope.into_inner())
    }
}

#[async_trait]
impl ClinicBackend for ApiClient {
    async fn available_schedules(
        &self,
        doctor_id: i64,
        date: &str,
    ) -> Result<Vec<Slot>, BackendError> {
        Ok(self.fetch_schedules(doctor_id, date).await?)
    }

    async fn available_dates(
        &self,
        doctor_id: i64,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<AvailableDate>, BackendError> {
        Ok(self.fetch_available_dates(doctor_id, start_date, end_date).await?)
    }

    async fn create_appointment(
        &self,
        payload: &AppointmentPayload,
    ) -> Result<Appointment, BackendError> {
        Ok(self.post_appointment(payload).await?)
    }

    async fn update_appointment(
        &self,
        id: i64,
        payload: &AppointmentPayload,
    ) -> Result<Appointment, BackendError> {
        Ok(self.put_appointment(id, payload).await?)
    }

    async fn delete_appointment(&self, id: i64) -> Result<(), BackendError> {
        Ok(self.remove_appointment(id).await?)
    }

    async fn update_status(
        &self,
        id: i64,
        status: AppointmentStatus,
    ) -> Result<Appointment, BackendError> {
        Ok(self.put_status(id, status).await?)
    }

    async fn save_medical_history(
        &self,
        patient_id: i64,
        history: &MedicalHistory,
    ) -> Result<(), BackendError> {
        Ok(self.post_medical_history(patient_id, history).await?)
    }

    async fn register_patient(
        &self,
        registration: &PatientRegistration,
    ) -> Result<Patient, BackendError> {
        Ok(self.post_patient(registration).await?)
    }

    async fn search_guardians(&self, query: &str) -> Result<Vec<GuardianRecord>, BackendError> {
        Ok(self.fetch_guardians(query).await?)
    }
}

//! Appointment create, update, delete and status routes.

use serde::Serialize;
use tracing::instrument;
use workflow::{Appointment, AppointmentStatus, models::AppointmentPayload};

use super::APPOINTMENTS;
use crate::{ApiClient, error::Result};

/// Update body: the create body plus the method override the backend's
/// form handling expects.
#[derive(Debug, Serialize)]
struct UpdateBody<'a> {
    #[serde(flatten)]
    payload: &'a AppointmentPayload,

    #[serde(rename = "_method")]
    method: &'static str,
}

impl ApiClient {
    /// `POST /api/appointments`
    #[instrument(skip_all, fields(doctor_id = payload.doctor_id, date = %payload.appointment_date))]
    pub async fn post_appointment(&self, payload: &AppointmentPayload) -> Result<Appointment> {
        let request = self.http.post(self.url(APPOINTMENTS)).json(payload);
        self.send_json(request).await
    }

    /// `PUT /api/appointments/{id}`
    #[instrument(skip(self, payload))]
    pub async fn put_appointment(
        &self,
        id: i64,
        payload: &AppointmentPayload,
    ) -> Result<Appointment> {
        let body = UpdateBody {
            payload,
            method: "PUT",
        };
        let request = self
            .http
            .put(self.url(&format!("{APPOINTMENTS}/{id}")))
            .json(&body);
        self.send_json(request).await
    }

    /// `DELETE /api/appointments/{id}`
    #[instrument(skip(self))]
    pub async fn remove_appointment(&self, id: i64) -> Result<()> {
        let request = self.http.delete(self.url(&format!("{APPOINTMENTS}/{id}")));
        self.send(request).await?;
        Ok(())
    }

    /// `PUT /api/appointments/{id}/status/{status}`
    #[instrument(skip(self))]
    pub async fn put_status(&self, id: i64, status: AppointmentStatus) -> Result<Appointment> {
        let request = self
            .http
            .put(self.url(&format!("{APPOINTMENTS}/{id}/status/{status}")));
        self.send_json(request).await
    }
}

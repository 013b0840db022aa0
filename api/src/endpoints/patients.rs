//! Patient registration and guardian lookup.

use serde::Deserialize;
use tracing::instrument;
use workflow::patient::{GuardianRecord, Patient, PatientRegistration};

use super::{GUARDIANS, PATIENTS};
use crate::{ApiClient, error::Result};

#[derive(Debug, Deserialize)]
struct GuardiansResponse {
    guardians: Vec<GuardianRecord>,
}

impl ApiClient {
    /// `POST /api/patients`
    #[instrument(skip_all)]
    pub async fn post_patient(&self, registration: &PatientRegistration) -> Result<Patient> {
        let request = self.http.post(self.url(PATIENTS)).json(registration);
        self.send_json(request).await
    }

    /// `GET /api/guardians?search=`
    #[instrument(skip(self))]
    pub async fn fetch_guardians(&self, query: &str) -> Result<Vec<GuardianRecord>> {
        let request = self
            .http
            .get(self.url(GUARDIANS))
            .query(&[("search", query)]);

        let response: GuardiansResponse = self.send_json(request).await?;
        Ok(response.guardians)
    }
}

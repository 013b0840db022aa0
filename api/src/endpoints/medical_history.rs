use tracing::instrument;
use workflow::medical_history::MedicalHistory;

use super::MEDICAL_HISTORY;
use crate::{ApiClient, error::Result};

impl ApiClient {
    /// `POST /api/medical-history/save-or-update/{patient_id}`
    ///
    /// The body always carries real booleans for the `has_*` flags.
    #[instrument(skip(self, history))]
    pub async fn post_medical_history(
        &self,
        patient_id: i64,
        history: &MedicalHistory,
    ) -> Result<()> {
        let request = self
            .http
            .post(self.url(&format!("{MEDICAL_HISTORY}/{patient_id}")))
            .json(history);
        self.send(request).await?;
        Ok(())
    }
}

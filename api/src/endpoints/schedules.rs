//! Schedule availability lookups.

use serde::Deserialize;
use tracing::instrument;
use workflow::{Slot, models::AvailableDate};

use super::{AVAILABLE_DATES, AVAILABLE_SCHEDULES};
use crate::{ApiClient, error::Result};

#[derive(Debug, Deserialize)]
struct SchedulesResponse {
    schedules: Vec<Slot>,
}

#[derive(Debug, Deserialize)]
struct AvailableDatesResponse {
    available_dates: Vec<AvailableDate>,
}

impl ApiClient {
    /// `GET /api/available-schedules?doctor_id&date`
    #[instrument(skip(self))]
    pub async fn fetch_schedules(&self, doctor_id: i64, date: &str) -> Result<Vec<Slot>> {
        let request = self
            .http
            .get(self.url(AVAILABLE_SCHEDULES))
            .query(&[("doctor_id", doctor_id.to_string().as_str()), ("date", date)]);

        let response: SchedulesResponse = self.send_json(request).await?;
        Ok(response.schedules)
    }

    /// `GET /api/available-dates?doctor_id&start_date&end_date`
    #[instrument(skip(self))]
    pub async fn fetch_available_dates(
        &self,
        doctor_id: i64,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<AvailableDate>> {
        let request = self.http.get(self.url(AVAILABLE_DATES)).query(&[
            ("doctor_id", doctor_id.to_string().as_str()),
            ("start_date", start_date),
            ("end_date", end_date),
        ]);

        let response: AvailableDatesResponse = self.send_json(request).await?;
        Ok(response.available_dates)
    }
}

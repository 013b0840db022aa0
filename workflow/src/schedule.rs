//! Lookups of a doctor's bookable slots.

use tracing::{debug, instrument, warn};

use crate::{
    backend::ClinicBackend,
    error::BackendError,
    format::parse_iso_date,
    models::{AvailableDate, Slot},
};

/// Identifies one schedule fetch. Only the most recently issued ticket may
/// apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(pub(crate) u64);

/// Issues schedule lookups and discards responses that were superseded by a
/// newer lookup before they arrived.
#[derive(Debug, Default)]
pub struct ScheduleAvailabilityFetcher {
    issued: u64,
}

impl ScheduleAvailabilityFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a new ticket, invalidating every earlier one.
    pub fn begin(&mut self) -> FetchTicket {
        self.issued += 1;
        FetchTicket(self.issued)
    }

    #[must_use]
    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.issued
    }

    /// Passes `result` through if `ticket` is still the latest one.
    #[must_use]
    pub fn complete<T>(&self, ticket: FetchTicket, result: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(result)
        } else {
            debug!(ticket = ticket.0, latest = self.issued, "discarding stale schedule response");
            None
        }
    }

    /// Fetches the slots of `doctor_id` on `date`.
    ///
    /// `date` must be `YYYY-MM-DD`; anything else fails before a request is
    /// sent. There is no retry.
    #[instrument(skip(backend))]
    pub async fn fetch<B: ClinicBackend + ?Sized>(
        backend: &B,
        doctor_id: i64,
        date: &str,
    ) -> Result<Vec<Slot>, BackendError> {
        check_date(date)?;

        let slots = backend
            .available_schedules(doctor_id, date)
            .await
            .inspect_err(|err| warn!(%err, "schedule lookup failed"))?;

        debug!(count = slots.len(), "schedules loaded");
        Ok(slots)
    }

    /// Fetches per-date quota availability for `doctor_id` in `[start, end]`.
    #[instrument(skip(backend))]
    pub async fn fetch_dates<B: ClinicBackend + ?Sized>(
        backend: &B,
        doctor_id: i64,
        start: &str,
        end: &str,
    ) -> Result<Vec<AvailableDate>, BackendError> {
        let from = check_date(start)?;
        let to = check_date(end)?;
        if to < from {
            return Err(BackendError::General(format!(
                "end date {end} is before start date {start}"
            )));
        }

        backend
            .available_dates(doctor_id, start, end)
            .await
            .inspect_err(|err| warn!(%err, "available dates lookup failed"))
    }
}

fn check_date(date: &str) -> Result<time::Date, BackendError> {
    parse_iso_date(date)
        .map_err(|_| BackendError::General(format!("'{date}' is not a YYYY-MM-DD date")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBackend;

    #[test]
    fn only_the_latest_ticket_applies() {
        let mut fetcher = ScheduleAvailabilityFetcher::new();
        let first = fetcher.begin();
        let second = fetcher.begin();

        assert_eq!(fetcher.complete(first, "monday"), None);
        assert_eq!(fetcher.complete(second, "tuesday"), Some("tuesday"));
        assert!(first < second);
    }

    #[tokio::test]
    async fn invalid_dates_never_reach_the_backend() {
        let backend = FakeBackend::default();

        let err = ScheduleAvailabilityFetcher::fetch(&backend, 7, "10-03-2025")
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::General(_)));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn fetch_returns_backend_slots() {
        let backend = FakeBackend::default()
            .with_slots("2025-03-10", vec![FakeBackend::slot(1, "09:00")]);

        let slots = ScheduleAvailabilityFetcher::fetch(&backend, 7, "2025-03-10")
            .await
            .unwrap();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].start_time, "09:00");
        assert_eq!(backend.calls(), vec!["available_schedules 7 2025-03-10".to_string()]);
    }

    #[tokio::test]
    async fn reversed_date_range_is_rejected() {
        let backend = FakeBackend::default();
        let result =
            ScheduleAvailabilityFetcher::fetch_dates(&backend, 7, "2025-03-10", "2025-03-01").await;

        assert!(result.is_err());
        assert!(backend.calls().is_empty());
    }
}

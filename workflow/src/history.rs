//! Client-side listing of past appointments.

use serde::Serialize;

use crate::models::{Appointment, AppointmentStatus};

pub const DEFAULT_PER_PAGE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

/// Filter, order and page of the history list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    pub status: Option<AppointmentStatus>,
    pub search: Option<String>,
    pub order: SortOrder,
    /// 1-based.
    pub page: usize,
    pub per_page: usize,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            status: None,
            search: None,
            order: SortOrder::default(),
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// One page of the filtered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryPage<'a> {
    pub items: Vec<&'a Appointment>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

fn matches(appointment: &Appointment, query: &HistoryQuery, needle: Option<&str>) -> bool {
    if let Some(status) = query.status {
        if appointment.status() != Some(status) {
            return false;
        }
    }

    let Some(needle) = needle else {
        return true;
    };

    appointment.chief_complaint.to_lowercase().contains(needle)
        || appointment
            .notes
            .as_deref()
            .is_some_and(|n| n.to_lowercase().contains(needle))
}

/// Filters, sorts and slices `appointments` according to `query`.
///
/// Pages past the end clamp to the last page. An empty result is a single
/// empty page.
#[must_use]
pub fn render<'a>(appointments: &'a [Appointment], query: &HistoryQuery) -> HistoryPage<'a> {
    let needle = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let mut items: Vec<&Appointment> = appointments
        .iter()
        .filter(|a| matches(a, query, needle.as_deref()))
        .collect();

    // dates and times are zero-padded ISO strings, so they sort lexically
    items.sort_by(|a, b| {
        let key_a = (&a.appointment_date, &a.appointment_time, a.id);
        let key_b = (&b.appointment_date, &b.appointment_time, b.id);
        match query.order {
            SortOrder::NewestFirst => key_b.cmp(&key_a),
            SortOrder::OldestFirst => key_a.cmp(&key_b),
        }
    });

    let per_page = query.per_page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page).max(1);
    let page = query.page.clamp(1, total_pages);

    let items = items
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .collect();

    HistoryPage {
        items,
        page,
        total_pages,
        total_items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::tests::appointment;

    fn history() -> Vec<Appointment> {
        let mut list = Vec::new();
        for (id, date, status, complaint) in [
            (1, "2025-01-05", "completed", "Sakit gigi"),
            (2, "2025-02-11", "canceled", "Kontrol behel"),
            (3, "2025-03-01", "completed", "Gusi berdarah"),
            (4, "2025-03-01", "no_show", "Sakit gigi geraham"),
        ] {
            let mut a = appointment(id, status);
            a.appointment_date = date.into();
            a.chief_complaint = complaint.into();
            list.push(a);
        }
        list
    }

    fn ids(page: &HistoryPage<'_>) -> Vec<i64> {
        page.items.iter().map(|a| a.id).collect()
    }

    #[test]
    fn newest_first_by_default() {
        let list = history();
        let page = render(&list, &HistoryQuery::default());

        assert_eq!(ids(&page), vec![4, 3, 2, 1]);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn filters_by_status_and_search() {
        let list = history();
        let query = HistoryQuery {
            status: Some(AppointmentStatus::Completed),
            search: Some("  SAKIT ".into()),
            ..HistoryQuery::default()
        };

        assert_eq!(ids(&render(&list, &query)), vec![1]);
    }

    #[test]
    fn search_covers_notes() {
        let mut list = history();
        list[1].notes = Some("Pasien minta dijadwalkan ulang".into());
        let query = HistoryQuery {
            search: Some("jadwalkan".into()),
            ..HistoryQuery::default()
        };

        assert_eq!(ids(&render(&list, &query)), vec![2]);
    }

    #[test]
    fn pages_are_sliced_and_clamped() {
        let list = history();
        let mut query = HistoryQuery {
            order: SortOrder::OldestFirst,
            per_page: 3,
            page: 2,
            ..HistoryQuery::default()
        };

        let page = render(&list, &query);
        assert_eq!(ids(&page), vec![4]);
        assert_eq!(page.total_pages, 2);

        query.page = 40;
        assert_eq!(render(&list, &query).page, 2);

        query.page = 0;
        assert_eq!(ids(&render(&list, &query)), vec![1, 2, 3]);
    }

    #[test]
    fn empty_list_is_one_empty_page() {
        let page = render(&[], &HistoryQuery::default());
        assert!(page.items.is_empty());
        assert_eq!((page.page, page.total_pages, page.total_items), (1, 1, 0));
    }
}

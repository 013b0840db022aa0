//! Display attributes for appointment statuses.

use serde::Serialize;

use crate::models::AppointmentStatus;

/// How a status is shown: a label, a badge color class and an icon name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
    pub label: &'static str,
    pub color: &'static str,
    pub icon: &'static str,
}

const SCHEDULED: StatusBadge = StatusBadge {
    label: "Terjadwal",
    color: "bg-blue-100 text-blue-800",
    icon: "calendar",
};

/// The badge for a known status.
#[must_use]
pub const fn badge(status: AppointmentStatus) -> StatusBadge {
    match status {
        AppointmentStatus::Scheduled => SCHEDULED,
        AppointmentStatus::Confirmed => StatusBadge {
            label: "Dikonfirmasi",
            color: "bg-green-100 text-green-800",
            icon: "check-circle",
        },
        AppointmentStatus::InProgress => StatusBadge {
            label: "Sedang Berlangsung",
            color: "bg-yellow-100 text-yellow-800",
            icon: "clock",
        },
        AppointmentStatus::Completed => StatusBadge {
            label: "Selesai",
            color: "bg-gray-100 text-gray-800",
            icon: "check-double",
        },
        AppointmentStatus::Canceled => StatusBadge {
            label: "Dibatalkan",
            color: "bg-red-100 text-red-800",
            icon: "x-circle",
        },
        AppointmentStatus::NoShow => StatusBadge {
            label: "Tidak Hadir",
            color: "bg-orange-100 text-orange-800",
            icon: "user-x",
        },
    }
}

/// The badge for a raw status string.
///
/// Strings this client does not know render as `scheduled`, so an unknown
/// status looks exactly like a genuine scheduled one.
#[must_use]
pub fn present(status: &str) -> StatusBadge {
    status.parse().map_or(SCHEDULED, badge)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_renders_as_scheduled() {
        assert_eq!(present("unrecognized_future_status"), present("scheduled"));
        assert_eq!(present(""), SCHEDULED);
    }

    #[test]
    fn every_known_status_has_a_distinct_label() {
        let mut labels: Vec<_> = AppointmentStatus::ALL
            .iter()
            .map(|s| present(s.as_str()).label)
            .collect();
        labels.sort_unstable();
        labels.dedup();

        assert_eq!(labels.len(), AppointmentStatus::ALL.len());
    }

    #[test]
    fn canceled_is_red() {
        assert_eq!(present("canceled").color, "bg-red-100 text-red-800");
    }
}

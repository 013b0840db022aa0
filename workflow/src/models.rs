//! JSON models exchanged with the clinic backend.
//!
//! These mirror what the backend sends; the backend stays the authority for
//! every value in them.

use serde::{Deserialize, Serialize};

use crate::wire_enum;

/// Lifecycle state of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    InProgress,
    Completed,
    Canceled,
    NoShow,
}
wire_enum!(AppointmentStatus {
    Scheduled => "scheduled",
    Confirmed => "confirmed",
    InProgress => "in_progress",
    Completed => "completed",
    Canceled => "canceled",
    NoShow => "no_show",
});

/// An appointment as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub schedule_id: i64,
    pub appointment_date: String,
    pub appointment_time: String,
    pub chief_complaint: String,
    #[serde(default)]
    pub notes: Option<String>,
    /// Kept verbatim: the backend may introduce statuses this client does
    /// not know yet.
    pub status: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub created_by: Option<i64>,
}

impl Appointment {
    /// The parsed status, `None` for values this client does not know.
    #[must_use]
    pub fn status(&self) -> Option<AppointmentStatus> {
        self.status.parse().ok()
    }

    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        self.status() == Some(AppointmentStatus::Scheduled)
    }
}

/// A bookable slot of a doctor's schedule on a given date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: i64,
    pub doctor_id: i64,
    #[serde(default)]
    pub day_name: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub formatted_time: Option<String>,
    pub remaining_quota: u32,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

impl Slot {
    /// Whether the slot can still take a booking.
    #[must_use]
    pub fn is_bookable(&self) -> bool {
        self.is_available && self.remaining_quota > 0
    }
}

const fn default_true() -> bool {
    true
}

/// One entry of the available-dates lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableDate {
    pub date: String,
    pub has_available_quota: bool,
}

/// The panel the server asks the client to open first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextMode {
    CreateNew,
    ShowNext,
    #[serde(other)]
    Unspecified,
}

/// Page-load hint describing the next appointment and what the current user
/// may do with it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppointmentContext {
    #[serde(default)]
    pub mode: Option<ContextMode>,
    #[serde(default)]
    pub appointment_to_show: Option<Appointment>,
    #[serde(default)]
    pub can_edit: bool,
    #[serde(default)]
    pub can_delete: bool,
    #[serde(default)]
    pub message: String,
}

/// Body of the create and update appointment requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentPayload {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub schedule_id: i64,
    pub appointment_date: String,
    pub appointment_time: String,
    pub chief_complaint: String,
    pub notes: Option<String>,
    /// Raw wire value, so an edit sends back a status this client does not
    /// know exactly as it received it.
    pub status: String,
}

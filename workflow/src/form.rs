//! Pending values of the create/edit appointment form.

use tracing::debug;

use crate::{
    error::{BackendError, FieldErrors},
    models::{Appointment, AppointmentPayload, AppointmentStatus, Slot},
    schedule::FetchTicket,
};

/// The appointment being edited, as it was before editing started.
#[derive(Debug, Clone, PartialEq, Eq)]
struct EditTarget {
    appointment_id: i64,
    original_date: String,
    original_schedule_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentFormState {
    pub patient_id: i64,
    pub doctor_id: i64,
    appointment_date: String,
    schedule_id: Option<i64>,
    chief_complaint: String,
    notes: String,
    status: String,
    editing: Option<EditTarget>,
    schedules: Vec<Slot>,
    errors: FieldErrors,
    submitting: bool,
    loading_schedules: bool,
}

impl AppointmentFormState {
    #[must_use]
    pub fn new(patient_id: i64, doctor_id: i64) -> Self {
        Self {
            patient_id,
            doctor_id,
            appointment_date: String::new(),
            schedule_id: None,
            chief_complaint: String::new(),
            notes: String::new(),
            status: AppointmentStatus::Scheduled.to_string(),
            editing: None,
            schedules: Vec::new(),
            errors: FieldErrors::new(),
            submitting: false,
            loading_schedules: false,
        }
    }

    /// Clears every pending value, ready for a new appointment.
    pub fn reset(&mut self) {
        *self = Self::new(self.patient_id, self.doctor_id);
    }

    /// Loads an existing appointment for editing.
    pub fn load(&mut self, appointment: &Appointment) {
        self.reset();
        self.doctor_id = appointment.doctor_id;
        self.appointment_date.clone_from(&appointment.appointment_date);
        self.schedule_id = Some(appointment.schedule_id);
        self.chief_complaint.clone_from(&appointment.chief_complaint);
        self.notes = appointment.notes.clone().unwrap_or_default();
        self.status.clone_from(&appointment.status);
        self.editing = Some(EditTarget {
            appointment_id: appointment.id,
            original_date: appointment.appointment_date.clone(),
            original_schedule_id: appointment.schedule_id,
        });
    }

    #[must_use]
    pub fn appointment_date(&self) -> &str {
        &self.appointment_date
    }

    #[must_use]
    pub fn schedule_id(&self) -> Option<i64> {
        self.schedule_id
    }

    #[must_use]
    pub fn chief_complaint(&self) -> &str {
        &self.chief_complaint
    }

    #[must_use]
    pub fn notes(&self) -> &str {
        &self.notes
    }

    #[must_use]
    pub fn schedules(&self) -> &[Slot] {
        &self.schedules
    }

    #[must_use]
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Id of the appointment under edit.
    #[must_use]
    pub fn editing_id(&self) -> Option<i64> {
        self.editing.as_ref().map(|e| e.appointment_id)
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    #[must_use]
    pub fn is_loading_schedules(&self) -> bool {
        self.loading_schedules
    }

    /// Sets the date and invalidates the chosen slot.
    ///
    /// While editing, going back to the appointment's original date brings
    /// its original slot back instead.
    pub fn change_date(&mut self, date: &str) {
        self.appointment_date = date.to_string();
        self.errors.remove("appointment_date");

        self.schedule_id = match &self.editing {
            Some(target) if target.original_date == date => Some(target.original_schedule_id),
            _ => None,
        };

        debug!(date, schedule_id = ?self.schedule_id, "appointment date changed");
    }

    /// Marks a schedule lookup as in flight and drops the old slot list.
    pub fn schedules_loading(&mut self) {
        self.loading_schedules = true;
        self.schedules.clear();
        self.errors.remove("schedule_id");
    }

    /// Applies the result of the lookup started with `ticket`, if `current`.
    pub fn schedules_loaded(
        &mut self,
        ticket: FetchTicket,
        current: bool,
        result: Result<Vec<Slot>, BackendError>,
    ) {
        if !current {
            debug!(?ticket, "ignoring superseded schedule result");
            return;
        }

        self.loading_schedules = false;
        match result {
            Ok(slots) => self.schedules = slots,
            Err(err) => {
                self.schedules.clear();
                self.errors
                    .insert("schedule_id", format!("Gagal memuat jadwal dokter: {err}"));
            }
        }
    }

    /// Picks one of the loaded slots.
    pub fn select_slot(&mut self, schedule_id: i64) -> Result<(), FieldErrors> {
        let Some(slot) = self.schedules.iter().find(|s| s.id == schedule_id) else {
            let errors = FieldErrors::from_iter([("schedule_id", "Jadwal tidak tersedia.")]);
            self.errors.merge(errors.clone());
            return Err(errors);
        };

        let is_current = Some(slot.id) == self.schedule_id;
        if !slot.is_bookable() && !is_current {
            let errors = FieldErrors::from_iter([("schedule_id", "Kuota jadwal sudah penuh.")]);
            self.errors.merge(errors.clone());
            return Err(errors);
        }

        self.schedule_id = Some(schedule_id);
        self.errors.remove("schedule_id");
        Ok(())
    }

    pub fn set_chief_complaint(&mut self, value: impl Into<String>) {
        self.chief_complaint = value.into();
        self.errors.remove("chief_complaint");
    }

    pub fn set_notes(&mut self, value: impl Into<String>) {
        self.notes = value.into();
    }

    /// Date, slot and a non-blank chief complaint are present.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.appointment_date.is_empty()
            && self.schedule_id.is_some()
            && !self.chief_complaint.trim().is_empty()
    }

    /// The checks behind [`Self::is_valid`], with a message per field.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.appointment_date.is_empty() {
            errors.insert("appointment_date", "Tanggal janji temu wajib diisi.");
        }
        if self.schedule_id.is_none() {
            errors.insert("schedule_id", "Pilih jadwal dokter.");
        }
        if self.chief_complaint.trim().is_empty() {
            errors.insert("chief_complaint", "Keluhan utama wajib diisi.");
        }

        errors.into_result()
    }

    /// Builds the request body.
    ///
    /// The appointment time is always taken from the selected slot in the
    /// currently loaded schedules, never from an earlier copy.
    pub fn payload(&self) -> Result<AppointmentPayload, FieldErrors> {
        self.validate()?;

        let slot = self
            .schedule_id
            .and_then(|id| self.schedules.iter().find(|s| s.id == id))
            .ok_or_else(|| {
                FieldErrors::from_iter([(
                    "schedule_id",
                    "Jadwal yang dipilih tidak tersedia pada tanggal ini.",
                )])
            })?;

        let notes = self.notes.trim();

        Ok(AppointmentPayload {
            patient_id: self.patient_id,
            doctor_id: self.doctor_id,
            schedule_id: slot.id,
            appointment_date: self.appointment_date.clone(),
            appointment_time: slot.start_time.clone(),
            chief_complaint: self.chief_complaint.trim().to_string(),
            notes: (!notes.is_empty()).then(|| notes.to_string()),
            status: self.status.clone(),
        })
    }

    /// Marks a submission as in flight, refusing a second one.
    pub fn begin_submit(&mut self) -> bool {
        if self.submitting {
            return false;
        }
        self.submitting = true;
        self.errors.clear();
        true
    }

    /// Clears the in-flight flag. Called whatever the outcome.
    pub fn finish_submit(&mut self) {
        self.submitting = false;
    }

    /// Merges client or server errors into the form.
    pub fn apply_errors(&mut self, errors: FieldErrors) {
        self.errors.merge(errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::GENERAL, panel::tests::appointment, testing::FakeBackend};

    fn loaded_form(date: &str, slots: Vec<Slot>) -> AppointmentFormState {
        let mut form = AppointmentFormState::new(11, 7);
        form.change_date(date);
        form.schedules_loading();
        form.schedules_loaded(FetchTicket(1), true, Ok(slots));
        form
    }

    #[test]
    fn whitespace_complaint_is_invalid() {
        let mut form = loaded_form("2025-03-10", vec![FakeBackend::slot(1, "09:00")]);
        form.select_slot(1).unwrap();
        form.set_chief_complaint("   \t");

        assert!(!form.is_valid());
        assert!(form.validate().unwrap_err().contains("chief_complaint"));

        form.set_chief_complaint("Sakit gigi");
        assert!(form.is_valid());
    }

    #[test]
    fn changing_the_date_clears_the_slot() {
        let mut form = loaded_form("2025-03-10", vec![FakeBackend::slot(1, "09:00")]);
        form.select_slot(1).unwrap();

        form.change_date("2025-03-11");
        assert_eq!(form.schedule_id(), None);

        form.change_date("2025-03-10");
        assert_eq!(form.schedule_id(), None);
    }

    #[test]
    fn editing_restores_the_original_slot_on_the_original_date() {
        let mut form = AppointmentFormState::new(11, 7);
        form.load(&appointment(4, "scheduled"));
        assert_eq!(form.schedule_id(), Some(1));

        form.change_date("2025-03-12");
        assert_eq!(form.schedule_id(), None);

        form.change_date("2025-03-10");
        assert_eq!(form.schedule_id(), Some(1));
    }

    #[test]
    fn payload_time_comes_from_the_loaded_slot() {
        let mut form = loaded_form(
            "2025-03-10",
            vec![FakeBackend::slot(1, "09:00"), FakeBackend::slot(2, "13:00")],
        );
        form.select_slot(2).unwrap();
        form.set_chief_complaint(" Sakit gigi ");
        form.set_notes("  ");

        let payload = form.payload().unwrap();
        assert_eq!(payload.appointment_time, "13:00");
        assert_eq!(payload.chief_complaint, "Sakit gigi");
        assert_eq!(payload.notes, None);
        assert_eq!(payload.status, "scheduled");
    }

    #[test]
    fn date_round_trip_uses_freshly_loaded_start_time() {
        let mut form = AppointmentFormState::new(11, 7);
        form.load(&appointment(4, "scheduled"));
        form.change_date("2025-03-12");
        form.change_date("2025-03-10");
        form.schedules_loading();

        let moved = FakeBackend::slot(1, "10:30");
        form.schedules_loaded(FetchTicket(3), true, Ok(vec![moved]));

        assert_eq!(form.payload().unwrap().appointment_time, "10:30");
    }

    #[test]
    fn selected_slot_missing_from_schedules_blocks_payload() {
        let mut form = AppointmentFormState::new(11, 7);
        form.load(&appointment(4, "scheduled"));

        let errors = form.payload().unwrap_err();
        assert!(errors.contains("schedule_id"));
    }

    #[test]
    fn full_slots_cannot_be_picked() {
        let mut full = FakeBackend::slot(3, "15:00");
        full.remaining_quota = 0;
        let mut form = loaded_form("2025-03-10", vec![full]);

        assert!(form.select_slot(3).is_err());
        assert!(form.select_slot(99).is_err());
        assert_eq!(form.schedule_id(), None);
        assert!(form.errors().contains("schedule_id"));
    }

    #[test]
    fn failed_lookup_becomes_a_field_error() {
        let mut form = AppointmentFormState::new(11, 7);
        form.change_date("2025-03-10");
        form.schedules_loading();
        assert!(form.is_loading_schedules());

        form.schedules_loaded(
            FetchTicket(1),
            true,
            Err(BackendError::Network("timeout".into())),
        );
        assert!(!form.is_loading_schedules());
        assert!(form.errors().get("schedule_id").unwrap().contains("timeout"));
        assert_eq!(form.appointment_date(), "2025-03-10");
    }

    #[test]
    fn stale_lookup_is_ignored() {
        let mut form = loaded_form("2025-03-10", vec![FakeBackend::slot(1, "09:00")]);
        form.schedules_loaded(FetchTicket(1), false, Ok(vec![]));
        assert_eq!(form.schedules().len(), 1);
    }

    #[test]
    fn submit_guard_refuses_double_submission() {
        let mut form = AppointmentFormState::new(11, 7);
        form.apply_errors(FieldErrors::general("old"));

        assert!(form.begin_submit());
        assert!(form.errors().get(GENERAL).is_none());
        assert!(!form.begin_submit());

        form.finish_submit();
        assert!(form.begin_submit());
    }
}

//! The appointment tab as one state machine.
//!
//! [`AppointmentWorkspace`] ties the panel selector, the form and the
//! schedule fetcher together and runs every backend call through the same
//! success / error / finish handling: in-flight flags are cleared whatever
//! the outcome, field errors are merged into the form, and nothing is
//! retried.

use tracing::{info, instrument, warn};

use crate::{
    backend::{ClinicBackend, Confirmation},
    error::{FieldErrors, WorkflowError},
    form::AppointmentFormState,
    format::{Locale, format_date, format_time, parse_iso_date},
    history::{self, HistoryPage, HistoryQuery},
    models::{Appointment, AppointmentContext, AppointmentStatus, AvailableDate},
    panel::{PanelAction, PanelControls, PanelError, PanelMode, PanelModeSelector},
    schedule::ScheduleAvailabilityFetcher,
};

pub struct AppointmentWorkspace<B, C> {
    backend: B,
    confirm: C,
    locale: Locale,
    panel: PanelModeSelector,
    form: AppointmentFormState,
    fetcher: ScheduleAvailabilityFetcher,
    history: Vec<Appointment>,
    deleting: bool,
    updating_status: bool,
}

impl<B: ClinicBackend, C: Confirmation> AppointmentWorkspace<B, C> {
    /// Opens the tab for one patient and doctor, with the panel picked by
    /// `context`.
    #[must_use]
    pub fn new(
        backend: B,
        confirm: C,
        context: &AppointmentContext,
        patient_id: i64,
        doctor_id: i64,
        history: Vec<Appointment>,
    ) -> Self {
        Self {
            backend,
            confirm,
            locale: Locale::default(),
            panel: PanelModeSelector::from_context(context),
            form: AppointmentFormState::new(patient_id, doctor_id),
            fetcher: ScheduleAvailabilityFetcher::new(),
            history,
            deleting: false,
            updating_status: false,
        }
    }

    #[must_use]
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[must_use]
    pub fn panel(&self) -> &PanelModeSelector {
        &self.panel
    }

    #[must_use]
    pub fn mode(&self) -> PanelMode {
        self.panel.mode()
    }

    #[must_use]
    pub fn form(&self) -> &AppointmentFormState {
        &self.form
    }

    #[must_use]
    pub fn controls(&self) -> PanelControls {
        self.panel.controls()
    }

    #[must_use]
    pub fn is_deleting(&self) -> bool {
        self.deleting
    }

    /// A page of the appointments known to this tab.
    #[must_use]
    pub fn history(&self, query: &HistoryQuery) -> HistoryPage<'_> {
        history::render(&self.history, query)
    }

    /// `history → create` with an empty form.
    pub fn request_new(&mut self) -> Result<(), WorkflowError> {
        self.panel.request_new()?;
        self.form.reset();
        Ok(())
    }

    /// Any mode `→ history`, discarding pending edits.
    pub fn back(&mut self) {
        self.panel.back();
        self.form.reset();
    }

    async fn load_schedules(&mut self) -> Result<(), WorkflowError> {
        let ticket = self.fetcher.begin();
        self.form.schedules_loading();

        let date = self.form.appointment_date().to_string();
        if parse_iso_date(&date).is_err() {
            self.form.schedules_loaded(ticket, true, Ok(Vec::new()));
            let errors = FieldErrors::from_iter([(
                "appointment_date",
                "Tanggal harus berformat YYYY-MM-DD.",
            )]);
            self.form.apply_errors(errors.clone());
            return Err(WorkflowError::Invalid(errors));
        }

        let result =
            ScheduleAvailabilityFetcher::fetch(&self.backend, self.form.doctor_id, &date).await;
        let failure = result.as_ref().err().cloned();

        self.form
            .schedules_loaded(ticket, self.fetcher.is_current(ticket), result);

        failure.map_or(Ok(()), |err| Err(err.into()))
    }

    /// Sets the date and loads that day's slots.
    ///
    /// A malformed date is an `appointment_date` error and sends nothing. A
    /// failed lookup leaves the mode alone and shows up as a `schedule_id`
    /// error on the form.
    #[instrument(skip(self))]
    pub async fn change_date(&mut self, date: &str) -> Result<(), WorkflowError> {
        self.form.change_date(date);
        self.load_schedules().await?;
        Ok(())
    }

    pub fn select_slot(&mut self, schedule_id: i64) -> Result<(), WorkflowError> {
        self.form
            .select_slot(schedule_id)
            .map_err(WorkflowError::Invalid)
    }

    pub fn set_chief_complaint(&mut self, value: impl Into<String>) {
        self.form.set_chief_complaint(value);
    }

    pub fn set_notes(&mut self, value: impl Into<String>) {
        self.form.set_notes(value);
    }

    /// Per-date availability for the date picker.
    pub async fn available_dates(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Vec<AvailableDate>, WorkflowError> {
        let doctor_id = self.form.doctor_id;
        Ok(ScheduleAvailabilityFetcher::fetch_dates(&self.backend, doctor_id, start, end).await?)
    }

    /// Creates (in `create` mode) or updates (in `edit` mode) the appointment.
    #[instrument(skip(self), fields(mode = %self.panel.mode()))]
    pub async fn submit(&mut self) -> Result<Appointment, WorkflowError> {
        let mode = self.panel.mode();
        let editing = match mode {
            PanelMode::Create => None,
            PanelMode::Edit => Some(self.form.editing_id().ok_or(PanelError::InvalidTransition {
                from: mode,
                action: PanelAction::Updated,
            })?),
            _ => {
                return Err(PanelError::InvalidTransition {
                    from: mode,
                    action: PanelAction::Created,
                }
                .into());
            }
        };

        if self.form.is_submitting() {
            return Err(WorkflowError::InFlight("submission"));
        }

        let payload = match self.form.payload() {
            Ok(payload) => payload,
            Err(errors) => {
                self.form.apply_errors(errors.clone());
                return Err(WorkflowError::Invalid(errors));
            }
        };

        self.form.begin_submit();
        let result = match editing {
            Some(id) => self.backend.update_appointment(id, &payload).await,
            None => self.backend.create_appointment(&payload).await,
        };
        self.form.finish_submit();

        let appointment = match result {
            Ok(appointment) => appointment,
            Err(err) => {
                warn!(%err, "appointment submission failed");
                self.form.apply_errors(err.clone().into_field_errors());
                return Err(err.into());
            }
        };

        if editing.is_some() {
            self.panel.updated(appointment.clone())?;
            self.remember(&appointment);
            info!(id = appointment.id, "appointment updated");
        } else {
            self.panel.created(appointment.clone())?;
            self.remember(&appointment);
            info!(id = appointment.id, "appointment created");
        }
        self.form.reset();

        Ok(appointment)
    }

    fn remember(&mut self, appointment: &Appointment) {
        match self.history.iter_mut().find(|a| a.id == appointment.id) {
            Some(existing) => existing.clone_from(appointment),
            None => self.history.push(appointment.clone()),
        }
    }

    /// `view_existing → edit`, loading the appointment and its day's slots.
    ///
    /// If the slot lookup fails the panel still switches to `edit`; the
    /// failure is returned and shown on the form.
    #[instrument(skip(self))]
    pub async fn request_edit(&mut self) -> Result<(), WorkflowError> {
        self.panel.request_edit()?;

        if let Some(appointment) = self.panel.displayed().cloned() {
            self.form.load(&appointment);
            self.load_schedules().await?;
        }

        Ok(())
    }

    /// `edit → view_existing`, dropping the pending changes.
    pub fn cancel_edit(&mut self) -> Result<(), WorkflowError> {
        self.panel.cancel_edit()?;
        self.form.reset();
        Ok(())
    }

    /// Deletes the displayed appointment after asking for confirmation.
    ///
    /// Returns `Ok(false)` when the user declined.
    #[instrument(skip(self))]
    pub async fn delete(&mut self) -> Result<bool, WorkflowError> {
        if self.deleting {
            return Err(WorkflowError::InFlight("deletion"));
        }

        let appointment = self.panel.check_delete()?.clone();
        let prompt = format!(
            "Hapus janji temu {} pukul {}?",
            format_date(&appointment.appointment_date, self.locale),
            format_time(&appointment.appointment_time, self.locale),
        );

        if !self.confirm.confirm(&prompt).await {
            info!(id = appointment.id, "deletion declined");
            return Ok(false);
        }

        self.deleting = true;
        let result = self.backend.delete_appointment(appointment.id).await;
        self.deleting = false;

        if let Err(err) = result {
            warn!(%err, id = appointment.id, "appointment deletion failed");
            self.form.apply_errors(err.clone().into_field_errors());
            return Err(err.into());
        }

        self.panel.deleted()?;
        self.history.retain(|a| a.id != appointment.id);
        self.form.reset();
        info!(id = appointment.id, "appointment deleted");

        Ok(true)
    }

    /// Asks the backend to move the displayed appointment to `status` and
    /// shows whatever the backend answers.
    #[instrument(skip(self))]
    pub async fn update_status(
        &mut self,
        status: AppointmentStatus,
    ) -> Result<Appointment, WorkflowError> {
        if self.updating_status {
            return Err(WorkflowError::InFlight("status update"));
        }

        let id = self
            .panel
            .displayed()
            .filter(|_| self.panel.mode() == PanelMode::ViewExisting)
            .map(|a| a.id)
            .ok_or(PanelError::InvalidTransition {
                from: self.panel.mode(),
                action: PanelAction::Updated,
            })?;

        self.updating_status = true;
        let result = self.backend.update_status(id, status).await;
        self.updating_status = false;

        match result {
            Ok(appointment) => {
                info!(id, status = %appointment.status, "appointment status changed");
                self.panel.refresh(appointment.clone());
                self.remember(&appointment);
                Ok(appointment)
            }
            Err(err) => {
                warn!(%err, id, "status update failed");
                self.form.apply_errors(err.clone().into_field_errors());
                Err(err.into())
            }
        }
    }
}

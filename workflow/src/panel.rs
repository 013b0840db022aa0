//! Selection of the appointment panel to render.
//!
//! The initial mode is derived from the [`AppointmentContext`] once, at
//! construction. Afterwards only explicit transitions change it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    models::{Appointment, AppointmentContext, ContextMode},
    wire_enum,
};

/// Banner shown when editing is refused and the context gave no message.
pub const EDIT_REFUSED: &str = "Janji temu ini tidak dapat diubah.";
/// Banner shown when deleting is refused and the context gave no message.
pub const DELETE_REFUSED: &str = "Janji temu ini tidak dapat dihapus.";

/// The four panels of the appointment tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelMode {
    History,
    Create,
    ViewExisting,
    Edit,
}
wire_enum!(PanelMode {
    History => "history",
    Create => "create",
    ViewExisting => "view_existing",
    Edit => "edit",
});

/// User and backend events that move the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    RequestNew,
    Created,
    RequestEdit,
    Updated,
    CancelEdit,
    Deleted,
}
wire_enum!(PanelAction {
    RequestNew => "request_new",
    Created => "created",
    RequestEdit => "request_edit",
    Updated => "updated",
    CancelEdit => "cancel_edit",
    Deleted => "deleted",
});

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PanelError {
    #[error("cannot {action} while in {from} mode")]
    InvalidTransition { from: PanelMode, action: PanelAction },

    #[error("{0}")]
    EditNotPermitted(String),

    #[error("{0}")]
    DeleteNotPermitted(String),
}

/// Which controls the view panel offers. Absent controls are not rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PanelControls {
    pub edit: bool,
    pub delete: bool,
}

/// Server-granted rights over one specific appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Grant {
    appointment_id: i64,
    can_edit: bool,
    can_delete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelModeSelector {
    mode: PanelMode,
    appointment: Option<Appointment>,
    grant: Option<Grant>,
    message: String,
    banner: Option<String>,
}

impl PanelModeSelector {
    /// Derives the initial panel from the page context.
    #[must_use]
    pub fn from_context(context: &AppointmentContext) -> Self {
        let grant = context.appointment_to_show.as_ref().map(|a| Grant {
            appointment_id: a.id,
            can_edit: context.can_edit,
            can_delete: context.can_delete,
        });

        let (mode, appointment) = match (context.mode, &context.appointment_to_show) {
            (Some(ContextMode::CreateNew), _) => (PanelMode::Create, None),
            (Some(ContextMode::ShowNext), Some(next)) => {
                (PanelMode::ViewExisting, Some(next.clone()))
            }
            _ => (PanelMode::History, None),
        };

        debug!(%mode, "derived initial panel mode");

        Self {
            mode,
            appointment,
            grant,
            message: context.message.clone(),
            banner: None,
        }
    }

    #[must_use]
    pub fn mode(&self) -> PanelMode {
        self.mode
    }

    /// The appointment shown in the view and edit panels.
    #[must_use]
    pub fn displayed(&self) -> Option<&Appointment> {
        self.appointment.as_ref()
    }

    /// Informational banner set by a refused action.
    #[must_use]
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    /// Server flags decide for the context's appointment; anything created
    /// in this session may be changed while it is still scheduled.
    fn permitted(&self, pick: impl Fn(&Grant) -> bool) -> bool {
        let Some(appointment) = &self.appointment else {
            return false;
        };

        match self.grant {
            Some(grant) if grant.appointment_id == appointment.id => pick(&grant),
            _ => appointment.is_scheduled(),
        }
    }

    #[must_use]
    pub fn can_edit(&self) -> bool {
        self.permitted(|g| g.can_edit)
    }

    #[must_use]
    pub fn can_delete(&self) -> bool {
        self.permitted(|g| g.can_delete)
    }

    /// Controls to render in the current mode.
    #[must_use]
    pub fn controls(&self) -> PanelControls {
        if self.mode != PanelMode::ViewExisting {
            return PanelControls::default();
        }

        PanelControls {
            edit: self.can_edit(),
            delete: self.can_delete(),
        }
    }

    fn transition(
        &mut self,
        action: PanelAction,
        allowed: &[PanelMode],
        to: PanelMode,
    ) -> Result<(), PanelError> {
        if !allowed.contains(&self.mode) {
            return Err(PanelError::InvalidTransition {
                from: self.mode,
                action,
            });
        }

        debug!(from = %self.mode, %to, %action, "panel transition");
        self.mode = to;
        self.banner = None;
        Ok(())
    }

    fn refusal(&self, fallback: &str) -> String {
        if self.message.trim().is_empty() {
            fallback.to_string()
        } else {
            self.message.clone()
        }
    }

    /// `history → create`
    pub fn request_new(&mut self) -> Result<(), PanelError> {
        self.transition(PanelAction::RequestNew, &[PanelMode::History], PanelMode::Create)
    }

    /// `create → view_existing` with the appointment the backend returned.
    pub fn created(&mut self, appointment: Appointment) -> Result<(), PanelError> {
        self.transition(PanelAction::Created, &[PanelMode::Create], PanelMode::ViewExisting)?;
        self.appointment = Some(appointment);
        Ok(())
    }

    /// `view_existing → edit`, refused with a banner when not permitted.
    pub fn request_edit(&mut self) -> Result<(), PanelError> {
        if self.mode == PanelMode::ViewExisting && !self.can_edit() {
            let message = self.refusal(EDIT_REFUSED);
            self.banner = Some(message.clone());
            return Err(PanelError::EditNotPermitted(message));
        }

        self.transition(PanelAction::RequestEdit, &[PanelMode::ViewExisting], PanelMode::Edit)
    }

    /// `edit → view_existing` with the appointment the backend returned.
    pub fn updated(&mut self, appointment: Appointment) -> Result<(), PanelError> {
        self.transition(PanelAction::Updated, &[PanelMode::Edit], PanelMode::ViewExisting)?;
        self.appointment = Some(appointment);
        Ok(())
    }

    /// `edit → view_existing`, discarding the pending edits.
    pub fn cancel_edit(&mut self) -> Result<(), PanelError> {
        self.transition(PanelAction::CancelEdit, &[PanelMode::Edit], PanelMode::ViewExisting)
    }

    /// Checks that the displayed appointment may be deleted right now.
    pub fn check_delete(&mut self) -> Result<&Appointment, PanelError> {
        if self.mode != PanelMode::ViewExisting {
            return Err(PanelError::InvalidTransition {
                from: self.mode,
                action: PanelAction::Deleted,
            });
        }

        if !self.can_delete() {
            let message = self.refusal(DELETE_REFUSED);
            self.banner = Some(message.clone());
            return Err(PanelError::DeleteNotPermitted(message));
        }

        self.appointment.as_ref().ok_or(PanelError::InvalidTransition {
            from: self.mode,
            action: PanelAction::Deleted,
        })
    }

    /// `view_existing → create`, forgetting the deleted appointment.
    pub fn deleted(&mut self) -> Result<(), PanelError> {
        self.transition(PanelAction::Deleted, &[PanelMode::ViewExisting], PanelMode::Create)?;
        self.appointment = None;
        Ok(())
    }

    /// Replaces the displayed appointment with a fresher copy from the
    /// backend without changing the mode.
    pub fn refresh(&mut self, appointment: Appointment) {
        if self.appointment.as_ref().is_some_and(|a| a.id == appointment.id) {
            self.appointment = Some(appointment);
        }
    }

    /// Any mode `→ history`.
    pub fn back(&mut self) {
        debug!(from = %self.mode, "back to history");
        self.mode = PanelMode::History;
        self.banner = None;
    }
}

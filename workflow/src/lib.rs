#![deny(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

//! Client-side workflow of the clinic desk: which appointment panel to show,
//! the appointment form, schedule lookups, patient registration and medical
//! history records.
//!
//! The clinic backend stays the authority for quotas, conflicts and status
//! changes. It is reached only through [`ClinicBackend`].

mod macros;

pub mod backend;
pub mod error;
pub mod form;
pub mod format;
pub mod history;
pub mod medical_history;
pub mod models;
pub mod panel;
pub mod patient;
pub mod schedule;
pub mod status;
pub mod workspace;

#[cfg(test)]
mod testing;

pub use backend::{AlwaysConfirm, ClinicBackend, Confirmation};
pub use error::{BackendError, FieldErrors, WorkflowError};
pub use models::{Appointment, AppointmentContext, AppointmentStatus, Slot};
pub use panel::{PanelMode, PanelModeSelector};
pub use workspace::AppointmentWorkspace;

//! In-memory backend used by the unit tests.

use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;

use crate::{
    backend::{ClinicBackend, Confirmation},
    error::BackendError,
    medical_history::MedicalHistory,
    models::{Appointment, AppointmentPayload, AppointmentStatus, AvailableDate, Slot},
    patient::{GuardianRecord, Patient, PatientRegistration},
};

#[derive(Debug, Default)]
struct State {
    slots: HashMap<String, Vec<Slot>>,
    failures: HashMap<&'static str, BackendError>,
    calls: Vec<String>,
    payloads: Vec<AppointmentPayload>,
    next_id: i64,
}

/// Records every call and answers from canned data.
#[derive(Debug, Default)]
pub struct FakeBackend {
    state: Mutex<State>,
}

impl FakeBackend {
    pub fn slot(id: i64, start_time: &str) -> Slot {
        Slot {
            id,
            doctor_id: 7,
            day_name: "Senin".into(),
            start_time: start_time.into(),
            end_time: "17:00".into(),
            formatted_time: None,
            remaining_quota: 3,
            is_available: true,
        }
    }

    pub fn with_slots(self, date: &str, slots: Vec<Slot>) -> Self {
        self.state.lock().unwrap().slots.insert(date.into(), slots);
        self
    }

    /// Makes every call of `operation` fail with `error`.
    pub fn failing(self, operation: &'static str, error: BackendError) -> Self {
        self.state.lock().unwrap().failures.insert(operation, error);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn payloads(&self) -> Vec<AppointmentPayload> {
        self.state.lock().unwrap().payloads.clone()
    }

    fn record(&self, operation: &'static str, call: String) -> Result<(), BackendError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        match state.failures.get(operation) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn appointment(id: i64, payload: &AppointmentPayload) -> Appointment {
        Appointment {
            id,
            patient_id: payload.patient_id,
            doctor_id: payload.doctor_id,
            schedule_id: payload.schedule_id,
            appointment_date: payload.appointment_date.clone(),
            appointment_time: payload.appointment_time.clone(),
            chief_complaint: payload.chief_complaint.clone(),
            notes: payload.notes.clone(),
            status: payload.status.clone(),
            created_at: Some("2025-03-01T08:00:00Z".into()),
            created_by: Some(1),
        }
    }
}

#[async_trait]
impl ClinicBackend for FakeBackend {
    async fn available_schedules(
        &self,
        doctor_id: i64,
        date: &str,
    ) -> Result<Vec<Slot>, BackendError> {
        self.record("available_schedules", format!("available_schedules {doctor_id} {date}"))?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .slots
            .get(date)
            .cloned()
            .unwrap_or_default())
    }

    async fn available_dates(
        &self,
        doctor_id: i64,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<AvailableDate>, BackendError> {
        self.record(
            "available_dates",
            format!("available_dates {doctor_id} {start_date} {end_date}"),
        )?;
        let state = self.state.lock().unwrap();
        let mut dates: Vec<_> = state
            .slots
            .iter()
            .map(|(date, slots)| AvailableDate {
                date: date.clone(),
                has_available_quota: slots.iter().any(Slot::is_bookable),
            })
            .collect();
        dates.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(dates)
    }

    async fn create_appointment(
        &self,
        payload: &AppointmentPayload,
    ) -> Result<Appointment, BackendError> {
        self.record("create_appointment", "create_appointment".into())?;
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        state.payloads.push(payload.clone());
        Ok(Self::appointment(100 + state.next_id, payload))
    }

    async fn update_appointment(
        &self,
        id: i64,
        payload: &AppointmentPayload,
    ) -> Result<Appointment, BackendError> {
        self.record("update_appointment", format!("update_appointment {id}"))?;
        self.state.lock().unwrap().payloads.push(payload.clone());
        Ok(Self::appointment(id, payload))
    }

    async fn delete_appointment(&self, id: i64) -> Result<(), BackendError> {
        self.record("delete_appointment", format!("delete_appointment {id}"))
    }

    async fn update_status(
        &self,
        id: i64,
        status: AppointmentStatus,
    ) -> Result<Appointment, BackendError> {
        self.record("update_status", format!("update_status {id} {status}"))?;
        Ok(crate::panel::tests::appointment(id, status.as_str()))
    }

    async fn save_medical_history(
        &self,
        patient_id: i64,
        _history: &MedicalHistory,
    ) -> Result<(), BackendError> {
        self.record("save_medical_history", format!("save_medical_history {patient_id}"))
    }

    async fn register_patient(
        &self,
        registration: &PatientRegistration,
    ) -> Result<Patient, BackendError> {
        self.record("register_patient", format!("register_patient {}", registration.name))?;
        Ok(Patient {
            id: 500,
            medical_record_number: Some("RM-000500".into()),
            name: registration.name.clone(),
            identity_number: registration.identity_number.clone(),
            birth_date: Some(registration.birth_date.clone()),
            gender: Some(registration.gender),
            phone: Some(registration.phone.clone()),
            address: registration.address.clone(),
            guardian_id: None,
        })
    }

    async fn search_guardians(&self, query: &str) -> Result<Vec<GuardianRecord>, BackendError> {
        self.record("search_guardians", format!("search_guardians {query}"))?;
        Ok(vec![GuardianRecord {
            id: 4,
            name: "Budi Santoso".into(),
            relationship: Some("Ayah".into()),
            phone: None,
            identity_number: None,
        }])
    }
}

/// Answers every prompt with a fixed value and remembers being asked.
#[derive(Debug)]
pub struct ScriptedConfirm {
    answer: bool,
    asked: AtomicBool,
}

impl ScriptedConfirm {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            asked: AtomicBool::new(false),
        }
    }

    pub fn was_asked(&self) -> bool {
        self.asked.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Confirmation for ScriptedConfirm {
    async fn confirm(&self, _prompt: &str) -> bool {
        self.asked.store(true, Ordering::SeqCst);
        self.answer
    }
}

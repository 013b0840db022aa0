use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use api::{
    ApiClient,
    config::Configuration,
    console::{self, ConsoleConfirm},
};
use clap::{Parser, Subcommand};
use eyre::{Context as _, Report, Result, bail};
use init_tracing_opentelemetry::TracingConfig;
use serde::de::DeserializeOwned;
use time::OffsetDateTime;
use tracing::info;
use tracing_log_error::log_error;
use workflow::{
    AlwaysConfirm, Appointment, AppointmentContext, AppointmentStatus, AppointmentWorkspace,
    BackendError, ClinicBackend, Confirmation, FieldErrors, PanelModeSelector, WorkflowError,
    format::{Locale, format_date},
    history::{self, HistoryQuery, SortOrder},
    medical_history::{self, MedicalHistory},
    models::ContextMode,
    patient::{self, PatientRegistration},
    schedule::ScheduleAvailabilityFetcher,
};

/// Front desk client of the clinic backend.
#[derive(Debug, Parser)]
#[command(name = "clinic", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List a doctor's slots on one date.
    Schedules {
        #[arg(long)]
        doctor: i64,
        /// `YYYY-MM-DD`
        #[arg(long)]
        date: String,
    },

    /// Show which dates in a range still have quota.
    Dates {
        #[arg(long)]
        doctor: i64,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },

    /// Book a new appointment. Without `--slot` the day's slots are listed.
    Book {
        #[arg(long)]
        patient: i64,
        #[arg(long)]
        doctor: i64,
        #[arg(long)]
        date: String,
        #[arg(long)]
        slot: Option<i64>,
        #[arg(long, default_value = "")]
        complaint: String,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Reschedule or amend the appointment described by a page context.
    Edit {
        /// JSON file holding the appointment context.
        #[arg(long)]
        context: PathBuf,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        slot: Option<i64>,
        #[arg(long)]
        complaint: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete the appointment described by a page context.
    Delete {
        #[arg(long)]
        context: PathBuf,
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },

    /// Request a status change.
    Status {
        #[arg(long)]
        id: i64,
        /// e.g. `confirmed`, `in_progress`, `no_show`
        status: AppointmentStatus,
    },

    /// Show the panel and controls a page context opens with.
    Panel {
        #[arg(long)]
        context: PathBuf,
    },

    /// Filter and page a list of appointments.
    History {
        /// JSON file holding an array of appointments.
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        status: Option<AppointmentStatus>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        oldest_first: bool,
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long, default_value_t = history::DEFAULT_PER_PAGE)]
        per_page: usize,
    },

    /// Save a patient's medical history from a JSON file.
    MedicalHistory {
        #[arg(long)]
        patient: i64,
        #[arg(long)]
        file: PathBuf,
    },

    /// Register a patient from a JSON file.
    Register {
        #[arg(long)]
        file: PathBuf,
    },

    /// Search guardians by name.
    Guardians { search: String },
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = tokio::fs::read(path)
        .await
        .wrap_err_with(|| format!("could not read {}", path.display()))?;

    serde_json::from_slice(&raw).wrap_err_with(|| format!("{} is not valid JSON", path.display()))
}

fn print_appointment(appointment: &Appointment, locale: Locale) {
    println!("{}", console::appointment_line(appointment, locale));
}

async fn book(
    api: ApiClient,
    locale: Locale,
    (patient, doctor): (i64, i64),
    date: &str,
    slot: Option<i64>,
    complaint: String,
    notes: Option<String>,
) -> Result<()> {
    let context = AppointmentContext {
        mode: Some(ContextMode::CreateNew),
        ..AppointmentContext::default()
    };
    let mut workspace =
        AppointmentWorkspace::new(api, AlwaysConfirm, &context, patient, doctor, Vec::new())
            .with_locale(locale);

    workspace.change_date(date).await?;

    let Some(slot) = slot else {
        println!("Jadwal {}:", format_date(date, locale));
        for slot in workspace.form().schedules() {
            println!("  {}", console::slot_line(slot, locale));
        }
        return Ok(());
    };

    workspace.select_slot(slot)?;
    workspace.set_chief_complaint(complaint);
    if let Some(notes) = notes {
        workspace.set_notes(notes);
    }

    let created = workspace.submit().await?;
    println!("Janji temu dibuat:");
    print_appointment(&created, locale);
    Ok(())
}

async fn edit(
    api: ApiClient,
    locale: Locale,
    context: &AppointmentContext,
    date: Option<String>,
    slot: Option<i64>,
    complaint: Option<String>,
    notes: Option<String>,
) -> Result<()> {
    let Some(current) = context.appointment_to_show.as_ref() else {
        bail!("the context does not name an appointment");
    };
    let (patient, doctor) = (current.patient_id, current.doctor_id);

    let mut workspace =
        AppointmentWorkspace::new(api, AlwaysConfirm, context, patient, doctor, Vec::new())
            .with_locale(locale);

    workspace.request_edit().await?;
    if let Some(date) = date {
        workspace.change_date(&date).await?;
    }
    if let Some(slot) = slot {
        workspace.select_slot(slot)?;
    }
    if let Some(complaint) = complaint {
        workspace.set_chief_complaint(complaint);
    }
    if let Some(notes) = notes {
        workspace.set_notes(notes);
    }

    let updated = workspace.submit().await?;
    println!("Janji temu diperbarui:");
    print_appointment(&updated, locale);
    Ok(())
}

async fn delete<C: Confirmation>(
    api: ApiClient,
    locale: Locale,
    context: &AppointmentContext,
    confirm: C,
) -> Result<()> {
    let (patient, doctor) = context
        .appointment_to_show
        .as_ref()
        .map_or((0, 0), |a| (a.patient_id, a.doctor_id));

    let mut workspace =
        AppointmentWorkspace::new(api, confirm, context, patient, doctor, Vec::new())
            .with_locale(locale);

    if workspace.delete().await? {
        println!("Janji temu dihapus.");
    } else {
        println!("Penghapusan dibatalkan.");
    }
    Ok(())
}

async fn run(command: Command, api: ApiClient) -> Result<()> {
    let locale = api.config.locale;

    match command {
        Command::Schedules { doctor, date } => {
            let slots = ScheduleAvailabilityFetcher::fetch(&api, doctor, &date).await?;
            if slots.is_empty() {
                println!("Tidak ada jadwal pada {}.", format_date(&date, locale));
            }
            for slot in &slots {
                println!("{}", console::slot_line(slot, locale));
            }
        }
        Command::Dates { doctor, from, to } => {
            let dates = ScheduleAvailabilityFetcher::fetch_dates(&api, doctor, &from, &to).await?;
            for date in dates {
                let mark = if date.has_available_quota { "tersedia" } else { "penuh" };
                println!("{}  {mark}", format_date(&date.date, locale));
            }
        }
        Command::Book {
            patient,
            doctor,
            date,
            slot,
            complaint,
            notes,
        } => book(api, locale, (patient, doctor), &date, slot, complaint, notes).await?,
        Command::Edit {
            context,
            date,
            slot,
            complaint,
            notes,
        } => {
            let context: AppointmentContext = read_json(&context).await?;
            edit(api, locale, &context, date, slot, complaint, notes).await?;
        }
        Command::Delete { context, yes } => {
            let context: AppointmentContext = read_json(&context).await?;
            if yes {
                delete(api, locale, &context, AlwaysConfirm).await?;
            } else {
                delete(api, locale, &context, ConsoleConfirm).await?;
            }
        }
        Command::Status { id, status } => {
            let appointment = api.update_status(id, status).await?;
            print_appointment(&appointment, locale);
        }
        Command::Panel { context } => {
            let context: AppointmentContext = read_json(&context).await?;
            let panel = PanelModeSelector::from_context(&context);

            println!("mode: {}", panel.mode());
            if let Some(appointment) = panel.displayed() {
                print_appointment(appointment, locale);
                println!("aksi: {}", console::controls_line(panel.controls()));
            }
            if !context.message.is_empty() {
                println!("{}", context.message);
            }
        }
        Command::History {
            file,
            status,
            search,
            oldest_first,
            page,
            per_page,
        } => {
            let appointments: Vec<Appointment> = read_json(&file).await?;
            let query = HistoryQuery {
                status,
                search,
                order: if oldest_first {
                    SortOrder::OldestFirst
                } else {
                    SortOrder::NewestFirst
                },
                page,
                per_page,
            };
            let page = history::render(&appointments, &query);
            println!("{}", console::history_page(&page, locale));
        }
        Command::MedicalHistory { patient, file } => {
            let record: MedicalHistory = read_json(&file).await?;
            medical_history::save(&api, patient, &record).await?;
            println!("Riwayat medis disimpan.");
        }
        Command::Register { file } => {
            let registration: PatientRegistration = read_json(&file).await?;
            let today = OffsetDateTime::now_local()
                .unwrap_or_else(|_| OffsetDateTime::now_utc())
                .date();

            let created = patient::register(&api, &registration, today).await?;
            match created.medical_record_number {
                Some(number) => println!("Pasien terdaftar: {} ({number})", created.name),
                None => println!("Pasien terdaftar: {}", created.name),
            }
        }
        Command::Guardians { search } => {
            let guardians = api.search_guardians(&search).await?;
            if guardians.is_empty() {
                println!("Wali tidak ditemukan.");
            }
            for guardian in guardians {
                let relationship = guardian.relationship.as_deref().unwrap_or("-");
                println!("#{:<5} {}  ({relationship})", guardian.id, guardian.name);
            }
        }
    }

    Ok(())
}

/// The per-field messages carried by `report`, if it is a workflow failure.
fn field_errors(report: &Report) -> Option<FieldErrors> {
    if let Some(err) = report.downcast_ref::<WorkflowError>() {
        return match err {
            WorkflowError::Invalid(errors) => Some(errors.clone()),
            WorkflowError::Backend(err) => Some(err.clone().into_field_errors()),
            WorkflowError::Panel(_) | WorkflowError::InFlight(_) => None,
        };
    }

    report
        .downcast_ref::<BackendError>()
        .map(|err| err.clone().into_field_errors())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // load env variables, this is mainly useful for development
    let _ = dotenv::dotenv();

    let cli = Cli::parse();
    let config = Configuration::load()?;

    // initialize tracing + opentelemetry
    let tracing_config = if config.is_production() {
        TracingConfig::production()
    } else {
        TracingConfig::development()
    };
    let _guard = tracing_config.init_subscriber()?;

    info!(base_url = %config.base_url, "using clinic backend");
    let api = ApiClient::new(config)?;

    if let Err(report) = run(cli.command, api).await {
        log_error!(*report, "command failed");

        match field_errors(&report) {
            Some(errors) => eprintln!("Gagal:\n{}", console::field_errors(&errors)),
            None => eprintln!("Gagal: {report}"),
        }
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}

//! Terminal front end: confirmation prompts and plain-text rendering.

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt as _, AsyncWrite, AsyncWriteExt as _, BufReader};
use tracing_log_error::log_error;
use workflow::{
    Appointment, Confirmation, FieldErrors, Slot,
    format::{Locale, format_date, format_time, format_time_range},
    history::HistoryPage,
    panel::PanelControls,
    status,
};

/// Asks on stderr and reads the answer from stdin.
///
/// Anything other than an explicit yes counts as no, including a closed
/// stdin.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleConfirm;

#[async_trait]
impl Confirmation for ConsoleConfirm {
    async fn confirm(&self, prompt: &str) -> bool {
        let mut stdin = BufReader::new(tokio::io::stdin());
        ask(&mut tokio::io::stderr(), &mut stdin, prompt).await
    }
}

/// Writes `prompt` to `out` and reads one answer line from `input`.
///
/// Any I/O failure on either side is logged and counts as no.
async fn ask<W, R>(out: &mut W, input: &mut R, prompt: &str) -> bool
where
    W: AsyncWrite + Unpin,
    R: AsyncBufRead + Unpin,
{
    let question = format!("{prompt} [y/N] ");

    let written = match out.write_all(question.as_bytes()).await {
        Ok(()) => out.flush().await,
        Err(err) => Err(err),
    };
    if let Err(err) = written {
        log_error!(err, "could not write confirmation prompt");
        return false;
    }

    let mut answer = String::new();
    match input.read_line(&mut answer).await {
        Ok(_) => is_yes(&answer),
        Err(err) => {
            log_error!(err, "could not read confirmation answer");
            false
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes" | "ya")
}

/// One line per appointment: id, date, time, status label and complaint.
pub fn appointment_line(appointment: &Appointment, locale: Locale) -> String {
    format!(
        "#{:<5} {}  {}  [{}]  {}",
        appointment.id,
        format_date(&appointment.appointment_date, locale),
        format_time(&appointment.appointment_time, locale),
        status::present(&appointment.status).label,
        appointment.chief_complaint,
    )
}

pub fn slot_line(slot: &Slot, locale: Locale) -> String {
    let availability = if slot.is_bookable() {
        format!("sisa kuota {}", slot.remaining_quota)
    } else {
        "penuh".to_string()
    };

    format!(
        "[{}] {}  {}",
        slot.id,
        format_time_range(&slot.start_time, &slot.end_time, locale),
        availability,
    )
}

/// `field: message`, one per line, indented.
pub fn field_errors(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("  {field}: {message}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn controls_line(controls: PanelControls) -> String {
    let mut offered = Vec::new();
    if controls.edit {
        offered.push("ubah");
    }
    if controls.delete {
        offered.push("hapus");
    }

    if offered.is_empty() {
        "tidak ada aksi".to_string()
    } else {
        offered.join(", ")
    }
}

pub fn history_page(page: &HistoryPage<'_>, locale: Locale) -> String {
    if page.items.is_empty() {
        return "Belum ada riwayat janji temu.".to_string();
    }

    let mut out: Vec<String> = page
        .items
        .iter()
        .map(|a| appointment_line(a, locale))
        .collect();
    out.push(format!(
        "halaman {}/{} ({} janji temu)",
        page.page, page.total_pages, page.total_items
    ));
    out.join("\n")
}

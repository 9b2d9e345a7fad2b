//! Plain-text activity reports emailed to administrators.

use jiff::Timestamp;

use crate::{counters::DailyCounters, lifecycle::CodeStatus};

/// One code shown in the "recent activity" section of a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    /// The code string.
    pub code: String,

    /// House the code was issued for.
    pub house_number: String,

    /// Lifecycle state at report time.
    pub status: CodeStatus,

    /// When the code was issued.
    pub created_at: Timestamp,
}

/// Activity of one condominium over the report period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivitySummary {
    /// Condominium the summary covers.
    pub condominium: String,

    /// Issued/validated/denied tallies for the period.
    pub counters: DailyCounters,

    /// Most recent codes, newest first.
    pub recent: Vec<ReportEntry>,
}

/// Render the email body for a set of per-condominium summaries.
#[must_use]
pub fn render(period_label: &str, summaries: &[ActivitySummary]) -> String {
    let mut body = format!("Reporte de accesos - {period_label}\n");

    if summaries.is_empty() {
        body.push_str("\nSin actividad registrada en el periodo.\n");

        return body;
    }

    for summary in summaries {
        body.push_str(&format!(
            "\n== {} ==\nGenerados: {}\nAvalados: {}\nNegados: {}\n",
            summary.condominium,
            summary.counters.generated,
            summary.counters.validated,
            summary.counters.denied,
        ));

        if summary.recent.is_empty() {
            continue;
        }

        body.push_str("Recientes:\n");

        for entry in &summary.recent {
            body.push_str(&format!(
                "  {} | casa {} | {} | {}\n",
                entry.created_at, entry.house_number, entry.status, entry.code,
            ));
        }
    }

    body
}

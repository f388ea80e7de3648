use chrono::{DateTime, Duration, Utc};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use serde::Serialize;

use infra::db::Db;
use infra::models::{DuesExportRow, ExpenseExportRow, MemberExportRow};
use infra::repos::{DuesRepo, ExpenseRepo, MemberRepo, SettingsRepo};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::services::format_cents;
use crate::services::mailer::{EmailAttachment, Mailer, OutboundEmail};

pub const SETTING_AUTO_EXPORT_ENABLED: &str = "auto_export_enabled";
pub const SETTING_EXPORT_COOLDOWN_MINUTES: &str = "export_cooldown_minutes";
pub const SETTING_LAST_EXPORT_TIME: &str = "last_export_time";

const DEFAULT_COOLDOWN_MINUTES: i64 = 60;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum ExportOutcome {
    /// `auto_export_enabled` was not "true"; nothing touched.
    Disabled,
    /// Still inside the cooldown window; nothing touched.
    CooldownActive,
    /// Nothing changed since the last export. The timestamp is still
    /// advanced so the cooldown window keeps moving.
    NoChanges,
    Exported {
        members: usize,
        dues: usize,
        expenses: usize,
    },
}

#[derive(Debug, PartialEq, Eq)]
enum Gate {
    SkipDisabled,
    SkipCooldown,
    TouchOnly,
    Run,
}

/// The gating decision, separated from IO. Guards short-circuit in
/// order: enabled flag, cooldown, changed-since.
fn gate(
    enabled: Option<&str>,
    last_export: Option<DateTime<Utc>>,
    cooldown_minutes: i64,
    latest_change: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Gate {
    if enabled != Some("true") {
        return Gate::SkipDisabled;
    }
    let Some(last) = last_export else {
        // First ever run: export whatever is there.
        return Gate::Run;
    };
    if now - last < Duration::minutes(cooldown_minutes) {
        return Gate::SkipCooldown;
    }
    match latest_change {
        Some(change) if change > last => Gate::Run,
        _ => Gate::TouchOnly,
    }
}

#[derive(Clone)]
pub struct ExportService {
    db: Db,
    mailer: Mailer,
    config: AppConfig,
}

impl ExportService {
    pub fn new(db: Db, mailer: Mailer, config: AppConfig) -> Self {
        Self { db, mailer, config }
    }

    /// The once-daily entry point, invoked by the external scheduler.
    /// At-most-once-per-interval: the timestamp is advanced as soon as
    /// the gate decides to run, so a failed send is not retried and does
    /// not re-arm the changed-since check.
    pub async fn run_daily(&self) -> Result<ExportOutcome, AppError> {
        let settings = SettingsRepo::new(self.db.clone());

        let enabled = settings.get(SETTING_AUTO_EXPORT_ENABLED).await?;
        let last_export = settings
            .get(SETTING_LAST_EXPORT_TIME)
            .await?
            .and_then(|v| DateTime::parse_from_rfc3339(&v).ok())
            .map(|v| v.with_timezone(&Utc));
        let cooldown_minutes = settings
            .get(SETTING_EXPORT_COOLDOWN_MINUTES)
            .await?
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_COOLDOWN_MINUTES);
        let latest_change = settings.latest_change().await?;
        let now = Utc::now();

        match gate(
            enabled.as_deref(),
            last_export,
            cooldown_minutes,
            latest_change,
            now,
        ) {
            Gate::SkipDisabled => Ok(ExportOutcome::Disabled),
            Gate::SkipCooldown => Ok(ExportOutcome::CooldownActive),
            Gate::TouchOnly => {
                settings
                    .set(SETTING_LAST_EXPORT_TIME, &now.to_rfc3339())
                    .await?;
                Ok(ExportOutcome::NoChanges)
            }
            Gate::Run => {
                settings
                    .set(SETTING_LAST_EXPORT_TIME, &now.to_rfc3339())
                    .await?;

                let (filename, content, counts) = self.build_workbook().await?;
                self.mailer
                    .send(OutboundEmail {
                        to: self.config.export_recipients.clone(),
                        subject: format!("[{}] Data export {}", self.config.org_name,
                            now.format("%Y-%m-%d")),
                        html: format!(
                            "<p>Attached: {} members, {} dues rows, {} expense rows.</p>",
                            counts.0, counts.1, counts.2
                        ),
                        attachment: Some(EmailAttachment { filename, content }),
                    })
                    .await?;

                Ok(ExportOutcome::Exported {
                    members: counts.0,
                    dues: counts.1,
                    expenses: counts.2,
                })
            }
        }
    }

    /// Three-sheet workbook; display fields arrive pre-joined from the
    /// export queries. Also backs the on-demand download route.
    pub async fn build_workbook(
        &self,
    ) -> Result<(String, Vec<u8>, (usize, usize, usize)), AppError> {
        let members = MemberRepo::new(self.db.clone()).export_rows().await?;
        let dues = DuesRepo::new(self.db.clone()).export_rows().await?;
        let expenses = ExpenseRepo::new(self.db.clone()).export_rows().await?;

        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();

        write_members_sheet(workbook.add_worksheet(), &header, &members)?;
        write_dues_sheet(workbook.add_worksheet(), &header, &dues)?;
        write_expenses_sheet(workbook.add_worksheet(), &header, &expenses)?;

        let content = workbook
            .save_to_buffer()
            .map_err(|e| AppError::Internal(format!("Workbook serialization failed: {e}")))?;

        let now = Utc::now();
        let filename = format!(
            "{}_Data_Export_{}_{}.xlsx",
            self.config.org_name.replace(' ', "_"),
            now.format("%Y-%m-%d"),
            now.format("%H%M%S"),
        );

        Ok((filename, content, (members.len(), dues.len(), expenses.len())))
    }
}

fn write_header(
    sheet: &mut Worksheet,
    format: &Format,
    titles: &[&str],
) -> Result<(), AppError> {
    for (col, title) in titles.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *title, format)
            .map_err(|e| AppError::Internal(format!("Workbook write failed: {e}")))?;
    }
    Ok(())
}

fn write_members_sheet(
    sheet: &mut Worksheet,
    header: &Format,
    rows: &[MemberExportRow],
) -> Result<(), AppError> {
    sheet
        .set_name("Members")
        .map_err(|e| AppError::Internal(format!("Workbook write failed: {e}")))?;
    write_header(
        sheet,
        header,
        &[
            "First Name",
            "Last Name",
            "Email",
            "Phone",
            "Team",
            "Playing Role",
            "Date of Birth",
            "Gender",
        ],
    )?;
    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        let cells = [
            row.first_name.clone(),
            row.last_name.clone(),
            row.email.clone(),
            row.phone.clone(),
            row.team_name.clone(),
            row.role.clone().unwrap_or_default(),
            row.date_of_birth
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            row.gender.clone().unwrap_or_default(),
        ];
        for (col, value) in cells.iter().enumerate() {
            sheet
                .write_string(r, col as u16, value.as_str())
                .map_err(|e| AppError::Internal(format!("Workbook write failed: {e}")))?;
        }
    }
    Ok(())
}

fn write_dues_sheet(
    sheet: &mut Worksheet,
    header: &Format,
    rows: &[DuesExportRow],
) -> Result<(), AppError> {
    sheet
        .set_name("Member Dues")
        .map_err(|e| AppError::Internal(format!("Workbook write failed: {e}")))?;
    write_header(
        sheet,
        header,
        &[
            "Member",
            "Email",
            "Year",
            "Tournament Formats",
            "Season Dues",
            "Extra Jersey Dues",
            "Extra Trouser Dues",
            "Credit Adjustment",
            "Total Dues",
            "Due Date",
            "Payment Status",
            "Settlement Date",
            "Comments",
        ],
    )?;
    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        let cells = [
            row.member_name.clone(),
            row.member_email.clone(),
            row.year.to_string(),
            row.format_names.clone().unwrap_or_default(),
            format_cents(row.season_dues_cents),
            format_cents(row.extra_jersey_dues_cents),
            format_cents(row.extra_trouser_dues_cents),
            format_cents(row.credit_adjustment_cents),
            format_cents(row.total_dues_cents),
            row.due_date.format("%Y-%m-%d").to_string(),
            row.payment_status.clone(),
            row.settlement_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            row.comments.clone().unwrap_or_default(),
        ];
        for (col, value) in cells.iter().enumerate() {
            sheet
                .write_string(r, col as u16, value.as_str())
                .map_err(|e| AppError::Internal(format!("Workbook write failed: {e}")))?;
        }
    }
    Ok(())
}

fn write_expenses_sheet(
    sheet: &mut Worksheet,
    header: &Format,
    rows: &[ExpenseExportRow],
) -> Result<(), AppError> {
    sheet
        .set_name("General Expenses")
        .map_err(|e| AppError::Internal(format!("Workbook write failed: {e}")))?;
    write_header(
        sheet,
        header,
        &[
            "Year",
            "Tournament Format",
            "Category",
            "Description",
            "Amount",
            "Paid By",
            "Settlement Status",
            "Settlement Date",
            "Comments",
        ],
    )?;
    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        let cells = [
            row.year.to_string(),
            row.format_name.clone().unwrap_or_default(),
            row.category.clone(),
            row.description.clone().unwrap_or_default(),
            format_cents(row.amount_cents),
            row.paid_by_name.clone(),
            row.settlement_status.clone(),
            row.settlement_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            row.comments.clone().unwrap_or_default(),
        ];
        for (col, value) in cells.iter().enumerate() {
            sheet
                .write_string(r, col as u16, value.as_str())
                .map_err(|e| AppError::Internal(format!("Workbook write failed: {e}")))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(minutes_ago: i64, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::minutes(minutes_ago)
    }

    #[test]
    fn disabled_flag_skips_everything() {
        let now = Utc::now();
        for enabled in [None, Some("false"), Some("TRUE"), Some("1")] {
            assert_eq!(
                gate(enabled, None, 60, Some(now), now),
                Gate::SkipDisabled,
                "{enabled:?} must not export"
            );
        }
    }

    #[test]
    fn first_run_exports_without_a_prior_timestamp() {
        let now = Utc::now();
        assert_eq!(gate(Some("true"), None, 60, None, now), Gate::Run);
        assert_eq!(gate(Some("true"), None, 60, Some(now), now), Gate::Run);
    }

    #[test]
    fn cooldown_window_blocks_a_second_run() {
        let now = Utc::now();
        assert_eq!(
            gate(Some("true"), Some(at(10, now)), 60, Some(now), now),
            Gate::SkipCooldown
        );
    }

    #[test]
    fn unchanged_data_touches_the_timestamp_only() {
        let now = Utc::now();
        let last = at(120, now);
        // Latest change predates the last export.
        assert_eq!(
            gate(Some("true"), Some(last), 60, Some(at(180, now)), now),
            Gate::TouchOnly
        );
        // Empty tables count as unchanged.
        assert_eq!(gate(Some("true"), Some(last), 60, None, now), Gate::TouchOnly);
    }

    #[test]
    fn changed_data_after_cooldown_runs() {
        let now = Utc::now();
        assert_eq!(
            gate(Some("true"), Some(at(120, now)), 60, Some(at(5, now)), now),
            Gate::Run
        );
    }
}

use chrono::{Duration, Utc};

use infra::db::Db;
use infra::models::{EventRow, MemberDuesRow, MemberRow};
use infra::repos::{AccessRepo, DuesRepo, NewNotification, NotificationRepo, SettingsRepo};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::services::mailer::{Mailer, OutboundEmail};
use crate::services::format_cents;

/// Composes notification emails and the in-app audit rows. Every public
/// method is advisory: callers wrap it in `best_effort` and the
/// triggering write stands regardless.
#[derive(Clone)]
pub struct Notifier {
    db: Db,
    mailer: Mailer,
    config: AppConfig,
}

impl Notifier {
    pub fn new(db: Db, mailer: Mailer, config: AppConfig) -> Self {
        Self { db, mailer, config }
    }

    /// Fan out an RSVP change to every admin: one audit row each, plus a
    /// single email to all of them. Returns how many admins were notified.
    pub async fn rsvp_changed(
        &self,
        event: &EventRow,
        member: &MemberRow,
        previous: Option<&str>,
        status: &str,
    ) -> Result<usize, AppError> {
        let admins = AccessRepo::new(self.db.clone()).list_by_role("admin").await?;
        if admins.is_empty() {
            return Ok(0);
        }

        let member_name = format!("{} {}", member.first_name, member.last_name);
        let title = format!("RSVP update for {}", event.title);
        let message = match previous {
            Some(previous) => format!(
                "{member_name} changed their RSVP for '{}' from {previous} to {status}",
                event.title
            ),
            None => format!("{member_name} responded {status} to '{}'", event.title),
        };

        let notifications = NotificationRepo::new(self.db.clone());
        for admin in &admins {
            notifications
                .create(NewNotification {
                    event_id: Some(event.id),
                    member_id: Some(member.id),
                    admin_id: admin.id,
                    kind: "rsvp_change".to_string(),
                    title: title.clone(),
                    message: message.clone(),
                })
                .await?;
        }

        let html = format!(
            "<h3>{title}</h3>\
             <p>{message}</p>\
             <p>Event: {} at {} on {}</p>",
            event.title,
            event.location,
            event.starts_at.format("%Y-%m-%d %H:%M"),
        );
        self.mailer
            .send(OutboundEmail {
                to: admins.iter().map(|a| a.email.clone()).collect(),
                subject: format!("[{}] {title}", self.config.org_name),
                html,
                attachment: None,
            })
            .await?;

        Ok(admins.len())
    }

    /// First email a member gets after their dues row is created.
    pub async fn initial_dues_notice(
        &self,
        member: &MemberRow,
        dues: &MemberDuesRow,
    ) -> Result<(), AppError> {
        let html = format!(
            "<p>Hi {},</p>\
             <p>Your {} season dues have been recorded.</p>\
             <ul>\
             <li>Season dues: {}</li>\
             <li>Extra jersey: {}</li>\
             <li>Extra trousers: {}</li>\
             <li>Adjustment: {}</li>\
             <li><b>Total due: {}</b></li>\
             </ul>\
             <p>Please settle by {}.</p>",
            member.first_name,
            dues.year,
            format_cents(dues.season_dues_cents),
            format_cents(dues.extra_jersey_dues_cents),
            format_cents(dues.extra_trouser_dues_cents),
            format_cents(dues.credit_adjustment_cents),
            format_cents(dues.total_dues_cents),
            dues.due_date.format("%Y-%m-%d"),
        );

        self.mailer
            .send(OutboundEmail {
                to: vec![member.email.clone()],
                subject: format!("[{}] Dues for {}", self.config.org_name, dues.year),
                html,
                attachment: None,
            })
            .await
    }

    /// Admin-invoked batch: one reminder per unpaid dues row. A failed
    /// send is logged and the batch keeps going; returns
    /// (attempted, sent).
    pub async fn dues_reminders(&self) -> Result<(usize, usize), AppError> {
        let unpaid = DuesRepo::new(self.db.clone()).unpaid_with_members().await?;

        let mut sent = 0usize;
        for row in &unpaid {
            let html = format!(
                "<p>Hi {},</p>\
                 <p>This is a reminder that your {} dues of <b>{}</b> are still \
                 outstanding (due {}).</p>",
                row.member_name,
                row.year,
                format_cents(row.total_dues_cents),
                row.due_date.format("%Y-%m-%d"),
            );
            let result = self
                .mailer
                .send(OutboundEmail {
                    to: vec![row.member_email.clone()],
                    subject: format!("[{}] Dues reminder", self.config.org_name),
                    html,
                    attachment: None,
                })
                .await;
            match result {
                Ok(()) => sent += 1,
                Err(error) => {
                    tracing::warn!(%error, member = %row.member_email, "dues reminder failed");
                }
            }
        }

        Ok((unpaid.len(), sent))
    }

    /// Daily change summary to the report recipients. Nothing changed in
    /// the last 24h means no email; returns the per-table counts when a
    /// report was sent.
    pub async fn daily_report(&self) -> Result<Option<(i64, i64, i64)>, AppError> {
        let since = Utc::now() - Duration::hours(24);
        let (members, dues, expenses) = SettingsRepo::new(self.db.clone())
            .changed_counts_since(since)
            .await?;

        if members == 0 && dues == 0 && expenses == 0 {
            return Ok(None);
        }

        let html = format!(
            "<h3>{} daily change report</h3>\
             <table border=\"1\" cellpadding=\"4\">\
             <tr><th>Table</th><th>Rows changed (24h)</th></tr>\
             <tr><td>Members</td><td>{members}</td></tr>\
             <tr><td>Member dues</td><td>{dues}</td></tr>\
             <tr><td>General expenses</td><td>{expenses}</td></tr>\
             </table>",
            self.config.org_name,
        );

        self.mailer
            .send(OutboundEmail {
                to: self.config.report_recipients.clone(),
                subject: format!("[{}] Daily change report", self.config.org_name),
                html,
                attachment: None,
            })
            .await?;

        Ok(Some((members, dues, expenses)))
    }
}

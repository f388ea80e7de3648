pub mod export;
pub mod mailer;
pub mod notifier;

pub use export::{ExportOutcome, ExportService};
pub use mailer::{EmailAttachment, Mailer, OutboundEmail};
pub use notifier::Notifier;

use crate::error::AppError;

/// Advisory side effects (notification fan-out, export email). The
/// enclosing write is authoritative; a failure here is logged and
/// dropped, never propagated to the request.
pub fn best_effort<T>(label: &str, result: Result<T, AppError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            tracing::warn!(%error, "{label} failed");
            None
        }
    }
}

/// Amounts are stored as integer cents; emails and spreadsheets show
/// them as decimal currency.
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_cents_as_decimal() {
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_cents(13000), "130.00");
        assert_eq!(format_cents(2050), "20.50");
        assert_eq!(format_cents(-500), "-5.00");
        assert_eq!(format_cents(7), "0.07");
    }

    #[test]
    fn best_effort_swallows_errors() {
        let ok: Result<u32, AppError> = Ok(3);
        assert_eq!(best_effort("test", ok), Some(3));
        let err: Result<u32, AppError> = Err(AppError::Internal("boom".into()));
        assert_eq!(best_effort("test", err), None);
    }
}

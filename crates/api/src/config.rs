use anyhow::Context;

#[derive(Debug, Clone)]
pub struct MailConfig {
    /// HTTP send endpoint of the email provider.
    pub api_url: String,
    pub api_key: String,
    pub from: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub org_name: String,
    /// Recipients of the spreadsheet export email.
    pub export_recipients: Vec<String>,
    /// Recipients of the daily change report.
    pub report_recipients: Vec<String>,
    /// Shared secret the external scheduler sends in `X-Cron-Secret`.
    pub cron_secret: String,
    pub mail: MailConfig,
}

fn split_recipients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            org_name: std::env::var("ORG_NAME").unwrap_or_else(|_| "Club".to_string()),
            export_recipients: split_recipients(
                &std::env::var("EXPORT_RECIPIENTS").unwrap_or_default(),
            ),
            report_recipients: split_recipients(
                &std::env::var("REPORT_RECIPIENTS").unwrap_or_default(),
            ),
            cron_secret: std::env::var("CRON_SECRET").context("CRON_SECRET is required")?,
            mail: MailConfig {
                api_url: std::env::var("MAIL_API_URL")
                    .unwrap_or_else(|_| "https://api.resend.com/emails".to_string()),
                api_key: std::env::var("MAIL_API_KEY").context("MAIL_API_KEY is required")?,
                from: std::env::var("MAIL_FROM").context("MAIL_FROM is required")?,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipients_split_and_trim() {
        let got = split_recipients(" treasurer@club.org, ,secretary@club.org ");
        assert_eq!(got, vec!["treasurer@club.org", "secretary@club.org"]);
    }

    #[test]
    fn empty_recipient_list_is_empty() {
        assert!(split_recipients("").is_empty());
    }
}

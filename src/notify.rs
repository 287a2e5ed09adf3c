use crate::config::MailConfig;
use crate::logging::LOG_FILE_NAME;
use crate::summary::RunSummary;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::fs;
use std::path::Path;
use tracing::{error, info};

pub fn compose_subject(today: NaiveDate) -> String {
    format!("Automation Summary for {}", today.format("%Y-%m-%d"))
}

pub fn compose_body(summary: &RunSummary) -> String {
    let mut body = format!("Files Processed: {}\n", summary.processed.len());
    if !summary.processed.is_empty() {
        body.push_str("Processed files:\n");
        for name in summary.processed.iter() {
            body.push_str(name);
            body.push('\n');
        }
    }
    if !summary.errors.is_empty() {
        body.push_str("\nErrors:\n");
        for err in summary.errors.iter() {
            body.push_str(&err.to_string());
            body.push('\n');
        }
    }
    body
}

/// Builds the summary mail, addressed from and to the configured user, with
/// the log file attached.
pub fn build_message(
    config: &MailConfig,
    summary: &RunSummary,
    log_file: &Path,
    today: NaiveDate,
) -> Result<Message> {
    let (user, _) = config.credentials()?;
    let mailbox: Mailbox = user
        .parse()
        .with_context(|| format!("Invalid email address {:?}", user))?;
    let log = fs::read(log_file)
        .with_context(|| format!("Failed to read log file {}", log_file.display()))?;
    let attachment = Attachment::new(LOG_FILE_NAME.to_string())
        .body(log, ContentType::parse("application/octet-stream")?);

    let message = Message::builder()
        .from(mailbox.clone())
        .to(mailbox)
        .subject(compose_subject(today))
        .multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::plain(compose_body(summary)))
                .singlepart(attachment),
        )
        .context("Failed to build summary email")?;
    Ok(message)
}

fn send(config: &MailConfig, summary: &RunSummary, log_file: &Path, today: NaiveDate) -> Result<()> {
    let (user, pass) = config.credentials()?;
    let message = build_message(config, summary, log_file, today)?;
    let mailer = SmtpTransport::relay(&config.smtp_host)
        .with_context(|| format!("Failed to set up TLS for {}", config.smtp_host))?
        .port(config.smtp_port)
        .credentials(Credentials::new(user.to_string(), pass.to_string()))
        .build();
    mailer
        .send(&message)
        .with_context(|| format!("Failed to deliver via {}:{}", config.smtp_host, config.smtp_port))?;
    Ok(())
}

/// Mails the run summary. Failures are logged and otherwise ignored, the run
/// itself has already succeeded or failed by the time this is called.
pub fn notify(config: &MailConfig, summary: &RunSummary, log_file: &Path, today: NaiveDate) {
    match send(config, summary, log_file, today) {
        Ok(()) => info!("Summary email sent successfully"),
        Err(err) => error!("Failed to send summary email: {:#}", err),
    }
}

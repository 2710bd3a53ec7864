use crate::config::SmtpConfig;
use crate::error::Result;
use crate::models::RecordedRsvp;
use lettre::message::header::ContentType;
use lettre::message::{header, Mailbox, Mailboxes};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use log::{error, info};
use std::env;

struct Mailer {
    transport: SmtpTransport,
    from: Mailbox,
    to: Mailboxes,
}

/// E-mails the hosts whenever a guest answers. Does nothing unless SMTP is configured.
pub struct Notifier {
    mailer: Option<Mailer>,
}

impl Notifier {
    pub fn disabled() -> Self {
        Notifier { mailer: None }
    }

    pub fn from_config(config: Option<&SmtpConfig>) -> Result<Self> {
        let config = match config {
            Some(config) => config,
            None => return Ok(Self::disabled()),
        };

        let password = match &config.password {
            Some(password) => password.clone(),
            None => env::var("SMTP_PASSWORD").unwrap_or_default(),
        };
        let creds = Credentials::new(config.username.clone(), password);

        let transport = SmtpTransport::starttls_relay(&config.relay)?
            .credentials(creds)
            .build();

        Ok(Notifier {
            mailer: Some(Mailer {
                transport,
                from: config.from.parse()?,
                to: config.to.parse()?,
            }),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.mailer.is_some()
    }

    /// Sends in the background; failures are only logged.
    pub fn rsvp_received(&self, token: &str, rsvp: &RecordedRsvp) {
        let mailer = match &self.mailer {
            Some(mailer) => mailer,
            None => return,
        };

        let email = match compose(mailer, token, rsvp) {
            Ok(email) => email,
            Err(e) => {
                error!("Could not build RSVP e-mail for {token}: {e}");
                return;
            }
        };

        let transport = mailer.transport.clone();
        let token = token.to_string();
        rocket::tokio::task::spawn_blocking(move || match transport.send(&email) {
            Ok(_) => info!("RSVP e-mail for {token} sent"),
            Err(e) => error!("Could not send RSVP e-mail for {token}: {e}"),
        });
    }
}

fn subject(token: &str, rsvp: &RecordedRsvp) -> String {
    format!("RSVP {token}: {}", rsvp.status.label())
}

fn body(token: &str, rsvp: &RecordedRsvp) -> String {
    let comment = if rsvp.comment.is_empty() {
        "-"
    } else {
        rsvp.comment.as_str()
    };

    format!(
        "Invitation: {token}\nSheet row: {}\nAnswer: {}\nComment: {comment}\nSubmitted: {}\n",
        rsvp.row,
        rsvp.status.label(),
        rsvp.submitted_at,
    )
}

fn compose(mailer: &Mailer, token: &str, rsvp: &RecordedRsvp) -> Result<Message> {
    let to_header: header::To = mailer.to.clone().into();

    Ok(Message::builder()
        .mailbox(to_header)
        .from(mailer.from.clone())
        .subject(subject(token, rsvp))
        .header(ContentType::TEXT_PLAIN)
        .body(body(token, rsvp))?)
}

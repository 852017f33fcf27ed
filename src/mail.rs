use anyhow::Context;
use askama::Template;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
#[cfg(test)]
use lettre::transport::stub::StubTransport;
use lettre::{Message, SmtpTransport, Transport};

use crate::config::MailConfig;
use crate::models::user::User;

#[derive(Template)]
#[template(path = "mail/new_user.txt")]
struct NewUserText<'a> {
    user: &'a User,
}

#[derive(Template)]
#[template(path = "mail/new_user.html")]
struct NewUserHtml<'a> {
    user: &'a User,
}

#[derive(Clone)]
enum Backend {
    Smtp(SmtpTransport),
    #[cfg(test)]
    Stub(StubTransport),
    Off,
}

/// Fire-and-forget notification sender. No retry, no queuing; a transport
/// fault bubbles up to the caller.
#[derive(Clone)]
pub struct Mailer {
    backend: Backend,
    sender: String,
    admin: Option<String>,
    subject_prefix: String,
}

impl Mailer {
    pub fn from_env() -> anyhow::Result<Mailer> {
        match MailConfig::from_env() {
            Some(config) => Mailer::new(config),
            None => {
                log::info!("MAIL_SERVER not set, mail notifications are disabled");
                Ok(Mailer::disabled())
            }
        }
    }

    pub fn new(config: MailConfig) -> anyhow::Result<Mailer> {
        let mut builder = if config.use_tls {
            SmtpTransport::starttls_relay(&config.server)
                .context("cannot configure STARTTLS relay")?
        } else {
            SmtpTransport::builder_dangerous(&config.server)
        };
        builder = builder.port(config.port);
        if let (Some(username), Some(password)) = (config.username, config.password) {
            builder = builder.credentials(Credentials::new(username, password));
        }
        Ok(Mailer {
            backend: Backend::Smtp(builder.build()),
            sender: config.sender,
            admin: config.admin,
            subject_prefix: config.subject_prefix,
        })
    }

    pub fn disabled() -> Mailer {
        Mailer {
            backend: Backend::Off,
            sender: String::new(),
            admin: None,
            subject_prefix: String::new(),
        }
    }

    /// Composes a multipart/alternative message from a text and an HTML
    /// rendition of the same mail template and dispatches it. Returns
    /// whether a message actually went out.
    pub fn send(
        &self,
        to: &str,
        subject: &str,
        text: &impl Template,
        html: &impl Template,
    ) -> anyhow::Result<bool> {
        if let Backend::Off = self.backend {
            return Ok(false);
        }
        let message = Message::builder()
            .from(
                self.sender
                    .parse::<Mailbox>()
                    .context("invalid sender address")?,
            )
            .to(to.parse::<Mailbox>().context("invalid recipient address")?)
            .subject(format!("{} {}", self.subject_prefix, subject))
            .multipart(MultiPart::alternative_plain_html(
                text.render().context("cannot render text body")?,
                html.render().context("cannot render html body")?,
            ))?;
        match &self.backend {
            Backend::Smtp(transport) => {
                transport.send(&message).context("smtp delivery failed")?;
            }
            #[cfg(test)]
            Backend::Stub(transport) => {
                transport.send(&message)?;
            }
            Backend::Off => return Ok(false),
        }
        Ok(true)
    }

    /// Tells the administrator about a first-time user. Skipped when no
    /// admin address is configured.
    pub fn notify_new_user(&self, user: &User) -> anyhow::Result<bool> {
        let admin = match &self.admin {
            Some(admin) => admin.clone(),
            None => return Ok(false),
        };
        log::info!("notifying {} about new user {}", admin, user.username);
        self.send(
            &admin,
            "New User",
            &NewUserText { user },
            &NewUserHtml { user },
        )
    }
}

#[cfg(test)]
impl Mailer {
    /// Mailer backed by a recording transport; the returned stub is the
    /// outbox to assert against.
    pub fn stub(admin: Option<&str>) -> (Mailer, StubTransport) {
        let transport = StubTransport::new_ok();
        (
            Mailer {
                backend: Backend::Stub(transport.clone()),
                sender: "Flasky Admin <flasky@example.com>".to_string(),
                admin: admin.map(str::to_string),
                subject_prefix: "[Flasky]".to_string(),
            },
            transport,
        )
    }
}

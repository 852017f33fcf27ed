/// Outbound mail settings, sourced from the environment. `MAIL_SERVER` is
/// the master switch: when it is unset the mailer runs disabled and no
/// notification is ever dispatched.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub server: String,
    pub port: u16,
    pub use_tls: bool,
    pub username: Option<String>,
    pub password: Option<String>,
    pub sender: String,
    pub admin: Option<String>,
    pub subject_prefix: String,
}

impl MailConfig {
    pub fn from_env() -> Option<MailConfig> {
        let server = std::env::var("MAIL_SERVER").ok()?;
        Some(MailConfig {
            server,
            port: std::env::var("MAIL_PORT")
                .ok()
                .and_then(|port| port.parse().ok())
                .unwrap_or(587),
            use_tls: std::env::var("MAIL_USE_TLS")
                .map(|flag| flag == "true" || flag == "1")
                .unwrap_or(false),
            username: std::env::var("MAIL_USERNAME").ok(),
            password: std::env::var("MAIL_PASSWORD").ok(),
            sender: std::env::var("FLASKY_MAIL_SENDER")
                .unwrap_or_else(|_| "Flasky Admin <flasky@example.com>".to_string()),
            admin: std::env::var("FLASKY_ADMIN").ok(),
            subject_prefix: std::env::var("FLASKY_MAIL_SUBJECT_PREFIX")
                .unwrap_or_else(|_| "[Flasky]".to_string()),
        })
    }
}

use actix_session::Session;
use actix_web::{dev::Payload, Error, FromRequest, HttpRequest};
use futures_util::future::Ready;

/// Per-visitor state carried in the cookie session: the last name submitted
/// through the form and whether that name was already in storage when it
/// was submitted.
#[derive(Debug, Clone)]
pub struct NameSession {
    pub name: Option<String>,
    pub known: bool,
}

impl FromRequest for NameSession {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        if let Ok(session) = Session::extract(req).into_inner() {
            return futures_util::future::ready(Ok(NameSession {
                name: session.get::<String>("name").unwrap_or(None),
                known: session
                    .get::<bool>("known")
                    .unwrap_or(None)
                    .unwrap_or(false),
            }));
        }
        futures_util::future::ready(Ok(NameSession {
            name: None,
            known: false,
        }))
    }
}

pub fn push_flash(session: &Session, message: &str) {
    let mut flashes = session
        .get::<Vec<String>>("flashes")
        .unwrap_or(None)
        .unwrap_or_default();
    flashes.push(message.to_string());
    if let Err(e) = session.insert("flashes", flashes) {
        log::error!("cannot store flash message: {e}");
    }
}

/// Drains the pending flash messages; each is shown exactly once.
pub fn take_flashes(session: &Session) -> Vec<String> {
    match session.remove_as::<Vec<String>>("flashes") {
        Some(Ok(flashes)) => flashes,
        Some(Err(raw)) => {
            log::warn!("could not deserialize flash messages: {raw}");
            Vec::new()
        }
        None => Vec::new(),
    }
}

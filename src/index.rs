use actix_session::Session;
use actix_web::http::header;
use actix_web::{error, get, post, web, HttpResponse, Responder};
use askama::Template;
use serde::{Deserialize, Serialize};

use crate::mail::Mailer;
use crate::middleware::name_session::{push_flash, take_flashes, NameSession};
use crate::models::user::User;

#[derive(Serialize, Deserialize, Debug)]
struct NameForm {
    name: String,
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    name: String,
    known: bool,
    flashes: Vec<String>,
    error: Option<&'static str>,
    current_time: String,
}

fn utc_now() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

#[get("/")]
async fn index(session: Session, name_session: NameSession) -> impl Responder {
    let template = IndexTemplate {
        name: name_session.name.unwrap_or_default(),
        known: name_session.known,
        flashes: take_flashes(&session),
        error: None,
        current_time: utc_now(),
    };
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(template.render().unwrap())
}

#[post("/")]
async fn submit(
    db: web::Data<crate::DbPool>,
    mailer: web::Data<Mailer>,
    form: web::Form<NameForm>,
    session: Session,
    name_session: NameSession,
) -> actix_web::Result<HttpResponse> {
    log::debug!("name form: {form:?}");
    let name = form.name.trim();
    if name.is_empty() {
        let template = IndexTemplate {
            name: name_session.name.unwrap_or_default(),
            known: name_session.known,
            flashes: take_flashes(&session),
            error: Some("This field is required."),
            current_time: utc_now(),
        };
        return Ok(HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(template.render().unwrap()));
    }
    let mut conn = db.get().expect("no connection available");
    let (user, inserted) =
        User::record(&mut conn, name).map_err(error::ErrorInternalServerError)?;
    if inserted {
        log::info!("new user recorded: {}", user.username);
        mailer
            .notify_new_user(&user)
            .map_err(error::ErrorInternalServerError)?;
    }
    if let Some(previous) = name_session.name {
        if previous != name {
            push_flash(&session, "Looks like you have changed your name!");
        }
    }
    session.insert("name", name)?;
    session.insert("known", !inserted)?;
    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, "/"))
        .finish())
}

use actix_web::{get, web, HttpResponse, Responder};
use askama::Template;

#[derive(Template)]
#[template(path = "user.html")]
struct UserTemplate<'a> {
    name: &'a str,
}

#[get("/user/{name}")]
async fn user_page(name: web::Path<String>) -> impl Responder {
    let name = name.into_inner();
    let template = UserTemplate { name: &name };
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(template.render().unwrap())
}

use actix_web::dev::ServiceResponse;
use actix_web::http::header::{HeaderValue, CONTENT_TYPE};
use actix_web::middleware::ErrorHandlerResponse;
use actix_web::{HttpResponse, Responder};
use askama::Template;

#[derive(Template)]
#[template(path = "404.html")]
struct NotFoundTemplate;

#[derive(Template)]
#[template(path = "500.html")]
struct InternalServerErrorTemplate;

/// Default service for paths no route matched.
pub async fn not_found() -> impl Responder {
    HttpResponse::NotFound()
        .content_type("text/html; charset=utf-8")
        .body(NotFoundTemplate.render().unwrap())
}

/// Swaps the body of any 500 response for the themed error page. Registered
/// with `ErrorHandlers` so handler faults and framework faults look alike.
pub fn render_internal_error<B>(
    res: ServiceResponse<B>,
) -> actix_web::Result<ErrorHandlerResponse<B>> {
    log::error!("internal server error on {}", res.request().path());
    let (req, res) = res.into_parts();
    let mut res = res.set_body(InternalServerErrorTemplate.render().unwrap());
    res.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    let res = ServiceResponse::new(req, res)
        .map_into_boxed_body()
        .map_into_right_body();
    Ok(ErrorHandlerResponse::Response(res))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{error, test, web, HttpResponse};

    use crate::mail::Mailer;
    use crate::test_util::{read_body_string, test_app, test_pool};

    #[actix_web::test]
    async fn unknown_paths_get_the_themed_not_found_page() {
        let pool = test_pool();
        let app = test_app!(pool, Mailer::disabled());
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/no/such/page").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body = read_body_string(res).await;
        assert!(body.contains("Not Found"));
    }

    #[actix_web::test]
    async fn handler_faults_get_the_themed_error_page() {
        async fn boom() -> actix_web::Result<HttpResponse> {
            Err(error::ErrorInternalServerError("boom"))
        }
        let pool = test_pool();
        let app = test_app!(pool, Mailer::disabled(), |app| {
            app.route("/boom", web::get().to(boom))
        });
        let res =
            test::call_service(&app, test::TestRequest::get().uri("/boom").to_request()).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = read_body_string(res).await;
        assert!(body.contains("Internal Server Error"));
    }
}

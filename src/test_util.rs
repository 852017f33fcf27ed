use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::SqliteConnection;
use diesel_migrations::MigrationHarness;

use crate::DbPool;

/// In-memory SQLite pool with the schema applied. Capped at one connection
/// so every checkout sees the same database.
pub fn test_pool() -> DbPool {
    let manager = ConnectionManager::<SqliteConnection>::new(":memory:");
    let pool = Pool::builder()
        .max_size(1)
        .build(manager)
        .expect("failed to build test pool");
    let mut conn = pool.get().expect("cannot get connection from pool");
    conn.run_pending_migrations(crate::MIGRATIONS)
        .expect("migrations failed");
    pool
}

pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "id")
        .map(|cookie| cookie.into_owned())
}

pub async fn read_body_string<B: MessageBody>(res: ServiceResponse<B>) -> String {
    let body = actix_web::test::read_body(res).await;
    String::from_utf8(body.to_vec()).expect("body is not utf-8")
}

/// Applies `extra` to `app`. Gives closure arguments to `test_app!` a
/// signature expectation so their parameter type can be inferred.
pub fn customize<A, B>(app: A, extra: impl FnOnce(A) -> B) -> B {
    extra(app)
}

/// Builds the application the way `main` wires it, minus TLS-only cookie
/// attributes. The optional third argument adds extra routes.
macro_rules! test_app {
    ($pool:expr, $mailer:expr) => {
        crate::test_util::test_app!($pool, $mailer, |app| app)
    };
    ($pool:expr, $mailer:expr, $extra:expr) => {{
        let app = actix_web::App::new()
            .app_data(actix_web::web::Data::new($pool.clone()))
            .app_data(actix_web::web::Data::new($mailer.clone()))
            .wrap(actix_web::middleware::ErrorHandlers::new().handler(
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                crate::errors::render_internal_error,
            ))
            .wrap(
                actix_session::SessionMiddleware::builder(
                    actix_session::storage::CookieSessionStore::default(),
                    actix_web::cookie::Key::generate(),
                )
                .cookie_secure(false)
                .build(),
            )
            .service(crate::index::index)
            .service(crate::index::submit)
            .service(crate::user::user_page);
        let app = crate::test_util::customize(app, $extra);
        actix_web::test::init_service(
            app.default_service(actix_web::web::route().to(crate::errors::not_found)),
        )
        .await
    }};
}
pub(crate) use test_app;

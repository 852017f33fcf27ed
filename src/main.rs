use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::Key;
use actix_web::http::StatusCode;
use actix_web::middleware::ErrorHandlers;
use actix_web::{web, App, HttpServer};
use base64::Engine;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use diesel::sqlite::Sqlite;
use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

mod config;
mod errors;
mod index;
mod mail;
mod middleware;
mod models;
pub mod schema;
#[cfg(test)]
mod test_util;
mod user;

pub type DbPool = diesel::r2d2::Pool<diesel::r2d2::ConnectionManager<SqliteConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

#[derive(Subcommand, Debug)]
enum CliCommands {
    Serve,
    Migrate,
    CreateSessionKey,
    CreateRole(CreateRoleArgs),
}

#[derive(Args, Debug)]
struct CreateRoleArgs {
    name: String,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct CliArgs {
    // command used (default "serve")
    #[command(subcommand)]
    command: CliCommands,
}

fn create_session_key() -> Key {
    Key::generate()
}

fn run_migrations(
    connection: &mut impl MigrationHarness<Sqlite>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    log::info!("running migrations ...");
    connection.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}

fn get_session_key() -> Key {
    let key = std::env::var("SECRET_KEY").unwrap_or_else(|_| {
        let key = create_session_key();
        let key_master = base64::engine::general_purpose::STANDARD.encode(key.master());
        log::info!("No SECRET_KEY env found, generating new one. Please set SECRET_KEY to the following value before restarting: {}", key_master);
        key_master
    });
    Key::from(
        &base64::engine::general_purpose::STANDARD
            .decode(key)
            .expect("cannot decode base64 SECRET_KEY"),
    )
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    pretty_env_logger::init_timed();
    let cli = CliArgs::parse();
    log::debug!("Command Line Args: {:?}", cli);
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let manager = diesel::r2d2::ConnectionManager::<SqliteConnection>::new(&database_url);
    let pool = diesel::r2d2::Pool::builder()
        .build(manager)
        .expect("failed to build connection pool");
    match cli.command {
        CliCommands::CreateSessionKey => {
            log::info!("Generating session key");
            let key = create_session_key();
            let key_master = base64::engine::general_purpose::STANDARD.encode(key.master());
            log::info!("master: {}", key_master);
            Ok(())
        }
        CliCommands::CreateRole(role) => {
            let new_role = models::role::NewRole { name: role.name };
            let mut conn = pool.get().expect("cannot get connection from pool!");
            let result = new_role.insert(&mut conn);
            log::info!("Inserted Role: {result:?}");
            Ok(())
        }
        CliCommands::Migrate => {
            let mut conn = pool.get().expect("cannot get connection from pool!");
            run_migrations(&mut conn).expect("migrations have not been run successfully");
            Ok(())
        }
        CliCommands::Serve => {
            let session_key = get_session_key();
            let mailer = web::Data::new(
                mail::Mailer::from_env().expect("cannot configure mail transport"),
            );
            let pool = web::Data::new(pool);
            HttpServer::new(move || {
                App::new()
                    .app_data(pool.clone())
                    .app_data(mailer.clone())
                    .wrap(actix_web::middleware::Logger::default())
                    .wrap(
                        ErrorHandlers::new()
                            .handler(StatusCode::INTERNAL_SERVER_ERROR, errors::render_internal_error),
                    )
                    .wrap(SessionMiddleware::new(
                        CookieSessionStore::default(),
                        session_key.clone(),
                    ))
                    // resources which are always available
                    .service(actix_files::Files::new("/css/", "static/css/"))
                    .service(index::index)
                    .service(index::submit)
                    .service(user::user_page)
                    .default_service(web::route().to(errors::not_found))
            })
            .bind(("0.0.0.0", 8080))?
            .run()
            .await
        }
    }
}

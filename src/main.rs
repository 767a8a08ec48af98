use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::{Key, SameSite};
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer};
use env_logger::Env;
use rand::{distributions::Alphanumeric, Rng};
use studyhall::db::init_db;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_lib_mods();
    studyhall::app_config::init();
    init_db(std::env::var("DATABASE_URL").expect("DATABASE_URL must be set.")).await;

    let secret_key = match std::env::var("SECRET_KEY") {
        Ok(key) => Key::from(key.as_bytes()),
        Err(err) => {
            let random_string: String = rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(128)
                .map(char::from)
                .collect();
            log::warn!(
                "SECRET_KEY was invalid ({:?}); session cookies will not survive a restart. A secret key must be at least 64 bytes.",
                err
            );
            Key::from(random_string.as_bytes())
        }
    };

    let bind = studyhall::app_config::server().bind;
    log::info!("Listening on {}", bind);

    HttpServer::new(move || {
        App::new()
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_same_site(SameSite::Lax)
                    .cookie_secure(false) // Allow HTTP for development
                    .build(),
            )
            .wrap(Logger::new("%a %{User-Agent}i"))
            .configure(studyhall::web::configure)
    })
    .bind(&bind)?
    .run()
    .await
}

/// Initialize third party crates we rely on but don't have control over.
fn init_lib_mods() {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
}

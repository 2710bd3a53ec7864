#[macro_use]
extern crate rocket;

use config::AppConfig;
use log::{error, info};
use notify::Notifier;
use rocket::fairing::AdHoc;
use rocket::figment::Figment;
use rocket::fs::{FileServer, Options};
use rocket::{Build, Rocket};
use rocket_dyn_templates::Template;
use routes::Store;
use sheets::GoogleSheets;
use std::sync::Arc;

pub mod auth;
pub mod config;
pub mod error;
pub mod invitation;
pub mod models;
pub mod notify;
pub mod routes;
pub mod schema;
pub mod sheets;

/// Routes, templates, static files and e-mail notifications. The caller
/// decides where guest data lives by managing a [`Store`].
pub fn build(figment: Figment) -> Rocket<Build> {
    rocket::custom(figment)
        .mount(
            "/",
            routes![
                routes::invitation,
                routes::confirm,
                routes::confirm_form,
                routes::confirm_unsupported
            ],
        )
        .register("/", catchers![routes::not_found])
        .register("/confirm", catchers![routes::confirm_failed, routes::confirm_not_found])
        .attach(AdHoc::config::<AppConfig>())
        .attach(Template::fairing())
        .attach(AdHoc::on_ignite("Static files", |rocket| async {
            let dir = match rocket.state::<AppConfig>() {
                Some(config) => config.static_dir.clone(),
                None => return rocket,
            };
            rocket.mount("/", FileServer::new(dir, Options::Index | Options::Missing))
        }))
        .attach(AdHoc::try_on_ignite("Mail notifications", |rocket| async {
            let smtp = rocket.state::<AppConfig>().and_then(|c| c.smtp.clone());
            match Notifier::from_config(smtp.as_ref()) {
                Ok(notifier) => {
                    if notifier.is_enabled() {
                        info!("RSVP e-mail notifications enabled");
                    }
                    Ok(rocket.manage(notifier))
                }
                Err(e) => {
                    error!("Invalid SMTP configuration: {e}");
                    Err(rocket)
                }
            }
        }))
}

/// The production service backed by Google Sheets.
pub fn rocket() -> Rocket<Build> {
    build(config::figment()).attach(AdHoc::on_ignite("Google Sheets", |rocket| async {
        let store = match rocket.state::<AppConfig>() {
            Some(config) => connect_sheets(config),
            None => return rocket,
        };
        rocket.manage(store)
    }))
}

// Credential problems are logged, not fatal: requests then fail with a 500
// explaining the server is not signed in.
fn connect_sheets(config: &AppConfig) -> Store {
    let http = reqwest::Client::new();

    let auth = match auth::load_credentials(&config.credentials_file) {
        Ok(Some(key)) => match auth::TokenProvider::new(key, http.clone()) {
            Ok(provider) => {
                info!("Signed in to Google as {}", provider.client_email());
                Some(provider)
            }
            Err(e) => {
                error!("Unusable Google credentials: {e}");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            error!("Could not load Google credentials: {e}");
            None
        }
    };

    Arc::new(GoogleSheets::new(http, config.sheet_id.clone(), auth))
}

use crate::config::AppConfig;
use crate::invitation::{find_invitee, record_rsvp};
use crate::models::{format_timestamp, Rsvp, RsvpJson};
use crate::notify::Notifier;
use crate::schema::SheetLayout;
use crate::sheets::SheetStore;
use chrono::Local;
use log::{error, info};
use rocket::form::Form;
use rocket::serde::json::Json;
use rocket::http::Status;
use rocket::{Request, State};
use rocket_dyn_templates::{context, Template};
use serde::Serialize;
use std::sync::Arc;

pub type Store = Arc<dyn SheetStore>;

#[derive(Responder)]
pub enum InvitationPage {
    #[response(status = 200)]
    Found(Template),
    #[response(status = 404)]
    NotFound(Template),
    #[response(status = 204)]
    NoContent(()),
    #[response(status = 500)]
    Failed(String),
}

#[derive(Debug, Serialize)]
pub struct Confirmation {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Responder)]
pub enum ConfirmResponse {
    #[response(status = 200)]
    Recorded(Json<Confirmation>),
    #[response(status = 404)]
    UnknownToken(Json<Confirmation>),
    #[response(status = 415)]
    Unsupported(Json<Confirmation>),
    #[response(status = 500)]
    Failed(Json<Confirmation>),
}

impl Confirmation {
    fn failed(error: impl Into<String>) -> Json<Self> {
        Json(Confirmation {
            success: false,
            error: Some(error.into()),
        })
    }
}

// Browsers ask for these on every page; they never name a guest.
fn is_browser_request(token: &str) -> bool {
    token == "favicon.ico" || token.ends_with(".map")
}

// Ranked below the static file server so assets under `static_dir` win.
#[get("/<token>", rank = 20)]
pub async fn invitation(
    token: &str,
    store: &State<Store>,
    config: &State<AppConfig>,
) -> InvitationPage {
    if is_browser_request(token) {
        return InvitationPage::NoContent(());
    }

    let layout = SheetLayout::new(&config.sheet_name);
    match find_invitee(store.inner().as_ref(), &layout, token).await {
        Ok(Some(invitee)) => InvitationPage::Found(Template::render("index", context! {
            user: invitee,
        })),
        Ok(None) => InvitationPage::NotFound(Template::render("404", context! {})),
        Err(e) => {
            error!("Google Sheets lookup for {token} failed: {e}");
            InvitationPage::Failed(format!("Connection error: {e}"))
        }
    }
}

async fn confirm_rsvp(
    token: &str,
    rsvp: &Rsvp,
    store: &State<Store>,
    config: &State<AppConfig>,
    notifier: &State<Notifier>,
) -> ConfirmResponse {
    let layout = SheetLayout::new(&config.sheet_name);
    let submitted_at = format_timestamp(&Local::now());

    let result = record_rsvp(
        store.inner().as_ref(),
        &layout,
        token,
        rsvp.status(),
        rsvp.comment(),
        submitted_at,
    )
    .await;

    match result {
        Ok(Some(recorded)) => {
            info!("RSVP for {token} recorded in row {}: {}", recorded.row, recorded.status.label());
            notifier.rsvp_received(token, &recorded);
            ConfirmResponse::Recorded(Json(Confirmation {
                success: true,
                error: None,
            }))
        }
        Ok(None) => ConfirmResponse::UnknownToken(Json(Confirmation {
            success: false,
            error: None,
        })),
        Err(e) => {
            error!("Recording RSVP for {token} failed: {e}");
            ConfirmResponse::Failed(Confirmation::failed(e.to_string()))
        }
    }
}

#[post("/confirm/<token>", format = "json", data = "<rsvp>")]
pub async fn confirm(
    token: &str,
    rsvp: Json<RsvpJson>,
    store: &State<Store>,
    config: &State<AppConfig>,
    notifier: &State<Notifier>,
) -> ConfirmResponse {
    let rsvp = Rsvp::from(rsvp.into_inner());
    confirm_rsvp(token, &rsvp, store, config, notifier).await
}

#[post("/confirm/<token>", format = "form", data = "<rsvp>")]
pub async fn confirm_form(
    token: &str,
    rsvp: Form<Rsvp>,
    store: &State<Store>,
    config: &State<AppConfig>,
    notifier: &State<Notifier>,
) -> ConfirmResponse {
    confirm_rsvp(token, &rsvp, store, config, notifier).await
}

#[catch(404)]
pub fn not_found() -> Template {
    Template::render("404", context! {})
}

// Requests that are neither JSON nor a form, including ones without a Content-Type.
#[post("/confirm/<_>", rank = 5)]
pub fn confirm_unsupported() -> ConfirmResponse {
    ConfirmResponse::Unsupported(Confirmation::failed(
        "expected an application/json or form-urlencoded body",
    ))
}

/// Keeps `/confirm` failures such as unparseable JSON or an oversized body in
/// the `{success, error}` shape.
#[catch(default)]
pub fn confirm_failed(status: Status, _request: &Request<'_>) -> (Status, Json<Confirmation>) {
    let reason = status.reason().unwrap_or("request failed");
    (status, Confirmation::failed(reason))
}

#[catch(404)]
pub fn confirm_not_found() -> Json<Confirmation> {
    Confirmation::failed("no such confirmation endpoint")
}

//! utils.rs

use actix_session::Session;
use actix_web::{web, HttpResponse, Responder};
use common_lib::market_hours::MarketHours;
use handlebars::Handlebars;
use serde::Serialize;
use serde_json::json;

use crate::auth::{analytics_identity, current_user};
use crate::configuration::Settings;

/// a card on the home page
#[derive(Debug, Serialize)]
pub struct NavTile {
    pub title: &'static str,
    pub description: &'static str,
    pub href: &'static str,
}

pub const NAV_TILES: [NavTile; 3] = [
    NavTile {
        title: "Stocks",
        description: "Find stocks by sector and price range",
        href: "/stocks",
    },
    NavTile {
        title: "Market Clock",
        description: "Whether the exchange is open and when that changes, as JSON",
        href: "/api/market_status",
    },
    NavTile {
        title: "Sign Out",
        description: "End this session",
        href: "/logout",
    },
];

/// render a template or answer 500
pub fn render<T: Serialize>(hb: &Handlebars<'_>, template: &str, data: &T) -> HttpResponse {
    match hb.render(template, data) {
        Ok(body) => HttpResponse::Ok().append_header(("Cache-Control", "no-store")).body(body),
        Err(e) => {
            tracing::error!("[render] template {}: {:?}", template, &e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// GET /
/// authorization: not required
pub async fn get_home(settings: web::Data<Settings>, hb: web::Data<Handlebars<'_>>, session: Session) -> HttpResponse {
    tracing::debug!("[get_home]");

    let market = MarketHours::status(&settings.market);
    let username = current_user(&session);

    // pass username if logged in;
    let data = json!({
        "title": "MarketPulse",
        "refresh": true,
        "parent": "base0",
        "is_logged_in": username.is_some(),
        "session_username": username.as_deref().unwrap_or(""),
        "analytics": username.as_deref().map(analytics_identity),
        "market": market,
        "tiles": NAV_TILES,
    });
    render(&hb, "home", &data)
}

/// liveness check for the load balancer
pub async fn get_ping() -> impl Responder {
    HttpResponse::Ok().content_type("text/plain").body("pong")
}

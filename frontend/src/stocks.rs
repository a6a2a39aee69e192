//! stocks.rs
//!
//! stock preference form: pick a sector and price band, get the matching watchlist stocks

use actix_session::Session;
use actix_web::web::Form;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use common_lib::market_hours::exchange_date;
use common_lib::stock_preferences::{filter_watchlist, sector_options, StockPreferences, WatchlistStock};
use handlebars::Handlebars;
use serde_json::json;

use crate::auth::{analytics_identity, current_user, redirect_home};
use crate::configuration::Settings;
use crate::utils::render;

/// GET /stocks
pub async fn get_stocks(hb: web::Data<Handlebars<'_>>, session: Session) -> HttpResponse {
    // require login
    if let Some(session_username) = current_user(&session) {
        render_stocks(&hb, &session_username, &StockPreferences::default(), &[], None, "")
    } else {
        redirect_home().await
    }
}

/// POST /stocks
pub async fn post_stocks(form: Form<StockPreferences>, settings: web::Data<Settings>, hb: web::Data<Handlebars<'_>>, session: Session) -> HttpResponse {
    tracing::debug!("[post_stocks] form: {:?}", &form);

    // require login
    if let Some(session_username) = current_user(&session) {
        let preferences = form.into_inner();
        let today = exchange_date(Utc::now(), settings.market.timezone);

        match preferences.validate(today) {
            Ok(query) => {
                let results = filter_watchlist(&settings.watchlist, query.sector, &query.min_price, &query.max_price);
                let message = format!("{} stocks match {}", results.len(), query.sector.label());
                tracing::debug!("[post_stocks] {}", &message);
                render_stocks(&hb, &session_username, &preferences, &[], Some(results.as_slice()), &message)
            }
            Err(errors) => {
                let errors: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                tracing::debug!("[post_stocks] invalid form: {:?}", &errors);
                render_stocks(&hb, &session_username, &preferences, &errors, None, "")
            }
        }
    } else {
        // not logged in
        redirect_home().await
    }
}

fn render_stocks(hb: &Handlebars<'_>, session_username: &str, preferences: &StockPreferences, errors: &[String], results: Option<&[&WatchlistStock]>, message: &str) -> HttpResponse {
    let data = json!({
        "title": "Stocks",
        "parent": "base0",
        "is_logged_in": true,
        "session_username": session_username,
        "analytics": analytics_identity(session_username),
        "sectors": sector_options(),
        "form": preferences,
        "errors": errors,
        "show_results": results.is_some(),
        "results": results.unwrap_or(&[]),
        "message": message,
    });
    render(hb, "stocks", &data)
}

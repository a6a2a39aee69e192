//! market.rs
//!
//! market clock as JSON for pages that poll it

use actix_web::{web, HttpResponse};
use common_lib::market_hours::MarketHours;

use crate::configuration::Settings;

/// GET /api/market_status
/// authorization: none
pub async fn get_market_status(settings: web::Data<Settings>) -> HttpResponse {
    let status = MarketHours::status(&settings.market);
    tracing::debug!("[get_market_status] {:?}", &status);
    HttpResponse::Ok().append_header(("Cache-Control", "no-store")).json(status)
}

//! auth.rs
//!
//! Sign-in itself belongs to the external auth provider, which leaves the username in the cookie
//! session. This is the reading side of that plus sign-out.

use actix_session::Session;
use actix_web::HttpResponse;
use common_lib::analytics::AnalyticsIdentity;
use common_lib::common_structs::SESSION_USERNAME;

/// the signed-in username, if any
pub fn current_user(session: &Session) -> Option<String> {
    match session.get::<String>(SESSION_USERNAME) {
        Ok(user) => user,
        Err(e) => {
            tracing::debug!("[current_user] unreadable session: {:?}", &e);
            None
        }
    }
}

/// Analytics identity for the signed-in user as a JSON string.
///
/// Role, region, balance and company live in the external profile store, which this app doesn't
/// read, so the payload carries their defaults until that store is wired in as a `UserProfile`.
pub fn analytics_identity(username: &str) -> String {
    let identity = AnalyticsIdentity::new(username, None, None);
    match serde_json::to_string(&identity) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("[analytics_identity] {:?}", &e);
            String::new()
        }
    }
}

/// 302 back to "/"
pub async fn redirect_home() -> HttpResponse {
    tracing::debug!("[redirect_home]");
    HttpResponse::Found()
        .append_header(("location", "/"))
        .append_header(("Cache-Control", "no-store"))
        .finish()
}

/// GET /logout
pub async fn get_logout(session: Session) -> HttpResponse {
    if let Some(username) = current_user(&session) {
        tracing::info!("[get_logout] signing out: {}", &username);
    }
    session.purge();
    redirect_home().await
}

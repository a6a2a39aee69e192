//! web_server.rs

use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::{web, App, HttpServer};
use common_lib::common_structs::ConfigLocation;
use handlebars::Handlebars;

use crate::auth::get_logout;
use crate::configuration::{config_dir, get_yaml_configuration, Settings};
use crate::market::get_market_status;
use crate::stocks::{get_stocks, post_stocks};
use crate::utils::*;

pub struct WebServer {}
impl WebServer {
    pub async fn run() {
        let settings = match get_yaml_configuration() {
            Ok(settings) => settings,
            Err(e) => {
                tracing::error!("[run] configuration.yaml unusable: {:?}", &e);
                return;
            }
        };
        tracing::info!("[run] web server starting on port: {}", &settings.application_port);
        tracing::debug!("[run] market calendar: {:?}", &settings.market);

        if let Err(e) = WebServer::web_server(settings).await {
            tracing::error!("[run] web server stopped: {:?}", &e);
        }
    }

    fn get_secret_key() -> actix_web::cookie::Key {
        actix_web::cookie::Key::generate()
    }

    /// handlebars with every .html file under `static/templates` registered by file stem
    pub fn templates(config_location: ConfigLocation) -> Result<Handlebars<'static>, handlebars::TemplateError> {
        let handlebar_static_path = format!("{}/static/templates", config_dir(config_location));
        tracing::debug!("[templates] registering handlebars static files to: {}", &handlebar_static_path);
        let mut handlebars = Handlebars::new();
        handlebars.register_templates_directory(".html", handlebar_static_path)?;
        Ok(handlebars)
    }

    async fn web_server(settings: Settings) -> std::io::Result<()> {
        let web_port = settings.application_port;
        tracing::info!("starting HTTP server at http://localhost:{}", &web_port);

        let handlebars = WebServer::templates(ConfigLocation::from_env())
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        let handlebars_ref = web::Data::new(handlebars);
        let settings_data = web::Data::new(settings);

        let secret_key = WebServer::get_secret_key();

        let server = HttpServer::new(move || {
            App::new()
                // setting secure = false for local testing; otherwise TLS required
                .wrap(SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone()).cookie_secure(false).build())
                .app_data(settings_data.clone())
                .app_data(handlebars_ref.clone())
                .configure(routes)
        })
        .bind(("0.0.0.0", web_port))?
        .workers(2)
        .run();

        server.await
    }
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(get_home))
        .route("/ping", web::get().to(get_ping))
        .route("/api/market_status", web::get().to(get_market_status))
        .route("/stocks", web::get().to(get_stocks))
        .route("/stocks", web::post().to(post_stocks))
        .route("/logout", web::get().to(get_logout));
}

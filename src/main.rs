#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![deny(warnings)]
#![allow(clippy::multiple_crate_versions)]

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::sync::Arc;
use wardrs::{
    handlers::{auth_callback, health, login_page, protected, sign_in, sign_out},
    session::SessionGate,
    settings::WardrsSettings,
    store::{HttpSessionStore, SessionStore},
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load configuration from Settings.toml and environment variables.
    // This also loads .env, initializes the logger, and validates the auth
    // configuration - a broken configuration aborts startup here.
    let settings = WardrsSettings::load()
        .map_err(|e| std::io::Error::other(format!("Failed to load settings: {e}")))?;

    let store = HttpSessionStore::new(&settings.provider.session_api_url)
        .map_err(|e| std::io::Error::other(format!("Failed to initialize session store: {e}")))?;

    start_server(Arc::new(store), settings).await
}

/// Start the server with the given session store.
///
/// # Errors
///
/// Returns an error if:
/// - Server binding fails
/// - Server fails to start
async fn start_server(store: Arc<dyn SessionStore>, settings: WardrsSettings) -> std::io::Result<()> {
    let bind_address = settings.get_bind_address();
    print_startup_info(&bind_address, &settings);

    let gate = SessionGate::new(store, settings.cookies.secure);

    // Configure CORS for SPAs
    let cors_origins = settings.get_cors_origins();

    HttpServer::new(move || {
        let cors_origins = cors_origins.clone();
        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _| {
                cors_origins
                    .iter()
                    .any(|allowed| allowed == origin.to_str().unwrap_or(""))
            })
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec!["Authorization", "Content-Type", "Accept"])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(settings.clone()))
            .app_data(web::Data::new(gate.clone()))
            .wrap(cors)
            .wrap(Logger::default())
            .configure(configure_services)
    })
    .bind(&bind_address)?
    .run()
    .await
}

fn configure_services(cfg: &mut web::ServiceConfig) {
    cfg
        // Login entry and auth endpoints
        .route("/login", web::get().to(login_page))
        .route("/auth/sign_in", web::get().to(sign_in))
        .route("/auth/sign_out", web::get().to(sign_out))
        .route("/auth/sign_out", web::post().to(sign_out))
        .route("/auth/callback", web::get().to(auth_callback))
        .route("/auth/callback", web::post().to(auth_callback))
        // Health endpoint
        .route("/ping", web::get().to(health))
        // Everything else is the protected route collection
        .default_service(
            web::route()
                .guard(actix_web::guard::fn_guard(|req| {
                    let path = req.head().uri.path();
                    !path.starts_with("/auth")
                        && !path.starts_with("/login")
                        && !path.starts_with("/ping")
                }))
                .to(protected),
        );
}

fn print_startup_info(bind_address: &str, settings: &WardrsSettings) {
    println!("Starting wardrs Session Gate on http://{bind_address}");
    println!();
    println!("Auth endpoints:");
    println!("  GET  /login             - Login page (accepts ?next=)");
    println!("  GET  /auth/sign_in      - Redirect to identity provider");
    println!("  GET|POST /auth/sign_out - Revoke session and clear cookie");
    println!("  GET|POST /auth/callback - OAuth callback");
    println!();
    println!("OAuth callback URL for the identity provider:");
    println!(
        "  {}/auth/callback",
        settings.application.redirect_base_url
    );
    println!();
    println!("Protected routes:");
    println!("  ALL {{any other path}}    - Requires a valid session");
    println!();
    println!("System endpoints:");
    println!("  GET  /ping              - Health check");
}

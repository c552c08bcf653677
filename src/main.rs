use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use tmua_server::{
    app_state::AppState, auth::AuthMiddleware, config::Config, db::Database,
    graphql::create_schema, handlers, middleware::RequestIdMiddleware,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env();
    if config.is_production() {
        config
            .validate_for_production()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;
    }

    let db = Database::connect(&config)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e.to_string()))?;

    let bind_address = (config.web_server_host.clone(), config.web_server_port);
    let state = AppState::new(config, &db)
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    let schema = create_schema(state.clone());

    log::info!("Starting HTTP server on {}:{}", bind_address.0, bind_address.1);
    log::info!(
        "GraphiQL playground: http://{}:{}/graphiql",
        bind_address.0,
        bind_address.1
    );

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(schema.clone()))
            .wrap(AuthMiddleware)
            .wrap(RequestIdMiddleware)
            .wrap(Logger::new(
                "%a \"%r\" %s %b %Dms request_id=%{x-request-id}o",
            ))
            .wrap(Cors::permissive())
            .configure(handlers::configure)
    })
    .bind(bind_address)?
    .run()
    .await;

    db.shutdown().await;
    log::info!("Server stopped");

    server
}

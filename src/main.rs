use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use mongodb::Client;
use splitledger::{routes, settings::Settings, store::Store};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!("splitledger={}", settings.log_level))
        .init();

    tracing::info!("connecting to {}", settings.database);
    let client = Client::with_uri_str(&settings.mongodb_uri).await?;
    let store = Store::new(&client, &settings.database);

    tracing::info!("listening on {}:{}", settings.bind, settings.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(web::Data::new(store.clone()))
            .configure(routes::configure)
    })
    .bind((settings.bind.as_str(), settings.port))?
    .run()
    .await?;

    Ok(())
}

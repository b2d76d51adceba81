use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use dish_menu::{api, config::Config, db};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .with_ansi(true)
        .with_file(false)
        .pretty()
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("fail to setup logging")?;

    let config = Config::load();

    let db_pool = db::connect(&config.database_url).await?;
    if let Some(seed) = &config.seed_file {
        let added = db::seed_from_file(&db_pool, seed).await?;
        tracing::info!(
            "seeded {} dishes and {} leaders from {}",
            added.dishes,
            added.leaders,
            seed.display()
        );
    }

    let state = web::Data::new(api::ApiState::new(db_pool));
    let allowed_origin = config.allowed_origin.clone();

    tracing::info!("listening on {}:{}", config.host, config.port);
    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allowed_origin(&allowed_origin)
                    .allow_any_method()
                    .allow_any_header(),
            )
            .app_data(state.clone())
            .configure(api::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;
    Ok(())
}

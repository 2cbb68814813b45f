// src/main.rs

use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use log::{error, info, warn};
use sqlx::postgres::PgPoolOptions;

use catalogo::categorias::categoria_repository::PgCategoryRepository;
use catalogo::categorias::categoria_router;
use catalogo::configuracao::app_config::AppConfig;
use catalogo::opcoes::opcao_store::PgOptionStore;
use catalogo::AppState;

// Função principal da aplicação Actix Web.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().map_err(|e| {
        error!("Falha ao carregar a configuração: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;
    if config.auth.jwt_secret.is_empty() {
        warn!("auth.jwt_secret vazio: nenhum token será aceito com segurança");
    }

    // Conecta ao banco de dados PostgreSQL usando um pool de conexões.
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
        .map_err(|e| {
            error!("Falha ao conectar ao banco PostgreSQL: {}", e);
            std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
        })?;

    let app_state = web::Data::new(AppState {
        category_repo: Arc::new(PgCategoryRepository::new(db_pool.clone())),
        option_store: Arc::new(PgOptionStore::new(db_pool)),
        platform: config.platform.clone(),
        jwt_secret: config.auth.jwt_secret.clone(),
    });

    info!(
        "Iniciando API de categorias em {}:{} (categorias próprias de lojistas: {})",
        config.server.host, config.server.port, config.platform.merchants_own_categories
    );

    // Configura e inicia o servidor HTTP.
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .configure(categoria_router::configurar_rotas)
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}

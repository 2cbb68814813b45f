// src/lib.rs

use std::sync::Arc;

// Importa os módulos
pub mod autenticacao; // Módulo de autenticação (JWT do lojista)
pub mod categorias;   // Módulo de categorias (árvore, agregado, gerenciador, rotas)
pub mod configuracao; // Módulo de configuração
pub mod opcoes;       // Módulo de opções das categorias
pub mod shared;       // Módulo shared

use categorias::categoria_repository::CategoryRepository;
use configuracao::app_config::PlatformConf;
use opcoes::opcao_store::OptionStore;

// Estado compartilhado: repositórios, configuração da plataforma e chave secreta JWT.
pub struct AppState {
    pub category_repo: Arc<dyn CategoryRepository>,
    pub option_store: Arc<dyn OptionStore>,
    pub platform: PlatformConf,
    pub jwt_secret: String,
}

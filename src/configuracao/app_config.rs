// src/configuracao/app_config.rs

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::categorias::categoria_arvore::CycleCheck;
use crate::shared::errors::CatalogResult;

/// Arquivo padrão, pode ser trocado pela variável CATALOGO_CONFIG.
pub const DEFAULT_CONFIG_FILE: &str = "config/catalogo";

/// Configuração completa da aplicação.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub platform: PlatformConf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

/// Configuração da plataforma lida pelo gerenciador de categorias.
#[derive(Debug, Deserialize, Clone)]
pub struct PlatformConf {
    /// Se falso, lojistas usam as categorias da plataforma em modo somente leitura.
    pub merchants_own_categories: bool,
    pub cycle_check: CycleCheck,
}

impl Default for PlatformConf {
    fn default() -> Self {
        PlatformConf {
            merchants_own_categories: true,
            cycle_check: CycleCheck::OneHop,
        }
    }
}

/// Fonte da configuração da plataforma, consultada uma única vez
/// na construção do `CategoryManager`.
pub trait PlatformConfProvider {
    fn platform_conf(&self) -> PlatformConf;
}

impl PlatformConfProvider for PlatformConf {
    fn platform_conf(&self) -> PlatformConf {
        self.clone()
    }
}

impl PlatformConfProvider for AppConfig {
    fn platform_conf(&self) -> PlatformConf {
        self.platform.clone()
    }
}

impl AppConfig {
    /// Carrega o arquivo (opcional) e sobrepõe com variáveis CATALOGO__SECAO__CHAVE.
    pub fn load(file: &str) -> CatalogResult<Self> {
        let config = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("database.url", "postgres://localhost:5432/catalogo")?
            .set_default("database.max_connections", 5)?
            .set_default("auth.jwt_secret", "")?
            .set_default("platform.merchants_own_categories", true)?
            .set_default("platform.cycle_check", "one_hop")?
            .add_source(File::with_name(file).required(false))
            .add_source(Environment::with_prefix("CATALOGO").separator("__").try_parsing(true))
            .build()?;
        Ok(config.try_deserialize::<AppConfig>()?)
    }

    /// Usa CATALOGO_CONFIG se definida, senão o arquivo padrão.
    pub fn from_env() -> CatalogResult<Self> {
        let file = std::env::var("CATALOGO_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load(&file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_quando_arquivo_nao_existe() {
        let cfg = AppConfig::load("config/nao_existe").expect("defaults devem bastar");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.database.max_connections, 5);
        assert!(cfg.platform.merchants_own_categories);
        assert_eq!(cfg.platform.cycle_check, CycleCheck::OneHop);
        assert_eq!(cfg.platform.cycle_check, PlatformConf::default().cycle_check);
    }

    #[test]
    fn app_config_fornece_conf_da_plataforma() {
        let cfg = AppConfig::load("config/nao_existe").expect("defaults devem bastar");
        let conf = cfg.platform_conf();
        assert_eq!(conf.merchants_own_categories, cfg.platform.merchants_own_categories);
    }
}

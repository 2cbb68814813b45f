// src/shared/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use thiserror::Error;

use super::shared_structs::GenericResponse;

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Erros do catálogo de categorias.
#[derive(Debug, Error)]
pub enum CatalogError {
    // ==== Regras da árvore de categorias ====
    #[error("Categoria não encontrada")]
    NoSuchCategory,

    #[error("A categoria pai não pode ser descendente da própria categoria")]
    CategoryCycleReference,

    #[error("A categoria possui subcategorias")]
    HasChildCategories,

    #[error("A categoria possui produtos vinculados")]
    CategoryContainGoods,

    #[error("As categorias são compartilhadas pela plataforma e não podem ser alteradas")]
    ReadOnlyScope,

    /// Registro com id igual ao parent_id (ou laço) encontrado durante a caminhada.
    #[error("Categoria corrompida: id {0} referencia a si mesma na hierarquia")]
    CorruptedCategory(i32),

    #[error("A categoria ainda não foi salva")]
    UnsavedCategory,

    #[error("Não autorizado: {0}")]
    Unauthorized(String),

    // ==== Erros de sistema ====
    #[error("Erro de banco de dados: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Erro de JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Erro de configuração: {0}")]
    Config(#[from] config::ConfigError),
}

impl ResponseError for CatalogError {
    fn status_code(&self) -> StatusCode {
        match self {
            CatalogError::NoSuchCategory => StatusCode::NOT_FOUND,
            CatalogError::ReadOnlyScope => StatusCode::FORBIDDEN,
            CatalogError::CategoryCycleReference
            | CatalogError::HasChildCategories
            | CatalogError::CategoryContainGoods => StatusCode::CONFLICT,
            CatalogError::UnsavedCategory => StatusCode::BAD_REQUEST,
            CatalogError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            CatalogError::CorruptedCategory(_)
            | CatalogError::Database(_)
            | CatalogError::Json(_)
            | CatalogError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        // Erros internos não expõem detalhes ao cliente
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("{:?}", self);
            "Erro interno do serviço de categorias".to_string()
        } else {
            self.to_string()
        };
        HttpResponse::build(status).json(GenericResponse::<()>::error(message))
    }
}

// src/shared/shared_structs.rs

use serde::Serialize;

/// Estrutura genérica para padronizar as respostas da API.
/// 'T' é o tipo do corpo da resposta, que pode ser opcional.
#[derive(Serialize)]
pub struct GenericResponse<T> {
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")] // Não serializa 'body' se for None
    pub body: Option<T>,
}

impl<T> GenericResponse<T> {
    /// Resposta de sucesso com corpo.
    pub fn success(message: impl Into<String>, body: T) -> Self {
        GenericResponse {
            status: "success".to_string(),
            message: message.into(),
            body: Some(body),
        }
    }
}

impl GenericResponse<()> {
    /// Resposta de sucesso sem corpo.
    pub fn ok(message: impl Into<String>) -> Self {
        GenericResponse {
            status: "success".to_string(),
            message: message.into(),
            body: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        GenericResponse {
            status: "error".to_string(),
            message: message.into(),
            body: None,
        }
    }
}

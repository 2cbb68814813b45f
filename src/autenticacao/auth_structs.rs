// src/autenticacao/auth_structs.rs

use serde::{Deserialize, Serialize};

/// Estrutura para o payload do JWT (Claims).
/// O token é emitido pelo serviço de contas da plataforma.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32, // Subject (ID do usuário)
    pub mch_id: i32, // Lojista do usuário, 0 = operador da plataforma
    pub exp: i64, // Expiration Time (timestamp Unix)
}

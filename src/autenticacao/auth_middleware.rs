// src/autenticacao/auth_middleware.rs

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};

use futures::future::{ready, Ready};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use log::{error, warn};

use super::auth_structs::Claims;
use crate::shared::errors::CatalogError;
use crate::AppState;

/// Usuário autenticado e o lojista (tenant) ao qual pertence.
/// Extraído das requisições protegidas.
#[derive(Debug, Clone)]
pub struct AuthenticatedMerchant {
    pub user_id: i32,
    pub mch_id: i32,
}

/// Extrator de autenticação para Actix Web.
/// Valida o token JWT presente no cabeçalho Authorization.
impl FromRequest for AuthenticatedMerchant {
    type Error = CatalogError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedMerchant, CatalogError> {
    // Acessa o AppState para obter a chave secreta JWT
    let jwt_secret = match req.app_data::<web::Data<AppState>>() {
        Some(state) => state.jwt_secret.clone(),
        None => {
            error!("AppState não disponível no extrator de autenticação");
            return Err(CatalogError::Unauthorized("Erro de configuração do servidor.".into()));
        }
    };

    let header_str = req
        .headers()
        .get("Authorization")
        .ok_or_else(|| CatalogError::Unauthorized("Token de autenticação ausente.".into()))?
        .to_str()
        .map_err(|_| CatalogError::Unauthorized("Token de autenticação inválido.".into()))?;

    // Verifica se o cabeçalho começa com "Bearer "
    let token = header_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| CatalogError::Unauthorized("Formato de token inválido. Esperado 'Bearer <token>'.".into()))?;

    let validation = Validation::new(Algorithm::HS256);
    let token_data = decode::<Claims>(token, &DecodingKey::from_secret(jwt_secret.as_ref()), &validation)
        .map_err(|e| {
            warn!("Erro ao decodificar/validar JWT: {:?}", e);
            let message = match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => "Token expirado.",
                jsonwebtoken::errors::ErrorKind::InvalidSignature => "Assinatura do token inválida.",
                jsonwebtoken::errors::ErrorKind::InvalidToken => "Token malformado.",
                _ => "Token de autenticação inválido.",
            };
            CatalogError::Unauthorized(message.into())
        })?;

    if token_data.claims.mch_id < 0 {
        return Err(CatalogError::Unauthorized("Lojista inválido no token.".into()));
    }

    Ok(AuthenticatedMerchant {
        user_id: token_data.claims.sub,
        mch_id: token_data.claims.mch_id,
    })
}

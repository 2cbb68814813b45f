// src/autenticacao/mod.rs

// Declara o submódulo com as claims do JWT
pub mod auth_structs;
// Extrator que valida o token e identifica o lojista
pub mod auth_middleware;

// src/opcoes/mod.rs

// Estruturas das opções (valor tipado, padrões, payload)
pub mod opcao_structs;
// Trait de persistência e implementação PostgreSQL
pub mod opcao_store;
// Store em memória
pub mod opcao_memoria;
// Overlay de opções de uma categoria
pub mod opcao_overlay;

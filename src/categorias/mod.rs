// src/categorias/mod.rs

// Registro plano da categoria e payloads HTTP
pub mod categoria_structs;
// Índice em memória: níveis, ancestrais, URL e ciclos
pub mod categoria_arvore;
// Trait do repositório e implementação PostgreSQL
pub mod categoria_repository;
pub mod categoria_memoria;
// Agregado Category
pub mod categoria;
// Serviço por tenant
pub mod categoria_manager;
// Rotas de administração
pub mod categoria_router;

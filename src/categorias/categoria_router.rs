// src/categorias/categoria_router.rs

use actix_web::{delete, get, post, put, web, HttpResponse};
use log::info;

// Importa as structs de categoria
use super::categoria_structs::{AlteracaoCategoria, CategoryRecord, NovaCategoria};
use super::categoria_manager::CategoryManager;
use crate::autenticacao::auth_middleware::AuthenticatedMerchant;
use crate::opcoes::opcao_structs::AlteracaoOpcao;
use crate::shared::errors::{CatalogError, CatalogResult};
use crate::shared::shared_structs::GenericResponse;

// Importa o AppState do módulo raiz (lib.rs)
use crate::AppState;

/// Registra as rotas de categorias na aplicação.
pub fn configurar_rotas(cfg: &mut web::ServiceConfig) {
    cfg.service(buscar_categorias)
        .service(cadastrar_categoria)
        .service(buscar_subcategorias)
        .service(buscar_opcoes)
        .service(atualizar_opcoes)
        .service(buscar_categoria_por_id)
        .service(atualizar_categoria)
        .service(deletar_categoria);
}

/// Gerenciador no escopo do lojista do token.
fn manager_for(data: &AppState, user: &AuthenticatedMerchant) -> CategoryManager {
    CategoryManager::new(
        user.mch_id,
        data.category_repo.clone(),
        data.option_store.clone(),
        &data.platform,
    )
}

/// Rota para buscar todas as categorias do escopo, pela ordem de exibição.
#[get("/categorias")]
pub async fn buscar_categorias(
    data: web::Data<AppState>,
    user: AuthenticatedMerchant,
) -> CatalogResult<HttpResponse> {
    let manager = manager_for(&data, &user);
    let categorias: Vec<CategoryRecord> = manager
        .list_categories()
        .await?
        .into_iter()
        .map(|c| c.record().clone())
        .collect();

    Ok(HttpResponse::Ok().json(GenericResponse::success(
        format!("{} categorias listadas com sucesso!", categorias.len()),
        serde_json::json!({ "read_only": manager.read_only(), "categorias": categorias }),
    )))
}

/// Rota para buscar uma categoria por ID.
#[get("/categorias/{id}")]
pub async fn buscar_categoria_por_id(
    data: web::Data<AppState>,
    user: AuthenticatedMerchant,
    path: web::Path<i32>,
) -> CatalogResult<HttpResponse> {
    let id = path.into_inner();
    let categoria = manager_for(&data, &user)
        .get_category(id)
        .await?
        .ok_or(CatalogError::NoSuchCategory)?;

    Ok(HttpResponse::Ok().json(GenericResponse::success(
        format!("Categoria com ID {} encontrada.", id),
        categoria.record().clone(),
    )))
}

/// Rota para buscar os IDs das subcategorias diretas.
#[get("/categorias/{id}/filhos")]
pub async fn buscar_subcategorias(
    data: web::Data<AppState>,
    user: AuthenticatedMerchant,
    path: web::Path<i32>,
) -> CatalogResult<HttpResponse> {
    let id = path.into_inner();
    let mut categoria = manager_for(&data, &user)
        .get_category(id)
        .await?
        .ok_or(CatalogError::NoSuchCategory)?;
    let filhos = categoria.children().await?;

    Ok(HttpResponse::Ok().json(GenericResponse::success(
        format!("Categoria {} possui {} subcategorias.", id, filhos.len()),
        filhos,
    )))
}

/// Rota para cadastrar uma nova categoria.
#[post("/categorias")]
pub async fn cadastrar_categoria(
    data: web::Data<AppState>,
    user: AuthenticatedMerchant,
    item: web::Json<NovaCategoria>,
) -> CatalogResult<HttpResponse> {
    let manager = manager_for(&data, &user);
    manager.ensure_writable()?;

    let mut categoria = manager.create_category(item.into_inner().into_record());
    let id = manager.save_category(&mut categoria).await?;
    info!("Categoria {} cadastrada pelo usuário {} no escopo {}", id, user.user_id, manager.relation_id());

    Ok(HttpResponse::Ok().json(GenericResponse::success(
        format!("Categoria cadastrada com sucesso! ID: {}", id),
        categoria.record().clone(),
    )))
}

/// Rota para atualizar uma categoria existente (inclusive trocar o pai).
#[put("/categorias/{id}")]
pub async fn atualizar_categoria(
    data: web::Data<AppState>,
    user: AuthenticatedMerchant,
    path: web::Path<i32>,
    item: web::Json<AlteracaoCategoria>,
) -> CatalogResult<HttpResponse> {
    let id = path.into_inner();
    let manager = manager_for(&data, &user);
    manager.ensure_writable()?;

    let mut categoria = manager.get_category(id).await?.ok_or(CatalogError::NoSuchCategory)?;
    let alterada = item.into_inner().apply_to(categoria.record());
    categoria.set_value(&alterada).await?;
    manager.save_category(&mut categoria).await?;

    Ok(HttpResponse::Ok().json(GenericResponse::success(
        format!("Categoria com ID {} atualizada com sucesso.", id),
        categoria.record().clone(),
    )))
}

/// Rota para deletar uma categoria sem subcategorias nem produtos.
#[delete("/categorias/{id}")]
pub async fn deletar_categoria(
    data: web::Data<AppState>,
    user: AuthenticatedMerchant,
    path: web::Path<i32>,
) -> CatalogResult<HttpResponse> {
    let id = path.into_inner();
    let manager = manager_for(&data, &user);
    manager.ensure_writable()?;
    manager.delete_category(id).await?;

    Ok(HttpResponse::Ok().json(GenericResponse::<()>::ok(format!(
        "Categoria com ID {} deletada com sucesso.",
        id
    ))))
}

/// Rota para buscar as opções da categoria (semeadas na primeira leitura).
#[get("/categorias/{id}/opcoes")]
pub async fn buscar_opcoes(
    data: web::Data<AppState>,
    user: AuthenticatedMerchant,
    path: web::Path<i32>,
) -> CatalogResult<HttpResponse> {
    let id = path.into_inner();
    let mut categoria = manager_for(&data, &user)
        .get_category(id)
        .await?
        .ok_or(CatalogError::NoSuchCategory)?;
    let opcoes = categoria.options().await?.all();

    Ok(HttpResponse::Ok().json(GenericResponse::success(
        format!("Opções da categoria {}.", id),
        opcoes,
    )))
}

/// Rota para alterar opções da categoria.
#[put("/categorias/{id}/opcoes")]
pub async fn atualizar_opcoes(
    data: web::Data<AppState>,
    user: AuthenticatedMerchant,
    path: web::Path<i32>,
    item: web::Json<Vec<AlteracaoOpcao>>,
) -> CatalogResult<HttpResponse> {
    let id = path.into_inner();
    let manager = manager_for(&data, &user);
    manager.ensure_writable()?;

    let mut categoria = manager.get_category(id).await?.ok_or(CatalogError::NoSuchCategory)?;
    let overlay = categoria.options().await?;
    for alteracao in item.into_inner() {
        overlay.set_value(&alteracao.key, alteracao.value);
        if let Some(mut option) = overlay.get(&alteracao.key).cloned() {
            if let Some(title) = alteracao.title {
                option.title = title;
            }
            if let Some(required) = alteracao.required {
                option.required = required;
            }
            overlay.set(option);
        }
    }
    overlay.flush().await?;

    Ok(HttpResponse::Ok().json(GenericResponse::success(
        format!("Opções da categoria {} atualizadas.", id),
        overlay.all(),
    )))
}

// src/categorias/categoria_repository.rs

use async_trait::async_trait;
use sqlx::{query, query_as, query_scalar, Pool, Postgres, Row};

use super::categoria_structs::CategoryRecord;
use crate::shared::errors::{CatalogError, CatalogResult};

/// Persistência das categorias, sempre filtrada pelo escopo (mch_id).
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Lista plana de todas as categorias do escopo, ordenada por id.
    async fn list_by_scope(&self, scope: i32) -> CatalogResult<Vec<CategoryRecord>>;

    async fn get_one(&self, scope: i32, id: i32) -> CatalogResult<Option<CategoryRecord>>;

    /// Insere (id = 0) ou atualiza a categoria, devolvendo o id.
    /// Atualizar um id ausente do escopo do registro falha com `NoSuchCategory`.
    async fn save(&self, record: &CategoryRecord) -> CatalogResult<i32>;

    async fn delete(&self, scope: i32, id: i32) -> CatalogResult<()>;

    /// Existe ao menos um produto vinculado à categoria?
    async fn has_assigned_products(&self, scope: i32, id: i32) -> CatalogResult<bool>;
}

const SELECT_COLUMNS: &str =
    "SELECT id, parent_id, mch_id, nome, enabled, sort_num, icon, url, pro_model, level, create_time FROM categorias";

/// Repositório PostgreSQL das categorias.
pub struct PgCategoryRepository {
    db_pool: Pool<Postgres>,
}

impl PgCategoryRepository {
    pub fn new(db_pool: Pool<Postgres>) -> Self {
        PgCategoryRepository { db_pool }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn list_by_scope(&self, scope: i32) -> CatalogResult<Vec<CategoryRecord>> {
        let sql = format!("{} WHERE mch_id = $1 ORDER BY id", SELECT_COLUMNS);
        let list = query_as::<_, CategoryRecord>(&sql)
            .bind(scope)
            .fetch_all(&self.db_pool)
            .await?;
        Ok(list)
    }

    async fn get_one(&self, scope: i32, id: i32) -> CatalogResult<Option<CategoryRecord>> {
        let sql = format!("{} WHERE mch_id = $1 AND id = $2", SELECT_COLUMNS);
        let record = query_as::<_, CategoryRecord>(&sql)
            .bind(scope)
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?;
        Ok(record)
    }

    async fn save(&self, record: &CategoryRecord) -> CatalogResult<i32> {
        if record.id == 0 {
            let row = query(
                "INSERT INTO categorias (parent_id, mch_id, nome, enabled, sort_num, icon, url, pro_model, level, create_time) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING id",
            )
            .bind(record.parent_id)
            .bind(record.tenant_id)
            .bind(&record.name)
            .bind(record.enabled)
            .bind(record.sort_num)
            .bind(&record.icon)
            .bind(&record.url)
            .bind(record.product_model)
            .bind(record.level)
            .bind(record.create_time)
            .fetch_one(&self.db_pool)
            .await?;
            return Ok(row.try_get::<i32, &str>("id")?);
        }

        let result = query(
            "UPDATE categorias SET parent_id = $1, nome = $2, enabled = $3, sort_num = $4, icon = $5, \
             url = $6, pro_model = $7, level = $8 WHERE id = $9 AND mch_id = $10",
        )
        .bind(record.parent_id)
        .bind(&record.name)
        .bind(record.enabled)
        .bind(record.sort_num)
        .bind(&record.icon)
        .bind(&record.url)
        .bind(record.product_model)
        .bind(record.level)
        .bind(record.id)
        .bind(record.tenant_id)
        .execute(&self.db_pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(CatalogError::NoSuchCategory);
        }
        Ok(record.id)
    }

    async fn delete(&self, scope: i32, id: i32) -> CatalogResult<()> {
        query("DELETE FROM categorias WHERE mch_id = $1 AND id = $2")
            .bind(scope)
            .bind(id)
            .execute(&self.db_pool)
            .await?;
        Ok(())
    }

    async fn has_assigned_products(&self, scope: i32, id: i32) -> CatalogResult<bool> {
        // Produtos do lojista podem usar categorias da plataforma, por isso o
        // escopo 0 considera todos os produtos da categoria.
        let exists = query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM produtos WHERE categoria_id = $1 AND ($2 = 0 OR mch_id = $2))",
        )
        .bind(id)
        .bind(scope)
        .fetch_one(&self.db_pool)
        .await?;
        Ok(exists)
    }
}

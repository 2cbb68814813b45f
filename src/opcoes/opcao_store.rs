// src/opcoes/opcao_store.rs

use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::{query, query_as, Pool, Postgres};

use super::opcao_structs::CategoryOption;
use crate::shared::errors::CatalogResult;

pub type OptionMap = BTreeMap<String, CategoryOption>;

/// Armazenamento das opções, chaveado pelo id da categoria.
#[async_trait]
pub trait OptionStore: Send + Sync {
    async fn read_all(&self, category_id: i32) -> CatalogResult<OptionMap>;

    /// Substitui todas as opções gravadas da categoria.
    async fn write_all(&self, category_id: i32, options: &OptionMap) -> CatalogResult<()>;

    async fn destroy(&self, category_id: i32) -> CatalogResult<()>;
}

/// Opções guardadas na tabela `categoria_opcoes`, uma linha por chave
/// com a opção serializada em JSON.
pub struct PgOptionStore {
    db_pool: Pool<Postgres>,
}

impl PgOptionStore {
    pub fn new(db_pool: Pool<Postgres>) -> Self {
        PgOptionStore { db_pool }
    }
}

#[async_trait]
impl OptionStore for PgOptionStore {
    async fn read_all(&self, category_id: i32) -> CatalogResult<OptionMap> {
        let rows = query_as::<_, (String, String)>(
            "SELECT opt_key, opcao FROM categoria_opcoes WHERE categoria_id = $1 ORDER BY opt_key",
        )
        .bind(category_id)
        .fetch_all(&self.db_pool)
        .await?;

        let mut options = OptionMap::new();
        for (key, json) in rows {
            options.insert(key, serde_json::from_str(&json)?);
        }
        Ok(options)
    }

    async fn write_all(&self, category_id: i32, options: &OptionMap) -> CatalogResult<()> {
        let mut tx = self.db_pool.begin().await?;
        query("DELETE FROM categoria_opcoes WHERE categoria_id = $1")
            .bind(category_id)
            .execute(&mut tx)
            .await?;
        for (key, option) in options {
            query("INSERT INTO categoria_opcoes (categoria_id, opt_key, opcao) VALUES ($1, $2, $3)")
                .bind(category_id)
                .bind(key)
                .bind(serde_json::to_string(option)?)
                .execute(&mut tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn destroy(&self, category_id: i32) -> CatalogResult<()> {
        query("DELETE FROM categoria_opcoes WHERE categoria_id = $1")
            .bind(category_id)
            .execute(&self.db_pool)
            .await?;
        Ok(())
    }
}

// src/categorias/categoria_memoria.rs

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::categoria_repository::CategoryRepository;
use super::categoria_structs::CategoryRecord;
use crate::shared::errors::{CatalogError, CatalogResult};

/// Repositório em memória, usado nos testes e por quem embute o catálogo
/// sem banco de dados.
#[derive(Debug, Default)]
pub struct MemoryCategoryRepository {
    records: Mutex<Vec<CategoryRecord>>,
    // (escopo, categoria) com produto vinculado
    products: Mutex<HashSet<(i32, i32)>>,
    next_id: Mutex<i32>,
    save_calls: AtomicUsize,
    list_calls: AtomicUsize,
}

impl MemoryCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cria o repositório já populado; os ids existentes são mantidos.
    pub fn with_records(records: Vec<CategoryRecord>) -> Self {
        let max_id = records.iter().map(|r| r.id).max().unwrap_or(0);
        MemoryCategoryRepository {
            records: Mutex::new(records),
            next_id: Mutex::new(max_id),
            ..Default::default()
        }
    }

    pub fn assign_product(&self, scope: i32, category_id: i32) {
        self.products.lock().unwrap_or_else(|e| e.into_inner()).insert((scope, category_id));
    }

    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> Vec<CategoryRecord> {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl CategoryRepository for MemoryCategoryRepository {
    async fn list_by_scope(&self, scope: i32) -> CatalogResult<Vec<CategoryRecord>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        let mut list: Vec<CategoryRecord> = records.iter().filter(|r| r.tenant_id == scope).cloned().collect();
        list.sort_by_key(|r| r.id);
        Ok(list)
    }

    async fn get_one(&self, scope: i32, id: i32) -> CatalogResult<Option<CategoryRecord>> {
        let records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        Ok(records.iter().find(|r| r.tenant_id == scope && r.id == id).cloned())
    }

    async fn save(&self, record: &CategoryRecord) -> CatalogResult<i32> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        if record.id == 0 {
            let mut next_id = self.next_id.lock().unwrap_or_else(|e| e.into_inner());
            *next_id += 1;
            let mut saved = record.clone();
            saved.id = *next_id;
            records.push(saved);
            return Ok(*next_id);
        }
        let existing = records
            .iter_mut()
            .find(|r| r.id == record.id && r.tenant_id == record.tenant_id)
            .ok_or(CatalogError::NoSuchCategory)?;
        *existing = record.clone();
        Ok(record.id)
    }

    async fn delete(&self, scope: i32, id: i32) -> CatalogResult<()> {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        records.retain(|r| !(r.tenant_id == scope && r.id == id));
        Ok(())
    }

    async fn has_assigned_products(&self, scope: i32, id: i32) -> CatalogResult<bool> {
        let products = self.products.lock().unwrap_or_else(|e| e.into_inner());
        Ok(products.contains(&(scope, id)))
    }
}

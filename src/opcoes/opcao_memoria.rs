// src/opcoes/opcao_memoria.rs

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::opcao_store::{OptionMap, OptionStore};
use crate::shared::errors::CatalogResult;

/// Store de opções em memória.
#[derive(Debug, Default)]
pub struct MemoryOptionStore {
    data: Mutex<HashMap<i32, OptionMap>>,
    writes: AtomicUsize,
}

impl MemoryOptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Quantas vezes `write_all` foi chamado.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn contains(&self, category_id: i32) -> bool {
        self.data.lock().unwrap_or_else(|e| e.into_inner()).contains_key(&category_id)
    }
}

#[async_trait]
impl OptionStore for MemoryOptionStore {
    async fn read_all(&self, category_id: i32) -> CatalogResult<OptionMap> {
        let data = self.data.lock().unwrap_or_else(|e| e.into_inner());
        Ok(data.get(&category_id).cloned().unwrap_or_default())
    }

    async fn write_all(&self, category_id: i32, options: &OptionMap) -> CatalogResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut data = self.data.lock().unwrap_or_else(|e| e.into_inner());
        data.insert(category_id, options.clone());
        Ok(())
    }

    async fn destroy(&self, category_id: i32) -> CatalogResult<()> {
        self.data.lock().unwrap_or_else(|e| e.into_inner()).remove(&category_id);
        Ok(())
    }
}

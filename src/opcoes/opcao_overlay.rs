// src/opcoes/opcao_overlay.rs

use std::sync::Arc;

use log::debug;

use super::opcao_store::{OptionMap, OptionStore};
use super::opcao_structs::{default_options, CategoryOption, OptionValue};
use crate::shared::errors::CatalogResult;

/// Configurações de uma categoria, persistidas à parte do registro.
///
/// Alterações ficam em memória até `flush`.
pub struct OptionOverlay {
    category_id: i32,
    store: Arc<dyn OptionStore>,
    options: OptionMap,
    dirty: bool,
}

impl OptionOverlay {
    /// Lê as opções da categoria. Se nada estiver gravado, grava os padrões.
    ///
    /// A sequência ler/semear/gravar não é atômica.
    pub async fn load(category_id: i32, store: Arc<dyn OptionStore>) -> CatalogResult<Self> {
        let options = store.read_all(category_id).await?;
        let mut overlay = OptionOverlay { category_id, store, options, dirty: false };
        if overlay.options.is_empty() {
            debug!("Semeando opções padrão da categoria {}", category_id);
            for option in default_options() {
                overlay.set(option);
            }
            overlay.flush().await?;
        }
        Ok(overlay)
    }

    pub fn category_id(&self) -> i32 {
        self.category_id
    }

    pub fn get(&self, key: &str) -> Option<&CategoryOption> {
        self.options.get(key)
    }

    pub fn value(&self, key: &str) -> Option<&OptionValue> {
        self.options.get(key).map(|o| &o.value)
    }

    /// Todas as opções, ordenadas pela chave.
    pub fn all(&self) -> Vec<CategoryOption> {
        self.options.values().cloned().collect()
    }

    pub fn set(&mut self, option: CategoryOption) {
        self.options.insert(option.key.clone(), option);
        self.dirty = true;
    }

    /// Altera apenas o valor; cria a opção se a chave não existir.
    pub fn set_value(&mut self, key: &str, value: OptionValue) {
        match self.options.get_mut(key) {
            Some(option) => option.value = value,
            None => {
                self.options.insert(
                    key.to_string(),
                    CategoryOption { key: key.to_string(), title: key.to_string(), required: false, value },
                );
            }
        }
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub async fn flush(&mut self) -> CatalogResult<()> {
        self.store.write_all(self.category_id, &self.options).await?;
        self.dirty = false;
        Ok(())
    }
}

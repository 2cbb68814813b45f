// src/categorias/categoria_manager.rs

use std::sync::{Arc, RwLock};

use chrono::Utc;
use log::info;

use super::categoria_repository::CategoryRepository;
use super::categoria_structs::{sort_categories, CategoryRecord};
use super::categoria::Category;
use super::categoria_arvore::CycleCheck;
use crate::configuracao::app_config::{PlatformConf, PlatformConfProvider};
use crate::opcoes::opcao_store::OptionStore;
use crate::shared::errors::{CatalogError, CatalogResult};

/// Escopo efetivo de um gerenciador de categorias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantScope {
    /// Tenant pedido pelo chamador.
    pub requested: i32,
    /// Tenant cujas categorias são usadas (0 = plataforma).
    pub effective: i32,
    /// Lojista usando as categorias da plataforma: apenas leitura.
    pub read_only: bool,
}

/// Resolve o escopo: se a plataforma não permite categorias próprias,
/// o lojista passa a ler as categorias da plataforma em modo somente leitura.
pub fn resolve_scope(mch_id: i32, conf: &PlatformConf) -> TenantScope {
    if mch_id > 0 && !conf.merchants_own_categories {
        return TenantScope { requested: mch_id, effective: 0, read_only: true };
    }
    TenantScope { requested: mch_id, effective: mch_id, read_only: false }
}

/// Cache da lista plana do escopo, invalidado explicitamente nas escritas.
#[derive(Debug, Default)]
pub struct CategoryListCache {
    list: RwLock<Option<Arc<Vec<CategoryRecord>>>>,
}

impl CategoryListCache {
    pub fn get(&self) -> Option<Arc<Vec<CategoryRecord>>> {
        self.list.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn store(&self, list: Vec<CategoryRecord>) -> Arc<Vec<CategoryRecord>> {
        let list = Arc::new(list);
        *self.list.write().unwrap_or_else(|e| e.into_inner()) = Some(list.clone());
        list
    }

    pub fn invalidate(&self) {
        *self.list.write().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

/// Serviço de categorias de um tenant.
pub struct CategoryManager {
    scope: TenantScope,
    cycle_check: CycleCheck,
    repo: Arc<dyn CategoryRepository>,
    option_store: Arc<dyn OptionStore>,
    cache: CategoryListCache,
}

impl CategoryManager {
    pub fn new(
        mch_id: i32,
        repo: Arc<dyn CategoryRepository>,
        option_store: Arc<dyn OptionStore>,
        conf: &dyn PlatformConfProvider,
    ) -> Self {
        let conf = conf.platform_conf();
        let scope = resolve_scope(mch_id, &conf);
        if scope.read_only {
            info!(
                "Lojista {} sem categorias próprias: usando as da plataforma (somente leitura)",
                mch_id
            );
        }
        CategoryManager {
            scope,
            cycle_check: conf.cycle_check,
            repo,
            option_store,
            cache: CategoryListCache::default(),
        }
    }

    pub fn scope(&self) -> TenantScope {
        self.scope
    }

    /// Id do escopo das consultas, 0 para a plataforma.
    pub fn relation_id(&self) -> i32 {
        self.scope.effective
    }

    pub fn read_only(&self) -> bool {
        self.scope.read_only
    }

    /// Para chamadores que vão alterar categorias.
    pub fn ensure_writable(&self) -> CatalogResult<()> {
        if self.scope.read_only {
            return Err(CatalogError::ReadOnlyScope);
        }
        Ok(())
    }

    fn wrap(&self, record: CategoryRecord) -> Category {
        Category::new(record, self.repo.clone(), self.option_store.clone(), self.cycle_check)
    }

    /// Cria a categoria em memória, sem persistir.
    pub fn create_category(&self, mut record: CategoryRecord) -> Category {
        if record.create_time == 0 {
            record.create_time = Utc::now().timestamp();
        }
        record.tenant_id = self.relation_id();
        self.cache.invalidate();
        self.wrap(record)
    }

    /// Salva a categoria e invalida o cache do escopo.
    pub async fn save_category(&self, category: &mut Category) -> CatalogResult<i32> {
        let result = category.save().await;
        self.cache.invalidate();
        result
    }

    /// `None` quando a categoria não existe no escopo.
    pub async fn get_category(&self, id: i32) -> CatalogResult<Option<Category>> {
        let record = self.repo.get_one(self.relation_id(), id).await?;
        Ok(record.map(|r| self.wrap(r)))
    }

    async fn records(&self) -> CatalogResult<Arc<Vec<CategoryRecord>>> {
        if let Some(list) = self.cache.get() {
            return Ok(list);
        }
        let list = self.repo.list_by_scope(self.relation_id()).await?;
        Ok(self.cache.store(list))
    }

    /// Todas as categorias do escopo, pela ordem de exibição.
    pub async fn list_categories(&self) -> CatalogResult<Vec<Category>> {
        let mut list = self.records().await?.as_ref().clone();
        sort_categories(&mut list);
        Ok(list.into_iter().map(|r| self.wrap(r)).collect())
    }

    /// Exclui a categoria e suas opções.
    pub async fn delete_category(&self, id: i32) -> CatalogResult<()> {
        let mut category = self.get_category(id).await?.ok_or(CatalogError::NoSuchCategory)?;
        if !category.children().await?.is_empty() {
            return Err(CatalogError::HasChildCategories);
        }
        if self.repo.has_assigned_products(self.relation_id(), id).await? {
            return Err(CatalogError::CategoryContainGoods);
        }

        self.repo.delete(self.relation_id(), id).await?;
        self.cache.invalidate();
        self.option_store.destroy(id).await?;
        info!("Categoria {} excluída do escopo {}", id, self.relation_id());
        Ok(())
    }
}

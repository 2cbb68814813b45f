// src/categorias/categoria.rs

use std::sync::Arc;

use log::{debug, info};

use super::categoria_repository::CategoryRepository;
use super::categoria_structs::CategoryRecord;
use super::categoria_arvore::{CategoryTree, CycleCheck, AUTO_URL_PREFIX};
use crate::opcoes::opcao_store::OptionStore;
use crate::opcoes::opcao_overlay::OptionOverlay;
use crate::shared::errors::{CatalogError, CatalogResult};

/// Agregado de uma categoria: valida a hierarquia, calcula nível e URL
/// e dá acesso às opções.
///
/// Depois de excluída pelo `CategoryManager` a instância não deve ser reutilizada.
pub struct Category {
    record: CategoryRecord,
    repo: Arc<dyn CategoryRepository>,
    option_store: Arc<dyn OptionStore>,
    cycle_check: CycleCheck,
    parent_changed: bool,
    children: Option<Vec<i32>>,
    options: Option<OptionOverlay>,
}

impl Category {
    pub fn new(
        record: CategoryRecord,
        repo: Arc<dyn CategoryRepository>,
        option_store: Arc<dyn OptionStore>,
        cycle_check: CycleCheck,
    ) -> Self {
        Category {
            record,
            repo,
            option_store,
            cycle_check,
            parent_changed: false,
            children: None,
            options: None,
        }
    }

    /// 0 enquanto não salva.
    pub fn id(&self) -> i32 {
        self.record.id
    }

    pub fn record(&self) -> &CategoryRecord {
        &self.record
    }

    /// Há troca de pai pendente de `save`?
    pub fn is_reparent_pending(&self) -> bool {
        self.parent_changed
    }

    async fn load_tree(&self) -> CatalogResult<CategoryTree> {
        let list = self.repo.list_by_scope(self.record.tenant_id).await?;
        Ok(CategoryTree::new(list))
    }

    /// Aplica os campos editáveis de `value` quando o id coincide.
    ///
    /// Se o pai mudou, valida antes de qualquer alteração; em caso de erro
    /// o registro fica intacto.
    pub async fn set_value(&mut self, value: &CategoryRecord) -> CatalogResult<()> {
        if value.id != self.record.id {
            debug!("set_value ignorado: id {} diferente de {}", value.id, self.record.id);
            return Ok(());
        }

        let parent_changed = value.parent_id != self.record.parent_id;
        if parent_changed {
            self.check_parent(value.parent_id).await?;
        }

        self.record.name = value.name.clone();
        self.record.enabled = value.enabled;
        self.record.sort_num = value.sort_num;
        self.record.icon = value.icon.clone();
        self.record.product_model = value.product_model;
        if !value.url.is_empty() {
            self.record.url = value.url.clone();
        }
        if parent_changed {
            info!(
                "Categoria {} trocando de pai: {} -> {}",
                self.record.id, self.record.parent_id, value.parent_id
            );
            self.record.parent_id = value.parent_id;
            self.parent_changed = true;
            self.children = None;
        }
        Ok(())
    }

    // Categorias novas só têm o pai conferido em `save`; raiz dispensa verificação.
    async fn check_parent(&self, parent_id: i32) -> CatalogResult<()> {
        let id = self.record.id;
        if id > 0 && parent_id == id {
            return Err(CatalogError::CategoryCycleReference);
        }
        if id <= 0 || parent_id == 0 {
            return Ok(());
        }
        let tree = self.load_tree().await?;
        if tree.creates_cycle(id, parent_id, self.cycle_check)? {
            return Err(CatalogError::CategoryCycleReference);
        }
        Ok(())
    }

    /// Ids das subcategorias diretas, calculados uma vez por instância.
    pub async fn children(&mut self) -> CatalogResult<Vec<i32>> {
        if let Some(children) = &self.children {
            return Ok(children.clone());
        }
        let children = if self.record.id == 0 {
            Vec::new()
        } else {
            self.load_tree().await?.children_of(self.record.id)
        };
        self.children = Some(children.clone());
        Ok(children)
    }

    fn url_is_stale(&self) -> bool {
        self.record.url.is_empty() || (self.parent_changed && self.record.url.starts_with(AUTO_URL_PREFIX))
    }

    /// Salva em duas fases: grava o registro para obter o id e, se a URL
    /// automática estiver desatualizada, grava mais uma vez com a URL nova.
    pub async fn save(&mut self) -> CatalogResult<i32> {
        let mut tree = self.load_tree().await?;
        let parent_id = self.record.parent_id;
        if parent_id != 0 && parent_id == self.record.id {
            return Err(CatalogError::CorruptedCategory(parent_id));
        }
        if parent_id != 0 && !tree.contains(parent_id) {
            return Err(CatalogError::NoSuchCategory);
        }
        self.record.level = tree.level_for_parent(parent_id)?;

        let id = self.repo.save(&self.record).await?;
        self.record.id = id;

        if self.url_is_stale() {
            tree.insert(self.record.clone());
            let url = tree.automatic_url(id)?;
            debug!("URL da categoria {}: {} -> {}", id, self.record.url, url);
            self.record.url = url;
            self.repo.save(&self.record).await?;
        }
        self.parent_changed = false;
        Ok(id)
    }

    /// Opções da categoria, carregadas (e semeadas) na primeira chamada.
    pub async fn options(&mut self) -> CatalogResult<&mut OptionOverlay> {
        if self.record.id == 0 {
            return Err(CatalogError::UnsavedCategory);
        }
        if self.options.is_none() {
            let overlay = OptionOverlay::load(self.record.id, self.option_store.clone()).await?;
            self.options = Some(overlay);
        }
        match self.options.as_mut() {
            Some(overlay) => Ok(overlay),
            None => Err(CatalogError::UnsavedCategory),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categorias::categoria_memoria::MemoryCategoryRepository;
    use crate::opcoes::opcao_memoria::MemoryOptionStore;

    fn rec(id: i32, parent_id: i32) -> CategoryRecord {
        CategoryRecord {
            id,
            parent_id,
            name: format!("cat-{}", id),
            enabled: true,
            url: if id > 0 { format!("/c-{}.htm", id) } else { String::new() },
            ..Default::default()
        }
    }

    fn setup(records: Vec<CategoryRecord>) -> (Arc<MemoryCategoryRepository>, Arc<MemoryOptionStore>) {
        (Arc::new(MemoryCategoryRepository::with_records(records)), Arc::new(MemoryOptionStore::new()))
    }

    fn category(
        record: CategoryRecord,
        repo: &Arc<MemoryCategoryRepository>,
        store: &Arc<MemoryOptionStore>,
        check: CycleCheck,
    ) -> Category {
        Category::new(record, repo.clone(), store.clone(), check)
    }

    #[actix_web::test]
    async fn nova_raiz_recebe_url_em_no_maximo_dois_saves() {
        let (repo, store) = setup(vec![]);
        let mut cat = category(rec(0, 0), &repo, &store, CycleCheck::FullChain);

        let id = cat.save().await.unwrap();

        assert_eq!(cat.id(), id);
        assert_eq!(cat.record().url, format!("/c-{}.htm", id));
        assert_eq!(cat.record().level, 1);
        assert_eq!(repo.save_calls(), 2);
        assert_eq!(repo.snapshot()[0].url, format!("/c-{}.htm", id));
    }

    #[actix_web::test]
    async fn url_segue_a_cadeia_de_ancestrais() {
        let (repo, store) = setup(vec![rec(1, 0), rec(2, 1)]);
        let mut cat = category(rec(0, 2), &repo, &store, CycleCheck::FullChain);

        let id = cat.save().await.unwrap();

        assert_eq!(id, 3);
        assert_eq!(cat.record().url, "/c-1-2-3.htm");
        assert_eq!(cat.record().level, 3);
    }

    #[actix_web::test]
    async fn url_personalizada_nao_e_sobrescrita() {
        let (repo, store) = setup(vec![rec(1, 0)]);
        let mut record = rec(0, 1);
        record.url = "/moda-feminina".into();
        let mut cat = category(record, &repo, &store, CycleCheck::FullChain);

        cat.save().await.unwrap();

        assert_eq!(cat.record().url, "/moda-feminina");
        assert_eq!(repo.save_calls(), 1);
    }

    #[actix_web::test]
    async fn pai_inexistente_no_save() {
        let (repo, store) = setup(vec![rec(1, 0)]);
        let mut cat = category(rec(0, 9), &repo, &store, CycleCheck::FullChain);

        assert!(matches!(cat.save().await, Err(CatalogError::NoSuchCategory)));
        assert_eq!(repo.save_calls(), 0);
    }

    #[actix_web::test]
    async fn troca_de_pai_recalcula_url_e_nivel() {
        let (repo, store) = setup(vec![rec(1, 0), rec(2, 0), rec(3, 1)]);
        let mut cat = category(rec(3, 1), &repo, &store, CycleCheck::FullChain);

        let mut value = rec(3, 2);
        value.name = "Calçados".into();
        cat.set_value(&value).await.unwrap();
        assert!(cat.is_reparent_pending());

        cat.save().await.unwrap();

        assert!(!cat.is_reparent_pending());
        assert_eq!(cat.record().parent_id, 2);
        assert_eq!(cat.record().name, "Calçados");
        assert_eq!(cat.record().url, "/c-2-3.htm");
        assert_eq!(cat.record().level, 2);
        assert_eq!(repo.save_calls(), 2);
    }

    #[actix_web::test]
    async fn ciclo_direto_deixa_registro_intacto() {
        let (repo, store) = setup(vec![rec(1, 0), rec(2, 1)]);
        let original = rec(1, 0);
        let mut cat = category(original.clone(), &repo, &store, CycleCheck::OneHop);

        let mut value = rec(1, 2);
        value.name = "outro nome".into();
        let result = cat.set_value(&value).await;

        assert!(matches!(result, Err(CatalogError::CategoryCycleReference)));
        assert_eq!(cat.record(), &original);
        assert!(!cat.is_reparent_pending());
    }

    #[actix_web::test]
    async fn ciclo_profundo_depende_da_verificacao() {
        let records = vec![rec(1, 0), rec(2, 1), rec(3, 2)];

        let (repo, store) = setup(records.clone());
        let mut full = category(rec(1, 0), &repo, &store, CycleCheck::FullChain);
        assert!(matches!(full.set_value(&rec(1, 3)).await, Err(CatalogError::CategoryCycleReference)));

        let (repo, store) = setup(records);
        let mut one_hop = category(rec(1, 0), &repo, &store, CycleCheck::OneHop);
        assert!(one_hop.set_value(&rec(1, 3)).await.is_ok());
    }

    #[actix_web::test]
    async fn pai_proposto_inexistente() {
        let (repo, store) = setup(vec![rec(1, 0), rec(2, 1)]);
        let mut cat = category(rec(2, 1), &repo, &store, CycleCheck::FullChain);

        assert!(matches!(cat.set_value(&rec(2, 99)).await, Err(CatalogError::NoSuchCategory)));
        assert_eq!(cat.record().parent_id, 1);
    }

    #[actix_web::test]
    async fn pai_negativo_e_recusado_sem_alterar() {
        let (repo, store) = setup(vec![rec(1, 0), rec(2, 1)]);
        let original = rec(2, 1);
        let mut cat = category(original.clone(), &repo, &store, CycleCheck::OneHop);

        let mut value = rec(2, -1);
        value.name = "outro nome".into();
        assert!(matches!(cat.set_value(&value).await, Err(CatalogError::NoSuchCategory)));
        assert_eq!(cat.record(), &original);
        assert!(!cat.is_reparent_pending());
    }

    #[actix_web::test]
    async fn proprio_id_como_pai() {
        let (repo, store) = setup(vec![rec(1, 0), rec(2, 1)]);
        let mut cat = category(rec(2, 1), &repo, &store, CycleCheck::OneHop);

        assert!(matches!(cat.set_value(&rec(2, 2)).await, Err(CatalogError::CategoryCycleReference)));
    }

    #[actix_web::test]
    async fn id_diferente_e_ignorado() {
        let (repo, store) = setup(vec![rec(1, 0), rec(2, 0)]);
        let mut cat = category(rec(1, 0), &repo, &store, CycleCheck::FullChain);

        let mut value = rec(2, 0);
        value.name = "outro".into();
        cat.set_value(&value).await.unwrap();

        assert_eq!(cat.record().name, "cat-1");
    }

    #[actix_web::test]
    async fn filhos_em_cache_na_instancia() {
        let (repo, store) = setup(vec![rec(1, 0), rec(2, 1), rec(3, 1)]);
        let mut cat = category(rec(1, 0), &repo, &store, CycleCheck::FullChain);

        assert_eq!(cat.children().await.unwrap(), vec![2, 3]);
        let calls = repo.list_calls();
        assert_eq!(cat.children().await.unwrap(), vec![2, 3]);
        assert_eq!(repo.list_calls(), calls);
    }

    #[actix_web::test]
    async fn opcoes_exigem_categoria_salva() {
        let (repo, store) = setup(vec![rec(1, 0)]);
        let mut nova = category(rec(0, 0), &repo, &store, CycleCheck::FullChain);
        assert!(matches!(nova.options().await, Err(CatalogError::UnsavedCategory)));

        let mut salva = category(rec(1, 0), &repo, &store, CycleCheck::FullChain);
        let overlay = salva.options().await.unwrap();
        assert_eq!(overlay.category_id(), 1);
        assert_eq!(store.writes(), 1);
        salva.options().await.unwrap();
        assert_eq!(store.writes(), 1);
    }
}

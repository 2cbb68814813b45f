// src/categorias/categoria_arvore.rs

use std::collections::{HashMap, HashSet};

use log::{error, warn};
use serde::Deserialize;

use super::categoria_structs::CategoryRecord;
use crate::shared::errors::{CatalogError, CatalogResult};

/// Prefixo das URLs geradas automaticamente.
pub const AUTO_URL_PREFIX: &str = "/c-";
const URL_HEAD: &str = "/c";
const URL_SUFFIX: &str = ".htm";

/// Profundidade da verificação de ciclo ao trocar o pai de uma categoria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleCheck {
    /// Rejeita apenas se o pai do novo pai for a própria categoria.
    #[default]
    OneHop,
    /// Rejeita se a categoria aparecer em qualquer ponto da cadeia do novo pai.
    FullChain,
}

/// Índice em memória da lista plana de categorias de um escopo.
///
/// Montado uma vez por operação: id -> registro e pai -> filhos.
#[derive(Debug, Default)]
pub struct CategoryTree {
    records: HashMap<i32, CategoryRecord>,
    children: HashMap<i32, Vec<i32>>,
}

impl CategoryTree {
    pub fn new(list: Vec<CategoryRecord>) -> Self {
        let mut tree = CategoryTree::default();
        for record in list {
            tree.insert(record);
        }
        tree
    }

    /// Insere ou substitui um registro, mantendo a ordem dos filhos.
    pub fn insert(&mut self, record: CategoryRecord) {
        if let Some(old) = self.records.get(&record.id) {
            if old.parent_id != record.parent_id {
                if let Some(siblings) = self.children.get_mut(&old.parent_id) {
                    siblings.retain(|id| *id != record.id);
                }
            } else {
                self.records.insert(record.id, record);
                return;
            }
        }
        // Um nó nunca é filho de si mesmo, mesmo com dados inconsistentes
        if record.id != record.parent_id {
            self.children.entry(record.parent_id).or_default().push(record.id);
        }
        self.records.insert(record.id, record);
    }

    pub fn get(&self, id: i32) -> Option<&CategoryRecord> {
        self.records.get(&id)
    }

    pub fn contains(&self, id: i32) -> bool {
        self.records.contains_key(&id)
    }

    /// Ids dos filhos diretos, na ordem da lista original.
    pub fn children_of(&self, id: i32) -> Vec<i32> {
        self.children.get(&id).cloned().unwrap_or_default()
    }

    /// Caminho da categoria até a raiz (folha -> raiz), incluindo a própria.
    ///
    /// Um registro com `id == parent_id` ou um id repetido na caminhada
    /// interrompem a busca com `CorruptedCategory`.
    pub fn ancestor_path(&self, id: i32) -> CatalogResult<Vec<i32>> {
        if !self.contains(id) {
            return Err(CatalogError::NoSuchCategory);
        }
        let mut path = Vec::new();
        let mut visited = HashSet::new();
        let mut current = id;
        while current != 0 {
            let record = match self.records.get(&current) {
                Some(r) => r,
                None => {
                    warn!("Categoria {} referencia o pai inexistente {}", path.last().copied().unwrap_or(id), current);
                    break;
                }
            };
            if record.id == record.parent_id || !visited.insert(record.id) {
                error!("Categoria corrompida na hierarquia: id {}", record.id);
                return Err(CatalogError::CorruptedCategory(record.id));
            }
            path.push(record.id);
            current = record.parent_id;
        }
        Ok(path)
    }

    /// Nível de uma categoria cujo pai é `parent_id`. Raiz = 1.
    pub fn level_for_parent(&self, parent_id: i32) -> CatalogResult<i32> {
        if parent_id == 0 {
            return Ok(1);
        }
        Ok(self.ancestor_path(parent_id)?.len() as i32 + 1)
    }

    /// Verifica se mover `id` para baixo de `parent_id` criaria um ciclo.
    pub fn creates_cycle(&self, id: i32, parent_id: i32, check: CycleCheck) -> CatalogResult<bool> {
        if parent_id == 0 {
            return Ok(false);
        }
        if parent_id == id {
            return Ok(true);
        }
        let parent = self.get(parent_id).ok_or(CatalogError::NoSuchCategory)?;
        match check {
            CycleCheck::OneHop => Ok(parent.parent_id == id),
            CycleCheck::FullChain => Ok(self.ancestor_path(parent_id)?.contains(&id)),
        }
    }

    /// URL automática da categoria, ex.: `/c-1-2-3.htm`.
    pub fn automatic_url(&self, id: i32) -> CatalogResult<String> {
        Ok(build_url(&self.ancestor_path(id)?))
    }
}

/// Monta a URL a partir do caminho folha -> raiz.
pub fn build_url(path: &[i32]) -> String {
    let mut url = String::from(URL_HEAD);
    for id in path.iter().rev() {
        url.push('-');
        url.push_str(&id.to_string());
    }
    url.push_str(URL_SUFFIX);
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: i32, parent_id: i32) -> CategoryRecord {
        CategoryRecord { id, parent_id, ..Default::default() }
    }

    fn chain() -> CategoryTree {
        CategoryTree::new(vec![rec(1, 0), rec(2, 1), rec(3, 2), rec(4, 1)])
    }

    #[test]
    fn filhos_preservam_ordem_e_excluem_o_proprio_no() {
        let tree = CategoryTree::new(vec![rec(1, 0), rec(3, 1), rec(5, 5), rec(2, 1)]);
        assert_eq!(tree.children_of(1), vec![3, 2]);
        assert!(tree.children_of(5).is_empty());
        assert!(tree.children_of(2).is_empty());
    }

    #[test]
    fn caminho_de_ancestrais_folha_para_raiz() {
        assert_eq!(chain().ancestor_path(3).unwrap(), vec![3, 2, 1]);
        assert_eq!(chain().ancestor_path(1).unwrap(), vec![1]);
    }

    #[test]
    fn nivel_e_um_a_mais_que_o_do_pai() {
        let tree = chain();
        assert_eq!(tree.level_for_parent(0).unwrap(), 1);
        assert_eq!(tree.level_for_parent(1).unwrap(), 2);
        assert_eq!(tree.level_for_parent(2).unwrap(), 3);
        assert_eq!(tree.level_for_parent(3).unwrap(), 4);
    }

    #[test]
    fn url_automatica_segue_da_raiz_para_a_folha() {
        assert_eq!(chain().automatic_url(3).unwrap(), "/c-1-2-3.htm");
        assert_eq!(chain().automatic_url(4).unwrap(), "/c-1-4.htm");
        assert_eq!(build_url(&[9]), "/c-9.htm");
    }

    #[test]
    fn auto_referencia_e_corrupcao() {
        let tree = CategoryTree::new(vec![rec(1, 0), rec(2, 2), rec(3, 2)]);
        assert!(matches!(tree.ancestor_path(3), Err(CatalogError::CorruptedCategory(2))));
        assert!(matches!(tree.level_for_parent(2), Err(CatalogError::CorruptedCategory(2))));
    }

    #[test]
    fn laco_profundo_nao_trava_a_caminhada() {
        let tree = CategoryTree::new(vec![rec(1, 3), rec(2, 1), rec(3, 2)]);
        assert!(matches!(tree.ancestor_path(1), Err(CatalogError::CorruptedCategory(_))));
    }

    #[test]
    fn categoria_inexistente() {
        assert!(matches!(chain().ancestor_path(42), Err(CatalogError::NoSuchCategory)));
        assert!(matches!(chain().creates_cycle(1, 42, CycleCheck::OneHop), Err(CatalogError::NoSuchCategory)));
    }

    #[test]
    fn ciclo_de_um_salto() {
        let tree = chain();
        // 2 é filho de 1: mover 1 para baixo de 2 fecha um ciclo direto
        assert!(tree.creates_cycle(1, 2, CycleCheck::OneHop).unwrap());
        // 3 é neto de 1: o teste de um salto não enxerga
        assert!(!tree.creates_cycle(1, 3, CycleCheck::OneHop).unwrap());
        assert!(!tree.creates_cycle(4, 2, CycleCheck::OneHop).unwrap());
    }

    #[test]
    fn ciclo_na_cadeia_completa() {
        let tree = chain();
        assert!(tree.creates_cycle(1, 2, CycleCheck::FullChain).unwrap());
        assert!(tree.creates_cycle(1, 3, CycleCheck::FullChain).unwrap());
        assert!(tree.creates_cycle(2, 2, CycleCheck::FullChain).unwrap());
        assert!(!tree.creates_cycle(4, 3, CycleCheck::FullChain).unwrap());
        assert!(!tree.creates_cycle(3, 0, CycleCheck::FullChain).unwrap());
    }

    #[test]
    fn reinsercao_move_o_filho_de_pai() {
        let mut tree = chain();
        tree.insert(rec(3, 4));
        assert_eq!(tree.children_of(2), Vec::<i32>::new());
        assert_eq!(tree.children_of(4), vec![3]);
        assert_eq!(tree.automatic_url(3).unwrap(), "/c-1-4-3.htm");
    }
}

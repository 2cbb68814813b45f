// src/categorias/categoria_structs.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Estrutura que representa uma categoria no banco de dados.
///
/// A árvore nunca é persistida como estrutura ligada: cada nó guarda apenas
/// o `parent_id` (0 = raiz) e a hierarquia é remontada em memória.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, FromRow)]
pub struct CategoryRecord {
    pub id: i32,
    pub parent_id: i32,
    /// 0 = categoria da plataforma (compartilhada), >0 = lojista.
    #[sqlx(rename = "mch_id")]
    pub tenant_id: i32,
    #[sqlx(rename = "nome")]
    pub name: String,
    pub enabled: bool,
    pub sort_num: i32,
    pub icon: Option<String>,
    pub url: String,
    /// Seletor do modelo de exibição dos produtos.
    #[sqlx(rename = "pro_model")]
    pub product_model: i32,
    pub level: i32,
    pub create_time: i64,
}

/// Estrutura para receber dados de uma nova categoria na requisição POST
#[derive(Debug, Deserialize)]
pub struct NovaCategoria {
    pub nome: String,
    pub parent_id: Option<i32>,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
    #[serde(default)]
    pub sort_num: i32,
    pub icon: Option<String>,
    /// URL personalizada; vazia gera a URL automática.
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub product_model: i32,
}

fn enabled_default() -> bool {
    true
}

impl NovaCategoria {
    /// Converte o payload no registro de uma categoria ainda não salva.
    pub fn into_record(self) -> CategoryRecord {
        CategoryRecord {
            parent_id: self.parent_id.unwrap_or(0),
            name: self.nome,
            enabled: self.enabled,
            sort_num: self.sort_num,
            icon: self.icon,
            url: self.url,
            product_model: self.product_model,
            ..Default::default()
        }
    }
}

/// Estrutura para receber a alteração de uma categoria na requisição PUT.
/// Campos ausentes mantêm o valor atual.
#[derive(Debug, Default, Deserialize)]
pub struct AlteracaoCategoria {
    pub nome: Option<String>,
    pub parent_id: Option<i32>,
    pub enabled: Option<bool>,
    pub sort_num: Option<i32>,
    pub icon: Option<String>,
    pub url: Option<String>,
    pub product_model: Option<i32>,
}

impl AlteracaoCategoria {
    /// Registro resultante de aplicar a alteração sobre `current`.
    pub fn apply_to(self, current: &CategoryRecord) -> CategoryRecord {
        CategoryRecord {
            parent_id: self.parent_id.unwrap_or(current.parent_id),
            name: self.nome.unwrap_or_else(|| current.name.clone()),
            enabled: self.enabled.unwrap_or(current.enabled),
            sort_num: self.sort_num.unwrap_or(current.sort_num),
            icon: self.icon.or_else(|| current.icon.clone()),
            url: self.url.unwrap_or_else(|| current.url.clone()),
            product_model: self.product_model.unwrap_or(current.product_model),
            ..current.clone()
        }
    }
}

/// Ordena pela ordem de exibição; empates são decididos pelo id.
pub fn sort_categories(list: &mut [CategoryRecord]) {
    list.sort_by_key(|c| (c.sort_num, c.id));
}

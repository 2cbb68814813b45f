// src/opcoes/opcao_structs.rs

use serde::{Deserialize, Serialize};

/// Chave da página usada para exibir os produtos da categoria.
pub const OPTION_VIEW_TEMPLATE: &str = "view_template";
/// Chave da descrição da categoria.
pub const OPTION_DESCRIPTION: &str = "description";

/// Valor tipado de uma opção. No JSON aparece como o valor puro.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Text(String),
    Bool(bool),
    Number(f64),
}

/// Uma opção de configuração da categoria.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryOption {
    pub key: String,
    pub title: String,
    /// Preenchimento obrigatório no painel.
    pub required: bool,
    pub value: OptionValue,
}

impl CategoryOption {
    pub fn text(key: &str, title: &str, value: &str) -> Self {
        CategoryOption {
            key: key.to_string(),
            title: title.to_string(),
            required: false,
            value: OptionValue::Text(value.to_string()),
        }
    }
}

/// Opções gravadas na primeira leitura de uma categoria sem configuração.
pub fn default_options() -> Vec<CategoryOption> {
    vec![
        CategoryOption::text(OPTION_VIEW_TEMPLATE, "Página de exibição", "goods_list.html"),
        CategoryOption::text(OPTION_DESCRIPTION, "Descrição", ""),
    ]
}

/// Payload para alterar valores de opções (PUT /categorias/{id}/opcoes).
#[derive(Debug, Deserialize)]
pub struct AlteracaoOpcao {
    pub key: String,
    pub value: OptionValue,
    pub title: Option<String>,
    pub required: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valor_tipado_no_json() {
        let opt = CategoryOption {
            key: "destaque".into(),
            title: "Destaque".into(),
            required: true,
            value: OptionValue::Bool(true),
        };
        let json = serde_json::to_value(&opt).unwrap();
        assert_eq!(json["value"], true);
        let back: CategoryOption = serde_json::from_value(json).unwrap();
        assert_eq!(back, opt);
    }

    #[test]
    fn valores_sem_tipo_explicito() {
        let texto: OptionValue = serde_json::from_str(r#""lista.html""#).unwrap();
        let numero: OptionValue = serde_json::from_str("12").unwrap();
        assert_eq!(texto, OptionValue::Text("lista.html".into()));
        assert_eq!(numero, OptionValue::Number(12.0));
    }

    #[test]
    fn padroes_tem_modelo_e_descricao() {
        let keys: Vec<String> = default_options().into_iter().map(|o| o.key).collect();
        assert_eq!(keys, vec![OPTION_VIEW_TEMPLATE, OPTION_DESCRIPTION]);
    }
}

// src/common/i18n.rs

use std::collections::HashMap;

pub const DEFAULT_LANG: &str = "pt";

type Catalog = HashMap<&'static str, &'static str>;

// Mensagens de erro e rótulos, por idioma.
// Chaves sem prefixo são códigos de erro; "entity.*" e "field.*" são rótulos.
const PT: &[(&str, &str)] = &[
    ("validation", "Um ou mais campos são inválidos."),
    ("invalid_parameter", "Parâmetro '{name}' inválido: '{value}'."),
    ("conflict", "Já existe {entity} com {field} '{value}'."),
    ("not_found", "{entity} #{id} não encontrado(a)."),
    ("linked_records", "Não é possível excluir {entity}: existem registros vinculados."),
    ("missing_reference", "{entity} referencia um registro que não existe."),
    ("forbidden", "Você não tem permissão para esta ação ({permission})."),
    ("invalid_credentials", "E-mail ou senha inválidos."),
    ("invalid_token", "Token de autenticação inválido ou ausente."),
    ("internal", "Ocorreu um erro inesperado."),
    ("entity.consultoria", "Consultoria"),
    ("entity.empresa", "Empresa"),
    ("entity.departamento", "Departamento"),
    ("entity.colaborador", "Colaborador"),
    ("entity.lider", "Líder"),
    ("entity.avaliacao", "Avaliação"),
    ("entity.feedback", "Feedback"),
    ("entity.pdi", "PDI"),
    ("entity.usuario", "Usuário"),
    ("field.cnpj", "CNPJ"),
    ("field.email", "e-mail"),
    ("field.nome", "nome"),
    ("field.colaborador", "colaborador"),
];

const EN: &[(&str, &str)] = &[
    ("validation", "One or more fields are invalid."),
    ("invalid_parameter", "Invalid '{name}' parameter: '{value}'."),
    ("conflict", "A {entity} with {field} '{value}' already exists."),
    ("not_found", "{entity} #{id} not found."),
    ("linked_records", "Cannot delete {entity}: there are linked records."),
    ("missing_reference", "{entity} references a record that does not exist."),
    ("forbidden", "You are not allowed to perform this action ({permission})."),
    ("invalid_credentials", "Invalid e-mail or password."),
    ("invalid_token", "Invalid or missing authentication token."),
    ("internal", "An unexpected error occurred."),
    ("entity.consultoria", "Consultancy"),
    ("entity.empresa", "Company"),
    ("entity.departamento", "Department"),
    ("entity.colaborador", "Collaborator"),
    ("entity.lider", "Leader"),
    ("entity.avaliacao", "Evaluation"),
    ("entity.feedback", "Feedback"),
    ("entity.pdi", "IDP"),
    ("entity.usuario", "User"),
    ("field.cnpj", "CNPJ"),
    ("field.email", "e-mail"),
    ("field.nome", "name"),
    ("field.colaborador", "collaborator"),
];

#[derive(Debug, Clone)]
pub struct I18nStore {
    catalogs: HashMap<&'static str, Catalog>,
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

impl I18nStore {
    pub fn new() -> Self {
        let mut catalogs = HashMap::new();
        catalogs.insert("pt", PT.iter().copied().collect());
        catalogs.insert("en", EN.iter().copied().collect());
        Self { catalogs }
    }

    /// Busca a mensagem no idioma pedido, caindo para o português.
    pub fn message(&self, lang: &str, key: &str) -> Option<&'static str> {
        self.catalogs
            .get(lang)
            .and_then(|c| c.get(key))
            .or_else(|| self.catalogs.get(DEFAULT_LANG).and_then(|c| c.get(key)))
            .copied()
    }

    /// Traduz e substitui os marcadores `{nome}` pelos argumentos.
    pub fn translate(&self, lang: &str, key: &str, args: &[(&str, &str)]) -> String {
        let mut text = self.message(lang, key).unwrap_or(key).to_string();
        for (name, value) in args {
            text = text.replace(&format!("{{{}}}", name), value);
        }
        text
    }

    pub fn entity_label(&self, lang: &str, entity: &str) -> String {
        self.message(lang, &format!("entity.{}", entity))
            .map(str::to_string)
            .unwrap_or_else(|| entity.to_string())
    }

    pub fn field_label(&self, lang: &str, field: &str) -> String {
        self.message(lang, &format!("field.{}", field))
            .map(str::to_string)
            .unwrap_or_else(|| field.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_language_falls_back_to_portuguese() {
        let store = I18nStore::new();
        assert_eq!(
            store.message("de", "internal"),
            Some("Ocorreu um erro inesperado.")
        );
    }

    #[test]
    fn placeholders_are_replaced() {
        let store = I18nStore::new();
        let msg = store.translate("en", "not_found", &[("entity", "Company"), ("id", "7")]);
        assert_eq!(msg, "Company #7 not found.");
    }

    #[test]
    fn labels_fall_back_to_the_raw_key() {
        let store = I18nStore::new();
        assert_eq!(store.entity_label("pt", "empresa"), "Empresa");
        assert_eq!(store.field_label("pt", "cargo"), "cargo");
    }
}

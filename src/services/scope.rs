// src/services/scope.rs

use crate::{
    common::{db_utils::FilterBuilder, error::AppError},
    db::EmpresaRepository,
    models::{
        auth::{CurrentUser, UserRole},
        empresa::EmpresaRef,
    },
};

/// O que cada perfil enxerga.
///
/// * Consultoria: todas as empresas cuja `consultoria_id` é a sua.
/// * Empresa: só ela mesma (id vindo do token).
/// * Colaborador: a própria empresa e os próprios registros.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Consultoria { consultoria_id: i32 },
    Empresa { empresa_id: i32 },
    Colaborador { empresa_id: i32, colaborador_id: i32 },
}

impl Scope {
    /// Monta o escopo a partir do token. Um token sem o vínculo exigido
    /// pelo perfil não enxerga nada.
    pub fn for_user(user: &CurrentUser) -> Result<Self, AppError> {
        let missing = || AppError::forbidden(format!("{}:sem-vinculo", user.role.as_str()));
        match user.role {
            UserRole::Consultoria => Ok(Scope::Consultoria {
                consultoria_id: user.consultoria_id.ok_or_else(missing)?,
            }),
            UserRole::Empresa => Ok(Scope::Empresa {
                empresa_id: user.empresa_id.ok_or_else(missing)?,
            }),
            UserRole::Colaborador => Ok(Scope::Colaborador {
                empresa_id: user.empresa_id.ok_or_else(missing)?,
                colaborador_id: user.colaborador_id.ok_or_else(missing)?,
            }),
        }
    }

    pub fn consultoria_id(&self) -> Option<i32> {
        match self {
            Scope::Consultoria { consultoria_id } => Some(*consultoria_id),
            _ => None,
        }
    }

    /// Restringe uma consulta sobre a própria tabela `empresas`.
    pub fn restrict_empresas(&self, fb: &mut FilterBuilder<'_>, id_col: &str, consultoria_col: &str) {
        match *self {
            Scope::Consultoria { consultoria_id } => {
                fb.eq(consultoria_col, Some(consultoria_id));
            }
            Scope::Empresa { empresa_id } | Scope::Colaborador { empresa_id, .. } => {
                fb.eq(id_col, Some(empresa_id));
            }
        }
    }

    /// Restringe uma consulta sobre uma tabela que pertence a uma empresa.
    /// Quando `colaborador_col` é informado, o colaborador só vê as linhas
    /// que são dele; sem ela, vê as da própria empresa.
    pub fn restrict(&self, fb: &mut FilterBuilder<'_>, empresa_col: &str, colaborador_col: Option<&str>) {
        match *self {
            Scope::Consultoria { consultoria_id } => {
                fb.and()
                    .push(empresa_col)
                    .push(" IN (SELECT id FROM empresas WHERE consultoria_id = ")
                    .push_bind(consultoria_id)
                    .push(")");
            }
            Scope::Empresa { empresa_id } => {
                fb.eq(empresa_col, Some(empresa_id));
            }
            Scope::Colaborador {
                empresa_id,
                colaborador_id,
            } => match colaborador_col {
                Some(col) => {
                    fb.eq(col, Some(colaborador_id));
                }
                None => {
                    fb.eq(empresa_col, Some(empresa_id));
                }
            },
        }
    }

    /// Decide se um registro da empresa `target` (e, opcionalmente, de um
    /// colaborador específico) está visível.
    pub fn permits(&self, target: &EmpresaRef, colaborador_id: Option<i32>) -> bool {
        match *self {
            Scope::Consultoria { consultoria_id } => target.consultoria_id == consultoria_id,
            Scope::Empresa { empresa_id } => target.id == empresa_id,
            Scope::Colaborador {
                empresa_id,
                colaborador_id: own,
            } => target.id == empresa_id && colaborador_id.is_none_or(|c| c == own),
        }
    }
}

/// Campos do painel que o front deve desfocar para o perfil.
/// Os valores continuam indo na resposta.
pub fn blurred_fields(role: UserRole) -> Vec<&'static str> {
    match role {
        UserRole::Empresa => vec!["mediaAvaliacoes", "pdisAtrasados"],
        UserRole::Consultoria | UserRole::Colaborador => Vec::new(),
    }
}

/// Verifica o escopo contra registros já gravados.
#[derive(Clone)]
pub struct AccessGuard {
    empresas: EmpresaRepository,
}

impl AccessGuard {
    pub fn new(empresas: EmpresaRepository) -> Self {
        Self { empresas }
    }

    /// Falha com NotFound se a empresa não existe e Forbidden se está fora do escopo.
    pub async fn check_empresa(
        &self,
        scope: &Scope,
        empresa_id: i32,
        colaborador_id: Option<i32>,
    ) -> Result<EmpresaRef, AppError> {
        let target = self
            .empresas
            .find_ref(empresa_id)
            .await?
            .ok_or_else(|| AppError::not_found("empresa", empresa_id))?;

        if !scope.permits(&target, colaborador_id) {
            tracing::warn!(?scope, empresa_id, "acesso fora do escopo negado");
            return Err(AppError::forbidden(format!("empresa:{}", empresa_id)));
        }
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user(role: UserRole, c: Option<i32>, e: Option<i32>, col: Option<i32>) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            role,
            consultoria_id: c,
            empresa_id: e,
            colaborador_id: col,
        }
    }

    const ACME: EmpresaRef = EmpresaRef { id: 10, consultoria_id: 1 };
    const OUTRA: EmpresaRef = EmpresaRef { id: 20, consultoria_id: 2 };

    #[test]
    fn scope_requires_the_role_link() {
        assert!(Scope::for_user(&user(UserRole::Empresa, Some(1), None, None)).is_err());
        assert!(Scope::for_user(&user(UserRole::Colaborador, None, Some(10), None)).is_err());
        assert_eq!(
            Scope::for_user(&user(UserRole::Empresa, Some(1), Some(10), None)).unwrap(),
            Scope::Empresa { empresa_id: 10 }
        );
    }

    #[test]
    fn consultoria_sees_all_of_its_companies_only() {
        let scope = Scope::Consultoria { consultoria_id: 1 };
        assert!(scope.permits(&ACME, None));
        assert!(scope.permits(&ACME, Some(99)));
        assert!(!scope.permits(&OUTRA, None));
    }

    #[test]
    fn empresa_sees_only_itself() {
        let scope = Scope::Empresa { empresa_id: 10 };
        assert!(scope.permits(&ACME, Some(5)));
        assert!(!scope.permits(&EmpresaRef { id: 11, consultoria_id: 1 }, None));
    }

    #[test]
    fn colaborador_sees_only_own_records() {
        let scope = Scope::Colaborador { empresa_id: 10, colaborador_id: 5 };
        assert!(scope.permits(&ACME, None));
        assert!(scope.permits(&ACME, Some(5)));
        assert!(!scope.permits(&ACME, Some(6)));
        assert!(!scope.permits(&OUTRA, Some(5)));
    }

    #[test]
    fn empresa_listing_is_pinned_to_one_id() {
        let mut fb = FilterBuilder::new("SELECT * FROM empresas");
        Scope::Empresa { empresa_id: 10 }.restrict_empresas(&mut fb, "id", "consultoria_id");
        let qb = fb.finish_ordered("nome");
        assert_eq!(qb.sql(), "SELECT * FROM empresas WHERE id = $1 ORDER BY nome");
    }

    #[test]
    fn consultoria_listing_filters_by_consultoria() {
        let mut fb = FilterBuilder::new("SELECT * FROM empresas");
        Scope::Consultoria { consultoria_id: 1 }.restrict_empresas(&mut fb, "id", "consultoria_id");
        assert_eq!(fb.finish_ordered("nome").sql(), "SELECT * FROM empresas WHERE consultoria_id = $1 ORDER BY nome");
    }

    #[test]
    fn child_tables_use_a_subquery_for_consultoria() {
        let mut fb = FilterBuilder::new("SELECT * FROM departamentos");
        Scope::Consultoria { consultoria_id: 1 }.restrict(&mut fb, "empresa_id", None);
        assert_eq!(
            fb.finish_ordered("nome").sql(),
            "SELECT * FROM departamentos WHERE empresa_id IN (SELECT id FROM empresas WHERE consultoria_id = $1) ORDER BY nome"
        );
    }

    #[test]
    fn colaborador_is_pinned_to_own_rows_when_possible() {
        let scope = Scope::Colaborador { empresa_id: 10, colaborador_id: 5 };

        let mut fb = FilterBuilder::new("SELECT * FROM pdis p");
        scope.restrict(&mut fb, "c.empresa_id", Some("p.colaborador_id"));
        assert_eq!(fb.finish_ordered("p.id").sql(), "SELECT * FROM pdis p WHERE p.colaborador_id = $1 ORDER BY p.id");

        let mut fb = FilterBuilder::new("SELECT * FROM departamentos");
        scope.restrict(&mut fb, "empresa_id", None);
        assert_eq!(fb.finish_ordered("id").sql(), "SELECT * FROM departamentos WHERE empresa_id = $1 ORDER BY id");
    }

    #[test]
    fn only_empresa_gets_blurred_statistics() {
        assert_eq!(blurred_fields(UserRole::Empresa), vec!["mediaAvaliacoes", "pdisAtrasados"]);
        assert!(blurred_fields(UserRole::Consultoria).is_empty());
    }
}

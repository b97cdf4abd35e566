// src/middleware/rbac.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::marker::PhantomData;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::auth::{CurrentUser, UserRole},
};

// ---
// MATRIZ DE PERMISSÕES
// ---
// As permissões são fixas por perfil. Não ficam no banco: o perfil viaja
// no token e a checagem não custa uma consulta.

const CONSULTORIA: &[&str] = &[
    "consultorias:manage",
    "empresas:read",
    "empresas:create",
    "empresas:update",
    "empresas:delete",
    "cadastros:read",
    "cadastros:write",
    "avaliacoes:read",
    "avaliacoes:write",
    "feedbacks:read",
    "feedbacks:write",
    "pdis:read",
    "pdis:write",
    "usuarios:write",
    "audit:read",
    "dashboard:read",
];

// A empresa administra o próprio cadastro, mas não cria nem exclui empresas
const EMPRESA: &[&str] = &[
    "empresas:read",
    "empresas:update",
    "cadastros:read",
    "cadastros:write",
    "avaliacoes:read",
    "avaliacoes:write",
    "feedbacks:read",
    "feedbacks:write",
    "pdis:read",
    "pdis:write",
    "usuarios:write",
    "dashboard:read",
];

// Somente leitura dos próprios dados
const COLABORADOR: &[&str] = &[
    "empresas:read",
    "cadastros:read",
    "avaliacoes:read",
    "feedbacks:read",
    "pdis:read",
];

pub fn permissions_for(role: UserRole) -> &'static [&'static str] {
    match role {
        UserRole::Consultoria => CONSULTORIA,
        UserRole::Empresa => EMPRESA,
        UserRole::Colaborador => COLABORADOR,
    }
}

pub fn role_grants(role: UserRole, slug: &str) -> bool {
    permissions_for(role).contains(&slug)
}

/// 1. O Trait que define o que é uma Permissão
pub trait PermissionDef: Send + Sync + 'static {
    fn slug() -> &'static str;
}

/// 2. O Extractor (Guardião)
pub struct RequirePermission<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let locale = Locale::from_headers(&parts.headers);
        let reject = |err: AppError| err.to_api_error(&locale, &app_state.i18n_store);

        // Colocado pelo auth_guard
        let user = parts
            .extensions
            .get::<CurrentUser>()
            .ok_or_else(|| reject(AppError::InvalidToken))?;

        let required_perm = T::slug();
        if !role_grants(user.role, required_perm) {
            tracing::debug!(user_id = %user.id, role = user.role.as_str(), required_perm, "permissão negada");
            return Err(reject(AppError::forbidden(required_perm)));
        }

        Ok(RequirePermission(PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS PERMISSÕES (TIPOS)
// ---

macro_rules! permission {
    ($name:ident, $slug:literal) => {
        pub struct $name;
        impl PermissionDef for $name {
            fn slug() -> &'static str {
                $slug
            }
        }
    };
}

permission!(PermConsultoriasManage, "consultorias:manage");
permission!(PermEmpresasRead, "empresas:read");
permission!(PermEmpresasCreate, "empresas:create");
permission!(PermEmpresasUpdate, "empresas:update");
permission!(PermEmpresasDelete, "empresas:delete");
permission!(PermCadastrosRead, "cadastros:read");
permission!(PermCadastrosWrite, "cadastros:write");
permission!(PermAvaliacoesRead, "avaliacoes:read");
permission!(PermAvaliacoesWrite, "avaliacoes:write");
permission!(PermFeedbacksRead, "feedbacks:read");
permission!(PermFeedbacksWrite, "feedbacks:write");
permission!(PermPdisRead, "pdis:read");
permission!(PermPdisWrite, "pdis:write");
permission!(PermUsuariosWrite, "usuarios:write");
permission!(PermAuditRead, "audit:read");
permission!(PermDashboardRead, "dashboard:read");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empresa_cannot_create_or_delete_companies() {
        assert!(role_grants(UserRole::Empresa, PermEmpresasUpdate::slug()));
        assert!(!role_grants(UserRole::Empresa, PermEmpresasCreate::slug()));
        assert!(!role_grants(UserRole::Empresa, PermEmpresasDelete::slug()));
        assert!(!role_grants(UserRole::Empresa, PermAuditRead::slug()));
    }

    #[test]
    fn colaborador_is_read_only() {
        assert!(permissions_for(UserRole::Colaborador)
            .iter()
            .all(|slug| slug.ends_with(":read")));
        assert!(!role_grants(UserRole::Colaborador, PermDashboardRead::slug()));
    }

    #[test]
    fn consultoria_holds_every_permission() {
        for role in [UserRole::Empresa, UserRole::Colaborador] {
            for slug in permissions_for(role) {
                assert!(role_grants(UserRole::Consultoria, slug), "{} faltando", slug);
            }
        }
        assert!(role_grants(UserRole::Consultoria, PermConsultoriasManage::slug()));
    }
}

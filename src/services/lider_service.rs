// src/services/lider_service.rs

use serde_json::json;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{
        lider_repo::{DEPARTAMENTOS, MEMBROS},
        ColaboradorRepository, LiderRepository,
    },
    models::{
        auth::{Actor, CurrentUser},
        lider::{CreateLiderPayload, Lider, LiderQuery, SetDepartamentosPayload, SetMembrosPayload, UpdateLiderPayload},
    },
    services::{
        audit_service::AuditService,
        scope::{AccessGuard, Scope},
    },
};

#[derive(Clone)]
pub struct LiderService {
    repo: LiderRepository,
    colaboradores: ColaboradorRepository,
    guard: AccessGuard,
    audit: AuditService,
    pool: PgPool,
}

impl LiderService {
    pub fn new(
        repo: LiderRepository,
        colaboradores: ColaboradorRepository,
        guard: AccessGuard,
        audit: AuditService,
        pool: PgPool,
    ) -> Self {
        Self {
            repo,
            colaboradores,
            guard,
            audit,
            pool,
        }
    }

    pub async fn list(&self, user: &CurrentUser, query: &LiderQuery) -> Result<Vec<Lider>, AppError> {
        let scope = Scope::for_user(user)?;
        self.repo.list(&scope, query).await
    }

    async fn load(&self, scope: &Scope, id: i32) -> Result<Lider, AppError> {
        let lider = self
            .repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("lider", id))?;
        self.guard.check_empresa(scope, lider.empresa_id, None).await?;
        Ok(lider)
    }

    pub async fn get(&self, user: &CurrentUser, id: i32) -> Result<Lider, AppError> {
        self.load(&Scope::for_user(user)?, id).await
    }

    /// O líder precisa ser colaborador da mesma empresa.
    async fn ensure_same_empresa(&self, colaborador_id: i32, empresa_id: i32) -> Result<(), AppError> {
        let colaborador_empresa = self
            .colaboradores
            .find_empresa_id(colaborador_id)
            .await?
            .ok_or_else(|| AppError::not_found("colaborador", colaborador_id))?;
        if colaborador_empresa != empresa_id {
            return Err(AppError::InvalidParameter {
                name: "colaboradorId",
                value: colaborador_id.to_string(),
            });
        }
        Ok(())
    }

    // Ninguém é membro da própria equipe
    fn ensure_not_self(lider_colaborador_id: i32, membro_ids: &[i32]) -> Result<(), AppError> {
        if membro_ids.contains(&lider_colaborador_id) {
            return Err(AppError::InvalidParameter {
                name: "membroIds",
                value: lider_colaborador_id.to_string(),
            });
        }
        Ok(())
    }

    pub async fn create(&self, actor: &Actor, payload: &CreateLiderPayload) -> Result<Lider, AppError> {
        let scope = Scope::for_user(&actor.user)?;
        self.guard.check_empresa(&scope, payload.empresa_id, None).await?;
        self.ensure_same_empresa(payload.colaborador_id, payload.empresa_id)
            .await?;
        Self::ensure_not_self(payload.colaborador_id, &payload.membro_ids)?;

        let mut tx = self.pool.begin().await?;
        let id = self
            .repo
            .insert(&mut tx, payload.empresa_id, payload.colaborador_id)
            .await?;
        MEMBROS
            .replace(&mut tx, id, payload.empresa_id, &payload.membro_ids)
            .await?;
        DEPARTAMENTOS
            .replace(&mut tx, id, payload.empresa_id, &payload.departamento_ids)
            .await?;
        let lider = self
            .repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("lider", id))?;
        tx.commit().await?;

        self.audit
            .record(
                actor,
                "lider.create",
                json!({ "id": id, "empresaId": lider.empresa_id, "colaboradorId": lider.colaborador_id }),
            )
            .await;
        Ok(lider)
    }

    pub async fn update(&self, actor: &Actor, id: i32, payload: &UpdateLiderPayload) -> Result<Lider, AppError> {
        let scope = Scope::for_user(&actor.user)?;
        let current = self.load(&scope, id).await?;
        self.ensure_same_empresa(payload.colaborador_id, current.empresa_id)
            .await?;
        Self::ensure_not_self(payload.colaborador_id, &current.membro_ids)?;

        if self.repo.update(id, payload.colaborador_id, payload.status).await? == 0 {
            return Err(AppError::not_found("lider", id));
        }
        let lider = self.load(&scope, id).await?;

        self.audit
            .record(
                actor,
                "lider.update",
                json!({ "id": id, "colaboradorId": lider.colaborador_id, "status": lider.status }),
            )
            .await;
        Ok(lider)
    }

    /// Substitui a equipe inteira do líder.
    pub async fn set_membros(&self, actor: &Actor, id: i32, payload: &SetMembrosPayload) -> Result<Lider, AppError> {
        let scope = Scope::for_user(&actor.user)?;
        let current = self.load(&scope, id).await?;
        Self::ensure_not_self(current.colaborador_id, &payload.colaborador_ids)?;

        let mut tx = self.pool.begin().await?;
        MEMBROS
            .replace(&mut tx, id, current.empresa_id, &payload.colaborador_ids)
            .await?;
        self.repo.touch(&mut tx, id).await?;
        let lider = self
            .repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("lider", id))?;
        tx.commit().await?;

        self.audit
            .record(actor, "lider.membros", json!({ "id": id, "membroIds": lider.membro_ids }))
            .await;
        Ok(lider)
    }

    pub async fn set_departamentos(
        &self,
        actor: &Actor,
        id: i32,
        payload: &SetDepartamentosPayload,
    ) -> Result<Lider, AppError> {
        let scope = Scope::for_user(&actor.user)?;
        let current = self.load(&scope, id).await?;

        let mut tx = self.pool.begin().await?;
        DEPARTAMENTOS
            .replace(&mut tx, id, current.empresa_id, &payload.departamento_ids)
            .await?;
        self.repo.touch(&mut tx, id).await?;
        let lider = self
            .repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("lider", id))?;
        tx.commit().await?;

        self.audit
            .record(
                actor,
                "lider.departamentos",
                json!({ "id": id, "departamentoIds": lider.departamento_ids }),
            )
            .await;
        Ok(lider)
    }

    pub async fn delete(&self, actor: &Actor, id: i32) -> Result<(), AppError> {
        let scope = Scope::for_user(&actor.user)?;
        let lider = self.load(&scope, id).await?;

        if self.repo.delete(id).await? == 0 {
            return Err(AppError::not_found("lider", id));
        }
        self.audit
            .record(actor, "lider.delete", json!({ "id": id, "empresaId": lider.empresa_id }))
            .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leader_cannot_be_in_its_own_team() {
        assert!(LiderService::ensure_not_self(5, &[1, 2, 3]).is_ok());
        assert!(matches!(
            LiderService::ensure_not_self(5, &[1, 5]),
            Err(AppError::InvalidParameter { name: "membroIds", .. })
        ));
    }
}

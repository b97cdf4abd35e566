// src/services/colaborador_service.rs

use serde_json::json;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::ColaboradorRepository,
    models::{
        auth::{Actor, CurrentUser},
        colaborador::{
            Colaborador, ColaboradorQuery, ContagemStatus, CreateColaboradorPayload, UpdateColaboradorPayload,
        },
    },
    services::{
        audit_service::AuditService,
        scope::{AccessGuard, Scope},
    },
};

#[derive(Clone)]
pub struct ColaboradorService {
    repo: ColaboradorRepository,
    guard: AccessGuard,
    audit: AuditService,
    pool: PgPool,
}

impl ColaboradorService {
    pub fn new(repo: ColaboradorRepository, guard: AccessGuard, audit: AuditService, pool: PgPool) -> Self {
        Self {
            repo,
            guard,
            audit,
            pool,
        }
    }

    pub async fn list(&self, user: &CurrentUser, query: &ColaboradorQuery) -> Result<Vec<Colaborador>, AppError> {
        let scope = Scope::for_user(user)?;
        self.repo.list(&scope, query).await
    }

    pub async fn contagem_status(&self, user: &CurrentUser) -> Result<ContagemStatus, AppError> {
        let scope = Scope::for_user(user)?;
        self.repo.contagem_status(&scope).await
    }

    async fn load(&self, scope: &Scope, id: i32) -> Result<Colaborador, AppError> {
        let colaborador = self
            .repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("colaborador", id))?;
        self.guard
            .check_empresa(scope, colaborador.empresa_id, Some(colaborador.id))
            .await?;
        Ok(colaborador)
    }

    pub async fn get(&self, user: &CurrentUser, id: i32) -> Result<Colaborador, AppError> {
        self.load(&Scope::for_user(user)?, id).await
    }

    pub async fn create(&self, actor: &Actor, payload: &CreateColaboradorPayload) -> Result<Colaborador, AppError> {
        let scope = Scope::for_user(&actor.user)?;
        self.guard.check_empresa(&scope, payload.empresa_id, None).await?;

        // Linha e departamentos entram juntos ou não entram
        let mut tx = self.pool.begin().await?;
        let id = self.repo.insert(&mut tx, payload).await?;
        let colaborador = self
            .repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("colaborador", id))?;
        tx.commit().await?;

        self.audit
            .record(
                actor,
                "colaborador.create",
                json!({ "id": id, "empresaId": colaborador.empresa_id, "nome": colaborador.nome }),
            )
            .await;
        Ok(colaborador)
    }

    pub async fn update(
        &self,
        actor: &Actor,
        id: i32,
        payload: &UpdateColaboradorPayload,
    ) -> Result<Colaborador, AppError> {
        let scope = Scope::for_user(&actor.user)?;
        let current = self.load(&scope, id).await?;

        let mut tx = self.pool.begin().await?;
        if !self.repo.update(&mut tx, id, current.empresa_id, payload).await? {
            return Err(AppError::not_found("colaborador", id));
        }
        let colaborador = self
            .repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("colaborador", id))?;
        tx.commit().await?;

        self.audit
            .record(actor, "colaborador.update", json!({ "id": id, "nome": colaborador.nome }))
            .await;
        Ok(colaborador)
    }

    pub async fn delete(&self, actor: &Actor, id: i32) -> Result<(), AppError> {
        let scope = Scope::for_user(&actor.user)?;
        let colaborador = self.load(&scope, id).await?;

        if self.repo.delete(id).await? == 0 {
            return Err(AppError::not_found("colaborador", id));
        }
        self.audit
            .record(
                actor,
                "colaborador.delete",
                json!({ "id": id, "empresaId": colaborador.empresa_id }),
            )
            .await;
        Ok(())
    }
}

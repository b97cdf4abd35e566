// src/services/departamento_service.rs

use serde_json::json;

use crate::{
    common::error::AppError,
    db::DepartamentoRepository,
    models::{
        auth::{Actor, CurrentUser},
        departamento::{CreateDepartamentoPayload, Departamento, DepartamentoQuery, UpdateDepartamentoPayload},
    },
    services::{
        audit_service::AuditService,
        scope::{AccessGuard, Scope},
    },
};

#[derive(Clone)]
pub struct DepartamentoService {
    repo: DepartamentoRepository,
    guard: AccessGuard,
    audit: AuditService,
}

impl DepartamentoService {
    pub fn new(repo: DepartamentoRepository, guard: AccessGuard, audit: AuditService) -> Self {
        Self { repo, guard, audit }
    }

    pub async fn list(&self, user: &CurrentUser, query: &DepartamentoQuery) -> Result<Vec<Departamento>, AppError> {
        let scope = Scope::for_user(user)?;
        self.repo.list(&scope, query).await
    }

    async fn load(&self, scope: &Scope, id: i32) -> Result<Departamento, AppError> {
        let departamento = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("departamento", id))?;
        self.guard.check_empresa(scope, departamento.empresa_id, None).await?;
        Ok(departamento)
    }

    pub async fn get(&self, user: &CurrentUser, id: i32) -> Result<Departamento, AppError> {
        self.load(&Scope::for_user(user)?, id).await
    }

    pub async fn create(&self, actor: &Actor, payload: &CreateDepartamentoPayload) -> Result<Departamento, AppError> {
        let scope = Scope::for_user(&actor.user)?;
        self.guard.check_empresa(&scope, payload.empresa_id, None).await?;

        let departamento = self.repo.create(payload).await?;
        self.audit
            .record(
                actor,
                "departamento.create",
                json!({ "id": departamento.id, "empresaId": departamento.empresa_id, "nome": departamento.nome }),
            )
            .await;
        Ok(departamento)
    }

    pub async fn update(
        &self,
        actor: &Actor,
        id: i32,
        payload: &UpdateDepartamentoPayload,
    ) -> Result<Departamento, AppError> {
        let scope = Scope::for_user(&actor.user)?;
        self.load(&scope, id).await?;

        let departamento = self
            .repo
            .update(id, payload)
            .await?
            .ok_or_else(|| AppError::not_found("departamento", id))?;
        self.audit
            .record(actor, "departamento.update", json!({ "id": id, "nome": departamento.nome }))
            .await;
        Ok(departamento)
    }

    pub async fn delete(&self, actor: &Actor, id: i32) -> Result<(), AppError> {
        let scope = Scope::for_user(&actor.user)?;
        let departamento = self.load(&scope, id).await?;

        if self.repo.delete(id).await? == 0 {
            return Err(AppError::not_found("departamento", id));
        }
        self.audit
            .record(
                actor,
                "departamento.delete",
                json!({ "id": id, "empresaId": departamento.empresa_id }),
            )
            .await;
        Ok(())
    }
}

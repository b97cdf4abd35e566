// src/services/empresa_service.rs

use serde_json::json;

use crate::{
    common::{error::AppError, validation::format_cnpj},
    db::EmpresaRepository,
    models::{
        auth::{Actor, CurrentUser},
        empresa::{Empresa, EmpresaEstatisticas, EmpresaPayload, EmpresaRef},
    },
    services::{
        audit_service::AuditService,
        scope::{AccessGuard, Scope},
    },
};

#[derive(Clone)]
pub struct EmpresaService {
    repo: EmpresaRepository,
    guard: AccessGuard,
    audit: AuditService,
}

impl EmpresaService {
    pub fn new(repo: EmpresaRepository, guard: AccessGuard, audit: AuditService) -> Self {
        Self { repo, guard, audit }
    }

    pub async fn list(&self, user: &CurrentUser) -> Result<Vec<Empresa>, AppError> {
        let scope = Scope::for_user(user)?;
        self.repo.list(&scope).await
    }

    pub async fn get(&self, user: &CurrentUser, id: i32) -> Result<Empresa, AppError> {
        let scope = Scope::for_user(user)?;
        let empresa = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("empresa", id))?;

        let target = EmpresaRef {
            id: empresa.id,
            consultoria_id: empresa.consultoria_id,
        };
        if !scope.permits(&target, None) {
            return Err(AppError::forbidden(format!("empresa:{}", id)));
        }
        Ok(empresa)
    }

    // A empresa nasce sempre na consultoria de quem cria
    pub async fn create(&self, actor: &Actor, payload: &EmpresaPayload) -> Result<Empresa, AppError> {
        let consultoria_id = Scope::for_user(&actor.user)?
            .consultoria_id()
            .ok_or_else(|| AppError::forbidden("empresas:create"))?;

        let cnpj = format_cnpj(&payload.cnpj);
        let empresa = self.repo.create(consultoria_id, payload, &cnpj).await?;

        self.audit
            .record(
                actor,
                "empresa.create",
                json!({ "id": empresa.id, "nome": empresa.nome, "cnpj": empresa.cnpj }),
            )
            .await;
        Ok(empresa)
    }

    pub async fn update(&self, actor: &Actor, id: i32, payload: &EmpresaPayload) -> Result<Empresa, AppError> {
        let scope = Scope::for_user(&actor.user)?;
        self.guard.check_empresa(&scope, id, None).await?;

        let cnpj = format_cnpj(&payload.cnpj);
        let empresa = self
            .repo
            .update(id, payload, &cnpj)
            .await?
            .ok_or_else(|| AppError::not_found("empresa", id))?;

        self.audit
            .record(actor, "empresa.update", json!({ "id": id, "nome": empresa.nome }))
            .await;
        Ok(empresa)
    }

    pub async fn delete(&self, actor: &Actor, id: i32) -> Result<(), AppError> {
        let scope = Scope::for_user(&actor.user)?;
        self.guard.check_empresa(&scope, id, None).await?;

        if self.repo.delete(id).await? == 0 {
            return Err(AppError::not_found("empresa", id));
        }

        self.audit.record(actor, "empresa.delete", json!({ "id": id })).await;
        Ok(())
    }

    pub async fn estatisticas(&self, user: &CurrentUser, id: i32) -> Result<EmpresaEstatisticas, AppError> {
        let scope = Scope::for_user(user)?;
        self.guard.check_empresa(&scope, id, None).await?;
        self.repo
            .estatisticas(id)
            .await?
            .ok_or_else(|| AppError::not_found("empresa", id))
    }
}

// src/services/pdi_service.rs

use serde_json::json;

use crate::{
    common::error::AppError,
    db::{pdi_repo::Prazo, ColaboradorRepository, PdiRepository},
    models::{
        auth::{Actor, CurrentUser},
        pdi::{CreatePdiPayload, Pdi, PdiPrazos, PdiQuery, PrazoQuery, UpdatePdiPayload},
    },
    services::{
        audit_service::AuditService,
        scope::{AccessGuard, Scope},
    },
};

#[derive(Clone)]
pub struct PdiService {
    repo: PdiRepository,
    colaboradores: ColaboradorRepository,
    guard: AccessGuard,
    audit: AuditService,
}

impl PdiService {
    pub fn new(
        repo: PdiRepository,
        colaboradores: ColaboradorRepository,
        guard: AccessGuard,
        audit: AuditService,
    ) -> Self {
        Self {
            repo,
            colaboradores,
            guard,
            audit,
        }
    }

    pub async fn list(&self, user: &CurrentUser, query: &PdiQuery) -> Result<Vec<Pdi>, AppError> {
        let scope = Scope::for_user(user)?;
        self.repo.list(&scope, query).await
    }

    /// PDIs em andamento que vencem nos próximos `dias` e os já vencidos.
    pub async fn prazos(&self, user: &CurrentUser, query: &PrazoQuery) -> Result<PdiPrazos, AppError> {
        let scope = Scope::for_user(user)?;
        let dias = query.dias();

        let (proximos_do_prazo, atrasados) = tokio::try_join!(
            self.repo.by_prazo(&scope, Prazo::Proximo { dias }),
            self.repo.by_prazo(&scope, Prazo::Atrasado),
        )?;

        Ok(PdiPrazos {
            dias,
            proximos_do_prazo,
            atrasados,
        })
    }

    async fn load(&self, scope: &Scope, id: i32) -> Result<Pdi, AppError> {
        let pdi = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("pdi", id))?;
        self.guard
            .check_empresa(scope, pdi.empresa_id, Some(pdi.colaborador_id))
            .await?;
        Ok(pdi)
    }

    pub async fn get(&self, user: &CurrentUser, id: i32) -> Result<Pdi, AppError> {
        self.load(&Scope::for_user(user)?, id).await
    }

    pub async fn create(&self, actor: &Actor, payload: &CreatePdiPayload) -> Result<Pdi, AppError> {
        let scope = Scope::for_user(&actor.user)?;
        let empresa_id = self
            .colaboradores
            .find_empresa_id(payload.colaborador_id)
            .await?
            .ok_or_else(|| AppError::not_found("colaborador", payload.colaborador_id))?;
        self.guard.check_empresa(&scope, empresa_id, None).await?;

        let pdi = self.repo.create(payload).await?;
        self.audit
            .record(
                actor,
                "pdi.create",
                json!({ "id": pdi.id, "colaboradorId": pdi.colaborador_id, "prazo": pdi.prazo }),
            )
            .await;
        Ok(pdi)
    }

    pub async fn update(&self, actor: &Actor, id: i32, payload: &UpdatePdiPayload) -> Result<Pdi, AppError> {
        let scope = Scope::for_user(&actor.user)?;
        self.load(&scope, id).await?;

        let pdi = self
            .repo
            .update(id, payload)
            .await?
            .ok_or_else(|| AppError::not_found("pdi", id))?;
        self.audit
            .record(actor, "pdi.update", json!({ "id": id, "status": pdi.status, "prazo": pdi.prazo }))
            .await;
        Ok(pdi)
    }

    pub async fn delete(&self, actor: &Actor, id: i32) -> Result<(), AppError> {
        let scope = Scope::for_user(&actor.user)?;
        let pdi = self.load(&scope, id).await?;

        if self.repo.delete(id).await? == 0 {
            return Err(AppError::not_found("pdi", id));
        }
        self.audit
            .record(actor, "pdi.delete", json!({ "id": id, "colaboradorId": pdi.colaborador_id }))
            .await;
        Ok(())
    }
}

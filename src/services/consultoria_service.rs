// src/services/consultoria_service.rs

use serde_json::json;

use crate::{
    common::{error::AppError, validation::format_cnpj},
    db::ConsultoriaRepository,
    models::{
        auth::{Actor, CurrentUser},
        consultoria::{Consultoria, UpdateConsultoriaPayload},
    },
    services::{audit_service::AuditService, scope::Scope},
};

#[derive(Clone)]
pub struct ConsultoriaService {
    repo: ConsultoriaRepository,
    audit: AuditService,
}

impl ConsultoriaService {
    pub fn new(repo: ConsultoriaRepository, audit: AuditService) -> Self {
        Self { repo, audit }
    }

    // Uma consultoria só administra a si mesma
    fn own_id(user: &CurrentUser, id: i32) -> Result<i32, AppError> {
        match Scope::for_user(user)?.consultoria_id() {
            Some(own) if own == id => Ok(own),
            _ => Err(AppError::forbidden(format!("consultoria:{}", id))),
        }
    }

    pub async fn list(&self, user: &CurrentUser) -> Result<Vec<Consultoria>, AppError> {
        let own = Scope::for_user(user)?
            .consultoria_id()
            .ok_or_else(|| AppError::forbidden("consultorias:manage"))?;
        Ok(self.repo.find_by_id(own).await?.into_iter().collect())
    }

    pub async fn get(&self, user: &CurrentUser, id: i32) -> Result<Consultoria, AppError> {
        let id = Self::own_id(user, id)?;
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("consultoria", id))
    }

    pub async fn update(
        &self,
        actor: &Actor,
        id: i32,
        payload: &UpdateConsultoriaPayload,
    ) -> Result<Consultoria, AppError> {
        let id = Self::own_id(&actor.user, id)?;
        let cnpj = payload.cnpj.as_deref().map(format_cnpj);

        let consultoria = self
            .repo
            .update(id, payload, cnpj.as_deref())
            .await?
            .ok_or_else(|| AppError::not_found("consultoria", id))?;

        self.audit
            .record(actor, "consultoria.update", json!({ "id": id, "nome": consultoria.nome }))
            .await;
        Ok(consultoria)
    }

    /// Exclusão lógica: a consultoria continua no banco como Inativo.
    pub async fn delete(&self, actor: &Actor, id: i32) -> Result<Consultoria, AppError> {
        let id = Self::own_id(&actor.user, id)?;
        let consultoria = self
            .repo
            .deactivate(id)
            .await?
            .ok_or_else(|| AppError::not_found("consultoria", id))?;

        tracing::info!(consultoria_id = id, "consultoria inativada");
        self.audit
            .record(actor, "consultoria.delete", json!({ "id": id }))
            .await;
        Ok(consultoria)
    }
}

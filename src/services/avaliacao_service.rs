// src/services/avaliacao_service.rs

use serde_json::json;

use crate::{
    common::error::AppError,
    db::{AvaliacaoRepository, ColaboradorRepository},
    models::{
        auth::{Actor, CurrentUser},
        avaliacao::{Avaliacao, AvaliacaoQuery, CreateAvaliacaoPayload, MediaAvaliacao, UpdateAvaliacaoPayload},
    },
    services::{
        audit_service::AuditService,
        scope::{AccessGuard, Scope},
    },
};

#[derive(Clone)]
pub struct AvaliacaoService {
    repo: AvaliacaoRepository,
    colaboradores: ColaboradorRepository,
    guard: AccessGuard,
    audit: AuditService,
}

impl AvaliacaoService {
    pub fn new(
        repo: AvaliacaoRepository,
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

    pub async fn list(&self, user: &CurrentUser, query: &AvaliacaoQuery) -> Result<Vec<Avaliacao>, AppError> {
        let scope = Scope::for_user(user)?;
        self.repo.list(&scope, query).await
    }

    pub async fn medias(&self, user: &CurrentUser, query: &AvaliacaoQuery) -> Result<Vec<MediaAvaliacao>, AppError> {
        let scope = Scope::for_user(user)?;
        self.repo.medias(&scope, query).await
    }

    async fn load(&self, scope: &Scope, id: i32) -> Result<Avaliacao, AppError> {
        let avaliacao = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("avaliacao", id))?;
        self.guard
            .check_empresa(scope, avaliacao.empresa_id, Some(avaliacao.colaborador_id))
            .await?;
        Ok(avaliacao)
    }

    pub async fn get(&self, user: &CurrentUser, id: i32) -> Result<Avaliacao, AppError> {
        self.load(&Scope::for_user(user)?, id).await
    }

    // Avaliador, quando informado, é colega da mesma empresa
    async fn ensure_avaliador(&self, avaliador_id: Option<i32>, empresa_id: i32) -> Result<(), AppError> {
        let Some(avaliador_id) = avaliador_id else {
            return Ok(());
        };
        match self.colaboradores.find_empresa_id(avaliador_id).await? {
            Some(e) if e == empresa_id => Ok(()),
            _ => Err(AppError::InvalidParameter {
                name: "avaliadorId",
                value: avaliador_id.to_string(),
            }),
        }
    }

    pub async fn create(&self, actor: &Actor, payload: &CreateAvaliacaoPayload) -> Result<Avaliacao, AppError> {
        let scope = Scope::for_user(&actor.user)?;
        let empresa_id = self
            .colaboradores
            .find_empresa_id(payload.colaborador_id)
            .await?
            .ok_or_else(|| AppError::not_found("colaborador", payload.colaborador_id))?;
        self.guard.check_empresa(&scope, empresa_id, None).await?;
        self.ensure_avaliador(payload.avaliador_id, empresa_id).await?;

        let avaliacao = self.repo.create(payload).await?;
        self.audit
            .record(
                actor,
                "avaliacao.create",
                json!({ "id": avaliacao.id, "colaboradorId": avaliacao.colaborador_id, "nota": avaliacao.nota }),
            )
            .await;
        Ok(avaliacao)
    }

    pub async fn update(
        &self,
        actor: &Actor,
        id: i32,
        payload: &UpdateAvaliacaoPayload,
    ) -> Result<Avaliacao, AppError> {
        let scope = Scope::for_user(&actor.user)?;
        let current = self.load(&scope, id).await?;
        self.ensure_avaliador(payload.avaliador_id, current.empresa_id).await?;

        let avaliacao = self
            .repo
            .update(id, payload)
            .await?
            .ok_or_else(|| AppError::not_found("avaliacao", id))?;
        self.audit
            .record(actor, "avaliacao.update", json!({ "id": id, "nota": avaliacao.nota }))
            .await;
        Ok(avaliacao)
    }

    pub async fn delete(&self, actor: &Actor, id: i32) -> Result<(), AppError> {
        let scope = Scope::for_user(&actor.user)?;
        let avaliacao = self.load(&scope, id).await?;

        if self.repo.delete(id).await? == 0 {
            return Err(AppError::not_found("avaliacao", id));
        }
        self.audit
            .record(
                actor,
                "avaliacao.delete",
                json!({ "id": id, "colaboradorId": avaliacao.colaborador_id }),
            )
            .await;
        Ok(())
    }
}

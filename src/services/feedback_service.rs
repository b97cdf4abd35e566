// src/services/feedback_service.rs

use serde_json::json;

use crate::{
    common::{db_utils::Page, error::AppError},
    db::{ColaboradorRepository, FeedbackRepository},
    models::{
        auth::{Actor, CurrentUser},
        feedback::{CreateFeedbackPayload, Feedback, FeedbackFilter, FeedbackQuery, UpdateFeedbackPayload},
    },
    services::{
        audit_service::AuditService,
        scope::{AccessGuard, Scope},
    },
};

#[derive(Clone)]
pub struct FeedbackService {
    repo: FeedbackRepository,
    colaboradores: ColaboradorRepository,
    guard: AccessGuard,
    audit: AuditService,
}

impl FeedbackService {
    pub fn new(
        repo: FeedbackRepository,
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

    pub async fn search(&self, user: &CurrentUser, query: &FeedbackQuery) -> Result<Page<Feedback>, AppError> {
        let scope = Scope::for_user(user)?;
        let filter = FeedbackFilter::parse(query)?;
        self.repo.search(&scope, &filter).await
    }

    async fn load(&self, scope: &Scope, id: i32) -> Result<Feedback, AppError> {
        let feedback = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("feedback", id))?;
        self.guard
            .check_empresa(scope, feedback.empresa_id, Some(feedback.avaliado_id))
            .await?;
        Ok(feedback)
    }

    pub async fn get(&self, user: &CurrentUser, id: i32) -> Result<Feedback, AppError> {
        self.load(&Scope::for_user(user)?, id).await
    }

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

    pub async fn create(&self, actor: &Actor, payload: &CreateFeedbackPayload) -> Result<Feedback, AppError> {
        let scope = Scope::for_user(&actor.user)?;
        let empresa_id = self
            .colaboradores
            .find_empresa_id(payload.avaliado_id)
            .await?
            .ok_or_else(|| AppError::not_found("colaborador", payload.avaliado_id))?;
        self.guard.check_empresa(&scope, empresa_id, None).await?;
        self.ensure_avaliador(payload.avaliador_id, empresa_id).await?;

        let feedback = self.repo.create(payload).await?;
        self.audit
            .record(
                actor,
                "feedback.create",
                json!({
                    "id": feedback.id,
                    "avaliadoId": feedback.avaliado_id,
                    "classificacao": feedback.classificacao,
                }),
            )
            .await;
        Ok(feedback)
    }

    pub async fn update(&self, actor: &Actor, id: i32, payload: &UpdateFeedbackPayload) -> Result<Feedback, AppError> {
        let scope = Scope::for_user(&actor.user)?;
        let current = self.load(&scope, id).await?;
        self.ensure_avaliador(payload.avaliador_id, current.empresa_id).await?;

        let feedback = self
            .repo
            .update(id, payload)
            .await?
            .ok_or_else(|| AppError::not_found("feedback", id))?;
        self.audit
            .record(
                actor,
                "feedback.update",
                json!({ "id": id, "classificacao": feedback.classificacao }),
            )
            .await;
        Ok(feedback)
    }

    pub async fn delete(&self, actor: &Actor, id: i32) -> Result<(), AppError> {
        let scope = Scope::for_user(&actor.user)?;
        let feedback = self.load(&scope, id).await?;

        if self.repo.delete(id).await? == 0 {
            return Err(AppError::not_found("feedback", id));
        }
        self.audit
            .record(actor, "feedback.delete", json!({ "id": id, "avaliadoId": feedback.avaliado_id }))
            .await;
        Ok(())
    }
}

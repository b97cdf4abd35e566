// src/services/audit_service.rs

use serde_json::Value;
use uuid::Uuid;

use crate::{
    common::{db_utils::Page, error::AppError},
    db::AuditRepository,
    models::{
        audit::{AuditFilter, AuditLog, AuditQuery, NewAuditEntry},
        auth::{Actor, CurrentUser},
    },
    services::scope::Scope,
};

#[derive(Clone)]
pub struct AuditService {
    repo: AuditRepository,
}

impl AuditService {
    pub fn new(repo: AuditRepository) -> Self {
        Self { repo }
    }

    /// Grava uma entrada do log. Uma falha aqui é só registrada no tracing:
    /// a operação que já foi feita não é desfeita por causa da auditoria.
    pub async fn record(&self, actor: &Actor, action: &str, details: Value) {
        self.record_for(Some(actor.user.id), actor.ip.clone(), action, details)
            .await;
    }

    /// Para eventos sem usuário autenticado ainda (login, cadastro).
    pub async fn record_for(&self, user_id: Option<Uuid>, ip: Option<String>, action: &str, details: Value) {
        let entry = NewAuditEntry {
            action: action.to_string(),
            user_id,
            ip,
            details,
        };

        match self.repo.insert(&entry).await {
            Ok(id) => tracing::debug!(audit_id = id, action, "auditoria registrada"),
            Err(e) => tracing::warn!(action, error = %e, "falha ao gravar auditoria"),
        }
    }

    pub async fn search(&self, user: &CurrentUser, query: &AuditQuery) -> Result<Page<AuditLog>, AppError> {
        let scope = Scope::for_user(user)?;
        let mut filter = AuditFilter::parse(query)?;

        // Só a consultoria lê o log, e apenas o dos próprios usuários
        filter.consultoria_id = Some(
            scope
                .consultoria_id()
                .ok_or_else(|| AppError::forbidden("audit:read"))?,
        );

        self.repo.search(&filter).await
    }
}

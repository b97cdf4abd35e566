// src/services/dashboard_service.rs

use crate::{
    common::error::AppError,
    db::DashboardRepository,
    models::{auth::CurrentUser, dashboard::DashboardStats},
    services::scope::{blurred_fields, Scope},
};

#[derive(Clone)]
pub struct DashboardService {
    repo: DashboardRepository,
}

impl DashboardService {
    pub fn new(repo: DashboardRepository) -> Self {
        Self { repo }
    }

    pub async fn stats(&self, user: &CurrentUser) -> Result<DashboardStats, AppError> {
        let scope = Scope::for_user(user)?;
        let counts = self.repo.counts(&scope).await?;
        Ok(DashboardStats::new(counts, blurred_fields(user.role)))
    }
}

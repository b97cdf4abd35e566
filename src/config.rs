// src/config.rs

use std::{env, net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::i18n::I18nStore,
    db::{
        AuditRepository, AvaliacaoRepository, ColaboradorRepository, ConsultoriaRepository, DashboardRepository,
        DepartamentoRepository, EmpresaRepository, FeedbackRepository, LiderRepository, PdiRepository,
        UserRepository,
    },
    services::{
        audit_service::AuditService, auth::AuthService, avaliacao_service::AvaliacaoService,
        colaborador_service::ColaboradorService, consultoria_service::ConsultoriaService,
        dashboard_service::DashboardService, departamento_service::DepartamentoService,
        empresa_service::EmpresaService, feedback_service::FeedbackService, lider_service::LiderService,
        pdi_service::PdiService, scope::AccessGuard,
    },
};

// ---
// Variáveis de ambiente
// ---

pub const DEFAULT_JWT_TTL_HOURS: i64 = 168;
// Dez anos; acima disso a soma com o relógio pode estourar
pub const MAX_JWT_TTL_HOURS: i64 = 87_600;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
    pub server_addr: SocketAddr,
}

impl AppConfig {
    /// Lê o `.env` (se existir) e depois o ambiente do processo.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("{} deve ser definida", key))
        };

        let jwt_ttl_hours = parse_or(&lookup, "JWT_TTL_HOURS", DEFAULT_JWT_TTL_HOURS)?;
        if !(1..=MAX_JWT_TTL_HOURS).contains(&jwt_ttl_hours) {
            anyhow::bail!(
                "JWT_TTL_HOURS fora do intervalo ({}): use de 1 a {}",
                jwt_ttl_hours,
                MAX_JWT_TTL_HOURS
            );
        }

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_ttl_hours,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            db_acquire_timeout: Duration::from_secs(parse_or(&lookup, "DB_ACQUIRE_TIMEOUT_SECS", 3)?),
            server_addr: parse_or(&lookup, "SERVER_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)))?,
        })
    }

    pub fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.db_max_connections)
            .acquire_timeout(self.db_acquire_timeout)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} inválida ('{}'): {}", key, raw, e)),
    }
}

// ---
// Estado compartilhado
// ---

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<AppConfig>,
    pub i18n_store: Arc<I18nStore>,

    pub auth_service: AuthService,
    pub audit_service: AuditService,
    pub consultoria_service: ConsultoriaService,
    pub empresa_service: EmpresaService,
    pub departamento_service: DepartamentoService,
    pub colaborador_service: ColaboradorService,
    pub lider_service: LiderService,
    pub avaliacao_service: AvaliacaoService,
    pub feedback_service: FeedbackService,
    pub pdi_service: PdiService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        let db_pool = config
            .pool_options()
            .connect(&config.database_url)
            .await
            .context("falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_pool(db_pool, config))
    }

    // Monta o gráfico de dependências sobre um pool já criado
    pub fn from_pool(db_pool: PgPool, config: AppConfig) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let consultoria_repo = ConsultoriaRepository::new(db_pool.clone());
        let empresa_repo = EmpresaRepository::new(db_pool.clone());
        let departamento_repo = DepartamentoRepository::new(db_pool.clone());
        let colaborador_repo = ColaboradorRepository::new(db_pool.clone());
        let lider_repo = LiderRepository::new(db_pool.clone());
        let avaliacao_repo = AvaliacaoRepository::new(db_pool.clone());
        let feedback_repo = FeedbackRepository::new(db_pool.clone());
        let pdi_repo = PdiRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());

        let guard = AccessGuard::new(empresa_repo.clone());
        let audit_service = AuditService::new(AuditRepository::new(db_pool.clone()));

        let auth_service = AuthService::new(
            user_repo,
            consultoria_repo.clone(),
            colaborador_repo.clone(),
            guard.clone(),
            audit_service.clone(),
            config.jwt_secret.clone(),
            config.jwt_ttl_hours,
            db_pool.clone(),
        );

        Self {
            consultoria_service: ConsultoriaService::new(consultoria_repo, audit_service.clone()),
            empresa_service: EmpresaService::new(empresa_repo, guard.clone(), audit_service.clone()),
            departamento_service: DepartamentoService::new(departamento_repo, guard.clone(), audit_service.clone()),
            colaborador_service: ColaboradorService::new(
                colaborador_repo.clone(),
                guard.clone(),
                audit_service.clone(),
                db_pool.clone(),
            ),
            lider_service: LiderService::new(
                lider_repo,
                colaborador_repo.clone(),
                guard.clone(),
                audit_service.clone(),
                db_pool.clone(),
            ),
            avaliacao_service: AvaliacaoService::new(
                avaliacao_repo,
                colaborador_repo.clone(),
                guard.clone(),
                audit_service.clone(),
            ),
            feedback_service: FeedbackService::new(
                feedback_repo,
                colaborador_repo.clone(),
                guard.clone(),
                audit_service.clone(),
            ),
            pdi_service: PdiService::new(pdi_repo, colaborador_repo, guard, audit_service.clone()),
            dashboard_service: DashboardService::new(dashboard_repo),
            auth_service,
            audit_service,
            i18n_store: Arc::new(I18nStore::new()),
            config: Arc::new(config),
            db_pool,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_only_required_are_set() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/ezer"),
            ("JWT_SECRET", "segredo"),
        ]))
        .unwrap();

        assert_eq!(config.jwt_ttl_hours, 168);
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.db_acquire_timeout, Duration::from_secs(3));
        assert_eq!(config.server_addr.to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn missing_required_variable_fails() {
        let err = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/ezer")])).unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));

        let err = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "  "), ("JWT_SECRET", "x")])).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/ezer"),
            ("JWT_SECRET", "x"),
            ("JWT_TTL_HOURS", "12"),
            ("DB_MAX_CONNECTIONS", "20"),
            ("DB_ACQUIRE_TIMEOUT_SECS", "10"),
            ("SERVER_ADDR", "127.0.0.1:8080"),
        ]))
        .unwrap();

        assert_eq!(config.jwt_ttl_hours, 12);
        assert_eq!(config.db_max_connections, 20);
        assert_eq!(config.db_acquire_timeout, Duration::from_secs(10));
        assert_eq!(config.server_addr.port(), 8080);
    }

    #[test]
    fn garbage_number_is_an_error() {
        let err = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/ezer"),
            ("JWT_SECRET", "x"),
            ("DB_MAX_CONNECTIONS", "muitas"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("DB_MAX_CONNECTIONS"));
    }

    #[test]
    fn token_ttl_outside_range_is_an_error() {
        for ttl in ["0", "-5", "87601", "99999999999999"] {
            let err = AppConfig::from_lookup(lookup(&[
                ("DATABASE_URL", "postgres://db/ezer"),
                ("JWT_SECRET", "x"),
                ("JWT_TTL_HOURS", ttl),
            ]))
            .unwrap_err();
            assert!(err.to_string().contains("JWT_TTL_HOURS"), "{ttl}");
        }

        let config = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/ezer"),
            ("JWT_SECRET", "x"),
            ("JWT_TTL_HOURS", "87600"),
        ]))
        .unwrap();
        assert_eq!(config.jwt_ttl_hours, MAX_JWT_TTL_HOURS);
    }
}

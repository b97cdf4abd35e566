pub mod audit_repo;
pub mod avaliacao_repo;
pub mod colaborador_repo;
pub mod consultoria_repo;
pub mod dashboard_repo;
pub mod departamento_repo;
pub mod empresa_repo;
pub mod feedback_repo;
pub mod lider_repo;
pub mod pdi_repo;
pub mod user_repo;

pub use audit_repo::AuditRepository;
pub use avaliacao_repo::AvaliacaoRepository;
pub use colaborador_repo::ColaboradorRepository;
pub use consultoria_repo::ConsultoriaRepository;
pub use dashboard_repo::DashboardRepository;
pub use departamento_repo::DepartamentoRepository;
pub use empresa_repo::EmpresaRepository;
pub use feedback_repo::FeedbackRepository;
pub use lider_repo::LiderRepository;
pub use pdi_repo::PdiRepository;
pub use user_repo::UserRepository;

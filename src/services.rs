pub mod audit_service;
pub mod auth;
pub mod avaliacao_service;
pub mod colaborador_service;
pub mod consultoria_service;
pub mod dashboard_service;
pub mod departamento_service;
pub mod empresa_service;
pub mod feedback_service;
pub mod lider_service;
pub mod pdi_service;
pub mod scope;

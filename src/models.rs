pub mod audit;
pub mod auth;
pub mod avaliacao;
pub mod colaborador;
pub mod consultoria;
pub mod dashboard;
pub mod departamento;
pub mod empresa;
pub mod feedback;
pub mod lider;
pub mod pdi;
pub mod status;

pub mod audit;
pub mod auth;
pub mod avaliacoes;
pub mod colaboradores;
pub mod consultorias;
pub mod dashboard;
pub mod departamentos;
pub mod empresas;
pub mod feedbacks;
pub mod health;
pub mod lideres;
pub mod pdis;

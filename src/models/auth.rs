// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Mapeia o CREATE TYPE user_role do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Consultoria,
    Empresa,
    Colaborador,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Consultoria => "consultoria",
            UserRole::Empresa => "empresa",
            UserRole::Colaborador => "colaborador",
        }
    }
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub nome: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,

    pub role: UserRole,
    pub consultoria_id: Option<i32>,
    pub empresa_id: Option<i32>,
    pub colaborador_id: Option<i32>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Estrutura de dados ("claims") dentro do JWT.
// O vínculo com consultoria/empresa/colaborador viaja no token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub sub: Uuid,
    pub role: UserRole,
    pub consultoria_id: Option<i32>,
    pub empresa_id: Option<i32>,
    pub colaborador_id: Option<i32>,
    pub exp: usize,
    pub iat: usize,
}

/// Quem está fazendo a requisição, montado a partir do token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Uuid,
    pub role: UserRole,
    pub consultoria_id: Option<i32>,
    pub empresa_id: Option<i32>,
    pub colaborador_id: Option<i32>,
}

impl From<Claims> for CurrentUser {
    fn from(c: Claims) -> Self {
        Self {
            id: c.sub,
            role: c.role,
            consultoria_id: c.consultoria_id,
            empresa_id: c.empresa_id,
            colaborador_id: c.colaborador_id,
        }
    }
}

impl From<&User> for CurrentUser {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            role: u.role,
            consultoria_id: u.consultoria_id,
            empresa_id: u.empresa_id,
            colaborador_id: u.colaborador_id,
        }
    }
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "rh@consultoria.com.br")]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

// Cadastro de uma nova consultoria junto com o primeiro usuário dela
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterConsultoriaPayload {
    #[validate(length(min = 2, message = "O nome da consultoria deve ter no mínimo 2 caracteres."))]
    #[schema(example = "Ezer Consultoria")]
    pub consultoria_nome: String,

    #[validate(custom(function = "crate::common::validation::validate_cnpj"))]
    pub consultoria_cnpj: Option<String>,

    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres."))]
    pub nome: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

// Criação de usuário por uma consultoria ou empresa
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserPayload {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres."))]
    pub nome: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,

    pub role: UserRole,
    pub empresa_id: Option<i32>,
    pub colaborador_id: Option<i32>,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

// Perfil + permissões, para o front desabilitar o que não pode
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user: User,
    #[schema(value_type = Vec<String>)]
    pub permissions: Vec<&'static str>,
}

/// Usuário + IP de origem: o contexto que os serviços recebem para
/// decidir o escopo e registrar a auditoria.
#[derive(Debug, Clone)]
pub struct Actor {
    pub user: CurrentUser,
    pub ip: Option<String>,
}

impl Actor {
    pub fn new(user: CurrentUser, ip: Option<String>) -> Self {
        Self { user, ip }
    }
}

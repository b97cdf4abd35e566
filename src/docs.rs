// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::common;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Health ---
        handlers::health::health,

        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,
        handlers::auth::list_users,
        handlers::auth::create_user,

        // --- Consultorias ---
        handlers::consultorias::list_consultorias,
        handlers::consultorias::get_consultoria,
        handlers::consultorias::update_consultoria,
        handlers::consultorias::delete_consultoria,

        // --- Empresas ---
        handlers::empresas::list_empresas,
        handlers::empresas::get_empresa,
        handlers::empresas::get_estatisticas,
        handlers::empresas::create_empresa,
        handlers::empresas::update_empresa,
        handlers::empresas::delete_empresa,

        // --- Departamentos ---
        handlers::departamentos::list_departamentos,
        handlers::departamentos::get_departamento,
        handlers::departamentos::create_departamento,
        handlers::departamentos::update_departamento,
        handlers::departamentos::delete_departamento,

        // --- Colaboradores ---
        handlers::colaboradores::list_colaboradores,
        handlers::colaboradores::contagem_status,
        handlers::colaboradores::get_colaborador,
        handlers::colaboradores::create_colaborador,
        handlers::colaboradores::update_colaborador,
        handlers::colaboradores::delete_colaborador,

        // --- Líderes ---
        handlers::lideres::list_lideres,
        handlers::lideres::get_lider,
        handlers::lideres::create_lider,
        handlers::lideres::update_lider,
        handlers::lideres::set_membros,
        handlers::lideres::set_departamentos,
        handlers::lideres::delete_lider,

        // --- Avaliações ---
        handlers::avaliacoes::list_avaliacoes,
        handlers::avaliacoes::medias,
        handlers::avaliacoes::get_avaliacao,
        handlers::avaliacoes::create_avaliacao,
        handlers::avaliacoes::update_avaliacao,
        handlers::avaliacoes::delete_avaliacao,

        // --- Feedbacks ---
        handlers::feedbacks::list_feedbacks,
        handlers::feedbacks::get_feedback,
        handlers::feedbacks::create_feedback,
        handlers::feedbacks::update_feedback,
        handlers::feedbacks::delete_feedback,

        // --- PDIs ---
        handlers::pdis::list_pdis,
        handlers::pdis::prazos,
        handlers::pdis::get_pdi,
        handlers::pdis::create_pdi,
        handlers::pdis::update_pdi,
        handlers::pdis::delete_pdi,

        // --- Auditoria e Dashboard ---
        handlers::audit::list_audit_logs,
        handlers::dashboard::get_dashboard,
    ),
    components(
        schemas(
            common::response::Deleted,
            common::db_utils::Page<models::audit::AuditLog>,
            common::db_utils::Page<models::feedback::Feedback>,

            // --- Auth ---
            models::auth::UserRole,
            models::auth::User,
            models::auth::LoginPayload,
            models::auth::RegisterConsultoriaPayload,
            models::auth::CreateUserPayload,
            models::auth::AuthResponse,
            models::auth::MeResponse,

            // --- Status ---
            models::status::StatusRegistro,
            models::status::PdiStatus,

            // --- Estrutura ---
            models::consultoria::Consultoria,
            models::consultoria::UpdateConsultoriaPayload,
            models::empresa::Empresa,
            models::empresa::EmpresaPayload,
            models::empresa::EmpresaEstatisticas,
            models::departamento::Departamento,
            models::departamento::CreateDepartamentoPayload,
            models::departamento::UpdateDepartamentoPayload,
            models::colaborador::Colaborador,
            models::colaborador::CreateColaboradorPayload,
            models::colaborador::UpdateColaboradorPayload,
            models::colaborador::ContagemStatus,
            models::lider::Lider,
            models::lider::CreateLiderPayload,
            models::lider::UpdateLiderPayload,
            models::lider::SetMembrosPayload,
            models::lider::SetDepartamentosPayload,

            // --- Desempenho ---
            models::avaliacao::Avaliacao,
            models::avaliacao::CreateAvaliacaoPayload,
            models::avaliacao::UpdateAvaliacaoPayload,
            models::avaliacao::MediaAvaliacao,
            models::feedback::Feedback,
            models::feedback::CreateFeedbackPayload,
            models::feedback::UpdateFeedbackPayload,
            models::pdi::Pdi,
            models::pdi::CreatePdiPayload,
            models::pdi::UpdatePdiPayload,
            models::pdi::PdiPrazos,

            // --- Auditoria e Dashboard ---
            models::audit::AuditLog,
            models::dashboard::DashboardStats,
        )
    ),
    tags(
        (name = "Health", description = "Situação do servidor"),
        (name = "Auth", description = "Cadastro, login e usuários"),
        (name = "Consultorias", description = "Dados da consultoria"),
        (name = "Empresas", description = "Empresas clientes da consultoria"),
        (name = "Departamentos", description = "Departamentos das empresas"),
        (name = "Colaboradores", description = "Colaboradores das empresas"),
        (name = "Líderes", description = "Líderes, equipes e departamentos liderados"),
        (name = "Avaliações", description = "Notas de desempenho"),
        (name = "Feedbacks", description = "Feedbacks entre colaboradores"),
        (name = "PDIs", description = "Planos de desenvolvimento individual"),
        (name = "Auditoria", description = "Log de ações"),
        (name = "Dashboard", description = "Indicadores gerenciais")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_protected_routes_with_bearer() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();

        assert!(doc["paths"]["/api/audit-logs"]["get"].is_object());
        assert!(doc["paths"]["/api/lideres/{id}/membros"]["put"].is_object());
        assert_eq!(doc["components"]["securitySchemes"]["api_jwt"]["scheme"], "bearer");
    }

    // Listagens paginadas documentam { items, limit, offset }, não um array
    #[test]
    fn paginated_lists_document_the_page_shape() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();

        for path in ["/api/audit-logs", "/api/feedbacks"] {
            let mut schema = &doc["paths"][path]["get"]["responses"]["200"]["content"]["application/json"]["schema"];
            if let Some(reference) = schema["$ref"].as_str() {
                let name = reference.rsplit('/').next().unwrap();
                schema = &doc["components"]["schemas"][name];
            }

            assert_ne!(schema["type"], "array", "{path}");
            assert!(schema["properties"]["items"].is_object(), "{path}");
            assert!(schema["properties"]["limit"].is_object(), "{path}");
            assert!(schema["properties"]["offset"].is_object(), "{path}");
        }
    }
}

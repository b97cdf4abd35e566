// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

// Os números que o banco devolve
#[derive(Debug, Clone, FromRow)]
pub struct DashboardCounts {
    pub empresas: i64,
    pub colaboradores_ativos: i64,
    pub colaboradores_inativos: i64,
    pub media_avaliacoes: Option<Decimal>,
    pub pdis_em_andamento: i64,
    pub pdis_concluidos: i64,
    pub pdis_atrasados: i64,
    pub feedbacks_30_dias: i64,
}

// Os cards do painel. `blurredFields` diz ao front quais valores
// devem aparecer desfocados para o perfil atual.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub empresas: i64,
    pub colaboradores_ativos: i64,
    pub colaboradores_inativos: i64,
    #[schema(value_type = Option<f64>)]
    pub media_avaliacoes: Option<Decimal>,
    pub pdis_em_andamento: i64,
    pub pdis_concluidos: i64,
    pub pdis_atrasados: i64,
    pub feedbacks_30_dias: i64,
    #[schema(value_type = Vec<String>)]
    pub blurred_fields: Vec<&'static str>,
}

impl DashboardStats {
    pub fn new(counts: DashboardCounts, blurred_fields: Vec<&'static str>) -> Self {
        Self {
            empresas: counts.empresas,
            colaboradores_ativos: counts.colaboradores_ativos,
            colaboradores_inativos: counts.colaboradores_inativos,
            media_avaliacoes: counts.media_avaliacoes,
            pdis_em_andamento: counts.pdis_em_andamento,
            pdis_concluidos: counts.pdis_concluidos,
            pdis_atrasados: counts.pdis_atrasados,
            feedbacks_30_dias: counts.feedbacks_30_dias,
            blurred_fields,
        }
    }
}

// src/models/metricas.rs

use serde::Serialize;
use utoipa::ToSchema;

// Contagem de entregas por bairro (top 20 do dashboard).
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct RegiaoContagem {
    pub bairro: String,
    pub total: i64,
}

// Indicadores do dashboard. As contagens por status usam os mesmos
// conjuntos de grafias do enum StatusPedido.
#[derive(Debug, Serialize, ToSchema)]
pub struct Metricas {
    pub total_entregas: i64,
    pub entregas_sucesso: i64,
    pub cancelamentos: i64,
    pub em_andamento: i64,
    pub regioes: Vec<RegiaoContagem>,
}

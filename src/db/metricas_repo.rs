// src/db/metricas_repo.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::{
        entrega::StatusPedido,
        metricas::{Metricas, RegiaoContagem},
    },
};

#[derive(Debug, sqlx::FromRow)]
struct ContagensStatus {
    total_entregas: i64,
    entregas_sucesso: i64,
    cancelamentos: i64,
}

#[derive(Clone)]
pub struct MetricasRepository {
    pool: PgPool,
}

impl MetricasRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn resumo(&self) -> Result<Metricas, AppError> {
        // As contagens usam os mesmos conjuntos de grafias da normalização
        // de leitura; um único scan resolve as três.
        let contagens = sqlx::query_as::<_, ContagensStatus>(
            r#"
            SELECT
                COUNT(*) AS total_entregas,
                COUNT(*) FILTER (WHERE LOWER(TRIM(status_pedido)) = ANY($1)) AS entregas_sucesso,
                COUNT(*) FILTER (WHERE LOWER(TRIM(status_pedido)) = ANY($2)) AS cancelamentos
            FROM entregas
            "#,
        )
        .bind(StatusPedido::aliases_entregue())
        .bind(StatusPedido::aliases_cancelado())
        .fetch_one(&self.pool)
        .await?;

        let regioes = sqlx::query_as::<_, RegiaoContagem>(
            r#"
            SELECT bairro, COUNT(*) AS total
            FROM entregas
            WHERE bairro IS NOT NULL AND TRIM(bairro) <> ''
            GROUP BY bairro
            ORDER BY total DESC
            LIMIT 20
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let em_andamento =
            contagens.total_entregas - contagens.entregas_sucesso - contagens.cancelamentos;

        Ok(Metricas {
            total_entregas: contagens.total_entregas,
            entregas_sucesso: contagens.entregas_sucesso,
            cancelamentos: contagens.cancelamentos,
            em_andamento,
            regioes,
        })
    }
}

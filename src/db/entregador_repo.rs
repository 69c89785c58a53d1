// src/db/entregador_repo.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::entregador::{Entregador, EntregadorPayload},
};

#[derive(Clone)]
pub struct EntregadorRepository {
    pool: PgPool,
}

impl EntregadorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> Result<Vec<Entregador>, AppError> {
        let entregadores =
            sqlx::query_as::<_, Entregador>("SELECT * FROM entregadores ORDER BY nome ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(entregadores)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Entregador>, AppError> {
        let entregador = sqlx::query_as::<_, Entregador>("SELECT * FROM entregadores WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(entregador)
    }

    pub async fn create(&self, payload: &EntregadorPayload) -> Result<Entregador, AppError> {
        let entregador = sqlx::query_as::<_, Entregador>(
            r#"
            INSERT INTO entregadores (nome, unidade, telefone, valor_frete, observacoes, ativo)
            VALUES ($1, $2, $3, $4, $5, COALESCE($6, TRUE))
            RETURNING *
            "#,
        )
        .bind(&payload.nome)
        .bind(&payload.unidade)
        .bind(&payload.telefone)
        .bind(payload.valor_frete)
        .bind(&payload.observacoes)
        .bind(payload.ativo)
        .fetch_one(&self.pool)
        .await?;
        Ok(entregador)
    }

    // Atualização substitui o cadastro inteiro; `ativo` omitido volta a TRUE.
    pub async fn update(
        &self,
        id: i32,
        payload: &EntregadorPayload,
    ) -> Result<Option<Entregador>, AppError> {
        let entregador = sqlx::query_as::<_, Entregador>(
            r#"
            UPDATE entregadores
            SET nome = $2,
                unidade = $3,
                telefone = $4,
                valor_frete = $5,
                observacoes = $6,
                ativo = COALESCE($7, TRUE),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.nome)
        .bind(&payload.unidade)
        .bind(&payload.telefone)
        .bind(payload.valor_frete)
        .bind(&payload.observacoes)
        .bind(payload.ativo)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entregador)
    }

    // As entregas que referenciam o cadastro ficam com entregador_id nulo
    // (ON DELETE SET NULL); o par texto legado preserva a exibição.
    pub async fn delete(&self, id: i32) -> Result<u64, AppError> {
        let resultado = sqlx::query("DELETE FROM entregadores WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(resultado.rows_affected())
    }
}

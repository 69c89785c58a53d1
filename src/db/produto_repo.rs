// src/db/produto_repo.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::produto::{Produto, ProdutoPayload},
};

#[derive(Clone)]
pub struct ProdutoRepository {
    pool: PgPool,
}

impl ProdutoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> Result<Vec<Produto>, AppError> {
        let produtos = sqlx::query_as::<_, Produto>("SELECT * FROM produtos ORDER BY nome ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(produtos)
    }

    // Catálogo considerado na sugestão de valor da finalização.
    pub async fn list_ativos(&self) -> Result<Vec<Produto>, AppError> {
        let produtos = sqlx::query_as::<_, Produto>(
            "SELECT * FROM produtos WHERE ativo = TRUE ORDER BY nome ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(produtos)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Produto>, AppError> {
        let produto = sqlx::query_as::<_, Produto>("SELECT * FROM produtos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(produto)
    }

    pub async fn create(&self, payload: &ProdutoPayload) -> Result<Produto, AppError> {
        let produto = sqlx::query_as::<_, Produto>(
            r#"
            INSERT INTO produtos (
                nome, valor, valor_pix, valor_debito, valor_credito,
                valor_entrega, valor_retirada, unidade, observacoes, ativo
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, COALESCE($10, TRUE))
            RETURNING *
            "#,
        )
        .bind(&payload.nome)
        .bind(payload.valor)
        .bind(payload.valor_pix)
        .bind(payload.valor_debito)
        .bind(payload.valor_credito)
        .bind(payload.valor_entrega)
        .bind(payload.valor_retirada)
        .bind(&payload.unidade)
        .bind(&payload.observacoes)
        .bind(payload.ativo)
        .fetch_one(&self.pool)
        .await?;
        Ok(produto)
    }

    pub async fn update(
        &self,
        id: i32,
        payload: &ProdutoPayload,
    ) -> Result<Option<Produto>, AppError> {
        let produto = sqlx::query_as::<_, Produto>(
            r#"
            UPDATE produtos
            SET nome = $2,
                valor = $3,
                valor_pix = $4,
                valor_debito = $5,
                valor_credito = $6,
                valor_entrega = $7,
                valor_retirada = $8,
                unidade = $9,
                observacoes = $10,
                ativo = COALESCE($11, TRUE),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.nome)
        .bind(payload.valor)
        .bind(payload.valor_pix)
        .bind(payload.valor_debito)
        .bind(payload.valor_credito)
        .bind(payload.valor_entrega)
        .bind(payload.valor_retirada)
        .bind(&payload.unidade)
        .bind(&payload.observacoes)
        .bind(payload.ativo)
        .fetch_optional(&self.pool)
        .await?;
        Ok(produto)
    }

    pub async fn delete(&self, id: i32) -> Result<u64, AppError> {
        let resultado = sqlx::query("DELETE FROM produtos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(resultado.rows_affected())
    }

    pub async fn unidades(&self) -> Result<Vec<String>, AppError> {
        let unidades = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT unidade
            FROM produtos
            WHERE unidade IS NOT NULL AND unidade <> ''
            ORDER BY unidade ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(unidades)
    }
}

// src/db/configuracao_repo.rs

use sqlx::PgPool;

use crate::{common::error::AppError, models::configuracao::Configuracao};

// Par chave/valor editável em tempo de execução (URLs de webhook etc.).
#[derive(Clone)]
pub struct ConfiguracaoRepository {
    pool: PgPool,
}

impl ConfiguracaoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> Result<Vec<Configuracao>, AppError> {
        let configuracoes = sqlx::query_as::<_, Configuracao>(
            "SELECT id, key, value FROM configuracoes ORDER BY key ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(configuracoes)
    }

    // Chave ausente vira None; quem chama decide o fallback.
    pub async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let valor = sqlx::query_scalar::<_, String>("SELECT value FROM configuracoes WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(valor)
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<Configuracao, AppError> {
        let configuracao = sqlx::query_as::<_, Configuracao>(
            r#"
            INSERT INTO configuracoes (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value
            RETURNING id, key, value
            "#,
        )
        .bind(key)
        .bind(value)
        .fetch_one(&self.pool)
        .await?;
        Ok(configuracao)
    }

    pub async fn delete(&self, key: &str) -> Result<u64, AppError> {
        let resultado = sqlx::query("DELETE FROM configuracoes WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(resultado.rows_affected())
    }
}

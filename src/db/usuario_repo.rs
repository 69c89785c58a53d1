// src/db/usuario_repo.rs

use sqlx::PgPool;

use crate::{common::error::AppError, models::auth::Usuario};

#[derive(Clone)]
pub struct UsuarioRepository {
    pool: PgPool,
}

impl UsuarioRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Usuario>, AppError> {
        let usuario =
            sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios WHERE LOWER(email) = LOWER($1)")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        Ok(usuario)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Usuario>, AppError> {
        let usuario = sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(usuario)
    }

    pub async fn list_all(&self) -> Result<Vec<Usuario>, AppError> {
        let usuarios = sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios ORDER BY id DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(usuarios)
    }

    pub async fn create(
        &self,
        email: &str,
        nome: Option<&str>,
        role: &str,
        is_active: bool,
        password_hash: &str,
    ) -> Result<Usuario, AppError> {
        sqlx::query_as::<_, Usuario>(
            r#"
            INSERT INTO usuarios (email, nome, role, is_active, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(nome)
        .bind(role)
        .bind(is_active)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Violação de chave única vira um conflito amigável
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::Conflito("email_exists");
                }
            }
            AppError::DatabaseError(e)
        })
    }

    // Atualização parcial: campo ausente mantém o que está gravado.
    pub async fn update_parcial(
        &self,
        id: i32,
        nome: Option<&str>,
        role: Option<&str>,
        is_active: Option<bool>,
    ) -> Result<Option<Usuario>, AppError> {
        let usuario = sqlx::query_as::<_, Usuario>(
            r#"
            UPDATE usuarios
            SET nome = COALESCE($2, nome),
                role = COALESCE($3, role),
                is_active = COALESCE($4, is_active)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(nome)
        .bind(role)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await?;
        Ok(usuario)
    }

    pub async fn set_password(&self, id: i32, password_hash: &str) -> Result<u64, AppError> {
        let resultado = sqlx::query("UPDATE usuarios SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        Ok(resultado.rows_affected())
    }

    pub async fn delete(&self, id: i32) -> Result<u64, AppError> {
        let resultado = sqlx::query("DELETE FROM usuarios WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(resultado.rows_affected())
    }
}

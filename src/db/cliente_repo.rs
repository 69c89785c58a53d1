// src/db/cliente_repo.rs

use sqlx::PgPool;

use crate::{common::error::AppError, models::cliente::ClienteOrigem};

// Clientes não têm tabela própria: a consolidação parte das entregas e
// agrupa em memória (ver models::cliente::consolidar_clientes).
#[derive(Clone)]
pub struct ClienteRepository {
    pool: PgPool,
}

impl ClienteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_origens(&self) -> Result<Vec<ClienteOrigem>, AppError> {
        let origens = sqlx::query_as::<_, ClienteOrigem>(
            "SELECT id, nome_cliente, telefone_cliente, bairro, cidade, status_pedido FROM entregas",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(origens)
    }
}

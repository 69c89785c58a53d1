// src/db/entrega_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::entrega::{CriarEntregaPayload, EntregaRegistro, FinalizacaoEntrega, StatusPedido},
};

// Toda leitura passa pela mesma lista de colunas (linha de `entregas` mais o
// LEFT JOIN do cadastro de entregadores) para que listagem, busca por id e
// CSV nunca divirjam na projeção.
const COLUNAS_VISAO: &str = "e.id, e.protocolo, e.nome_cliente, e.telefone_cliente, e.bairro, \
     e.cidade, e.ponto_referencia, e.endereco, e.mercadoria, e.entregador_id, e.entregador, \
     e.telefone_entregador, e.forma_pagamento, e.valor_itens, e.valor_frete, e.valor_total, \
     e.observacoes, e.status_pedido, e.data_e_hora_inicio_pedido, e.data_e_hora_envio_pedido, \
     e.data_e_hora_confirmacao_pedido, e.data_e_hora_cancelamento_pedido, e.finalizado_em, \
     e.created_at, c.nome AS cadastro_nome, c.telefone AS cadastro_telefone, \
     c.valor_frete AS cadastro_valor_frete";

const FROM_VISAO: &str = "FROM entregas e LEFT JOIN entregadores c ON c.id = e.entregador_id";

#[derive(Clone)]
pub struct EntregaRepository {
    pool: PgPool,
}

impl EntregaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  LEITURA
    // =========================================================================

    pub async fn find_by_id(&self, id: i32) -> Result<Option<EntregaRegistro>, AppError> {
        let sql = format!("SELECT {COLUNAS_VISAO} {FROM_VISAO} WHERE e.id = $1");
        let registro = sqlx::query_as::<_, EntregaRegistro>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(registro)
    }

    pub async fn list_page(
        &self,
        limite: i64,
        offset: i64,
    ) -> Result<Vec<EntregaRegistro>, AppError> {
        let sql =
            format!("SELECT {COLUNAS_VISAO} {FROM_VISAO} ORDER BY e.id DESC LIMIT $1 OFFSET $2");
        let registros = sqlx::query_as::<_, EntregaRegistro>(&sql)
            .bind(limite)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(registros)
    }

    pub async fn count_all(&self) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM entregas")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    // Exportação: a mesma visão da listagem, sem paginação.
    pub async fn list_all(&self) -> Result<Vec<EntregaRegistro>, AppError> {
        let sql = format!("SELECT {COLUNAS_VISAO} {FROM_VISAO} ORDER BY e.id DESC");
        let registros = sqlx::query_as::<_, EntregaRegistro>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(registros)
    }

    // Distingue "não existe" de "perdeu a corrida" quando um UPDATE guardado
    // não afeta nenhuma linha.
    pub async fn exists(&self, id: i32) -> Result<bool, AppError> {
        let existe =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM entregas WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(existe)
    }

    // =========================================================================
    //  CRIAÇÃO
    // =========================================================================

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        payload: &CriarEntregaPayload,
    ) -> Result<i32, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO entregas (
                nome_cliente, telefone_cliente, bairro, cidade, ponto_referencia,
                endereco, mercadoria, entregador_id, valor_itens, valor_frete,
                observacoes, status_pedido
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 'pendente')
            RETURNING id
            "#,
        )
        .bind(&payload.nome_cliente)
        .bind(&payload.telefone_cliente)
        .bind(&payload.bairro)
        .bind(&payload.cidade)
        .bind(&payload.ponto_referencia)
        .bind(&payload.endereco)
        .bind(&payload.mercadoria)
        .bind(payload.entregador_id)
        .bind(payload.valor_itens)
        .bind(payload.valor_frete)
        .bind(&payload.observacoes)
        .fetch_one(executor)
        .await?;

        Ok(id)
    }

    // O protocolo deriva do id, então só existe depois do INSERT; roda na
    // mesma transação da criação.
    pub async fn set_protocolo<'e, E>(
        &self,
        executor: E,
        id: i32,
        protocolo: &str,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE entregas SET protocolo = $2 WHERE id = $1")
            .bind(id)
            .bind(protocolo)
            .execute(executor)
            .await?;
        Ok(())
    }

    // =========================================================================
    //  TRANSIÇÕES DE STATUS
    //  Guard otimista no WHERE: 0 linhas afetadas significa que outra
    //  requisição fechou o pedido primeiro (ou o id não existe).
    // =========================================================================

    // pendente -> em_entrega. Grafia desconhecida conta como pendente, igual
    // à normalização de leitura.
    pub async fn marcar_despachada(&self, id: i32) -> Result<u64, AppError> {
        let resultado = sqlx::query(
            r#"
            UPDATE entregas
            SET status_pedido = 'em_entrega', data_e_hora_envio_pedido = NOW()
            WHERE id = $1 AND LOWER(TRIM(status_pedido)) <> ALL($2)
            "#,
        )
        .bind(id)
        .bind(StatusPedido::aliases_nao_pendentes())
        .execute(&self.pool)
        .await?;
        Ok(resultado.rows_affected())
    }

    // NOW() é estável dentro do comando, então confirmação e finalização
    // recebem o mesmo instante.
    pub async fn marcar_confirmada(&self, id: i32) -> Result<u64, AppError> {
        let resultado = sqlx::query(
            r#"
            UPDATE entregas
            SET status_pedido = 'entregue',
                data_e_hora_confirmacao_pedido = NOW(),
                finalizado_em = NOW()
            WHERE id = $1 AND LOWER(TRIM(status_pedido)) <> ALL($2)
            "#,
        )
        .bind(id)
        .bind(StatusPedido::aliases_terminais())
        .execute(&self.pool)
        .await?;
        Ok(resultado.rows_affected())
    }

    pub async fn marcar_cancelada(&self, id: i32) -> Result<u64, AppError> {
        let resultado = sqlx::query(
            r#"
            UPDATE entregas
            SET status_pedido = 'cancelado',
                data_e_hora_cancelamento_pedido = NOW(),
                finalizado_em = NOW()
            WHERE id = $1 AND LOWER(TRIM(status_pedido)) <> ALL($2)
            "#,
        )
        .bind(id)
        .bind(StatusPedido::aliases_terminais())
        .execute(&self.pool)
        .await?;
        Ok(resultado.rows_affected())
    }

    // Fecha o pedido com os dados comerciais de uma só vez. A troca de
    // entregador só acontece quando o service resolveu um cadastro;
    // observações seguem COALESCE (null mantém o que está gravado, string
    // vazia sobrescreve).
    pub async fn finalizar(&self, id: i32, dados: &FinalizacaoEntrega) -> Result<u64, AppError> {
        let resultado = sqlx::query(
            r#"
            UPDATE entregas
            SET status_pedido = 'entregue',
                forma_pagamento = $2,
                valor_itens = $3,
                valor_frete = $4,
                valor_total = $5,
                entregador_id = CASE WHEN $6 THEN $7 ELSE entregador_id END,
                entregador = CASE WHEN $6 THEN $8 ELSE entregador END,
                telefone_entregador = CASE WHEN $6 THEN $9 ELSE telefone_entregador END,
                observacoes = COALESCE($10, observacoes),
                data_e_hora_confirmacao_pedido = NOW(),
                finalizado_em = NOW()
            WHERE id = $1 AND LOWER(TRIM(status_pedido)) <> ALL($11)
            "#,
        )
        .bind(id)
        .bind(&dados.forma_pagamento)
        .bind(dados.valor_itens)
        .bind(dados.valor_frete)
        .bind(dados.valor_total)
        .bind(dados.trocar_entregador)
        .bind(dados.entregador_id)
        .bind(&dados.entregador_nome)
        .bind(&dados.entregador_telefone)
        .bind(&dados.observacoes)
        .bind(StatusPedido::aliases_terminais())
        .execute(&self.pool)
        .await?;
        Ok(resultado.rows_affected())
    }

    // =========================================================================
    //  EXCLUSÃO (override administrativo, fora do ciclo de vida normal)
    // =========================================================================

    pub async fn delete(&self, id: i32) -> Result<u64, AppError> {
        let resultado = sqlx::query("DELETE FROM entregas WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(resultado.rows_affected())
    }
}

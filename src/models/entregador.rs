// src/models/entregador.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

// Entregador cadastrado. Entregas antigas podem não referenciar ninguém
// daqui e carregar só o par texto legado.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Entregador {
    pub id: i32,
    pub nome: String,
    pub unidade: Option<String>,
    pub telefone: Option<String>,
    pub valor_frete: Option<Decimal>,
    pub observacoes: Option<String>,
    pub ativo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

// Payload de criação e de atualização (a atualização substitui o cadastro).
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct EntregadorPayload {
    #[validate(
        required(message = "O nome do entregador é obrigatório."),
        length(min = 1, message = "O nome do entregador é obrigatório.")
    )]
    pub nome: Option<String>,
    pub unidade: Option<String>,
    pub telefone: Option<String>,
    pub valor_frete: Option<Decimal>,
    pub observacoes: Option<String>,
    pub ativo: Option<bool>,
}

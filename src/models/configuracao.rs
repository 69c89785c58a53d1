// src/models/configuracao.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

// Par chave/valor editável em tempo de execução (URLs de webhook etc).
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Configuracao {
    pub id: i32,
    pub key: String,
    pub value: String,
}

// Upsert: chave existente tem o valor substituído.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DefinirConfiguracaoPayload {
    #[validate(length(min = 1, message = "A chave é obrigatória."))]
    pub key: String,
    pub value: Option<String>,
}

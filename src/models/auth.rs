// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Usuario {
    pub id: i32,
    pub email: String,
    pub nome: Option<String>,
    pub role: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub password_hash: Option<String>,

    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 1, message = "A senha é obrigatória."))]
    pub password: String,
}

// Resposta do login
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResposta {
    pub ok: bool,
    pub role: String,
}

// Conteúdo do cookie de sessão e identidade carregada pelo guard.
// O guard recarrega role e situação da conta a cada requisição.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessaoUsuario {
    pub email: String,
    #[serde(default)]
    pub role: String,
}

// Payload de criação de usuário (somente admin)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CriarUsuarioPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    pub nome: Option<String>,
    pub role: Option<String>,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
    pub is_active: Option<bool>,
}

// Atualização parcial: campo ausente mantém o valor atual
#[derive(Debug, Deserialize, ToSchema)]
pub struct AtualizarUsuarioPayload {
    pub nome: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DefinirSenhaPayload {
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

// Papéis aceitos no cadastro de usuários
pub const ROLES_VALIDOS: [&str; 2] = ["admin", "user"];

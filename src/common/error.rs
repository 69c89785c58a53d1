use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// `error` carrega o código estável da resposta (validation_error,
// not_found, conflict...) e `details` a mensagem legível em pt-BR.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Campo obrigatório: {0}")]
    CampoObrigatorio(&'static str),

    #[error("ID inválido")]
    IdInvalido,

    #[error("Papel inválido")]
    RoleInvalida,

    #[error("{0} não encontrado(a)")]
    NaoEncontrado(&'static str),

    #[error("Nada de {0} para exportar")]
    ExportacaoVazia(&'static str),

    #[error("Credenciais inválidas")]
    CredenciaisInvalidas,

    #[error("Não autorizado")]
    NaoAutorizado,

    #[error("Conta bloqueada")]
    Bloqueado,

    #[error("Acesso negado")]
    Proibido,

    #[error("Conflito: {0}")]
    Conflito(&'static str),

    #[error("Falha ao notificar webhook: {0}")]
    FalhaNotificacao(String),

    // Variante para erros de banco de dados (exemplo com sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    Interno(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, codigo, details) = match self {
            // Retornar todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "validation_error",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::CampoObrigatorio(campo) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                Some(format!("Campo '{campo}' é obrigatório.")),
            ),
            AppError::IdInvalido => (
                StatusCode::BAD_REQUEST,
                "invalid_id",
                Some("ID inválido.".to_string()),
            ),
            AppError::RoleInvalida => (
                StatusCode::BAD_REQUEST,
                "invalid_role",
                Some("Papel de usuário inválido.".to_string()),
            ),
            AppError::NaoEncontrado(recurso) => (
                StatusCode::NOT_FOUND,
                "not_found",
                Some(format!("{recurso} não encontrado(a).")),
            ),
            AppError::ExportacaoVazia(recurso) => (
                StatusCode::NOT_FOUND,
                "not_found",
                Some(format!("Nenhum registro de {recurso} para exportar.")),
            ),
            AppError::CredenciaisInvalidas => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                Some("E-mail ou senha inválidos.".to_string()),
            ),
            AppError::NaoAutorizado => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            // Conta desativada: diferente de "forbidden" para o front
            // conseguir explicar o bloqueio.
            AppError::Bloqueado => (StatusCode::FORBIDDEN, "blocked", None),
            AppError::Proibido => (StatusCode::FORBIDDEN, "forbidden", None),
            AppError::Conflito(detalhe) => {
                (StatusCode::CONFLICT, "conflict", Some(detalhe.to_string()))
            }
            AppError::FalhaNotificacao(motivo) => {
                tracing::warn!("Webhook de notificação falhou: {}", motivo);
                (StatusCode::BAD_GATEWAY, "notification_error", Some(motivo))
            }

            // Todos os outros erros (DatabaseError, Interno, Bcrypt) viram 500.
            // O `tracing` loga a mensagem detalhada; o chamador recebe só o genérico.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    Some("Ocorreu um erro inesperado.".to_string()),
                )
            }
        };

        let body = match details {
            Some(d) => Json(json!({ "error": codigo, "details": d })),
            None => Json(json!({ "error": codigo })),
        };
        (status, body).into_response()
    }
}

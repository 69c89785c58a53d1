use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::configuracao::{Configuracao, DefinirConfiguracaoPayload},
};

#[utoipa::path(
    get,
    path = "/api/configuracoes",
    tag = "Configuracoes",
    responses((status = 200, description = "Todos os pares chave/valor", body = [Configuracao])),
    security(("cookie_sessao" = []))
)]
pub async fn listar(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Configuracao>>, AppError> {
    Ok(Json(app_state.configuracao_repo.list_all().await?))
}

// Upsert: grava a chave se for nova, sobrescreve o valor se já existir
#[utoipa::path(
    post,
    path = "/api/configuracoes",
    tag = "Configuracoes",
    request_body = DefinirConfiguracaoPayload,
    responses((status = 200, description = "Configuração gravada", body = Configuracao)),
    security(("cookie_sessao" = []))
)]
pub async fn definir(
    State(app_state): State<AppState>,
    Json(payload): Json<DefinirConfiguracaoPayload>,
) -> Result<Json<Configuracao>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let valor = payload.value.unwrap_or_default();
    let configuracao = app_state.configuracao_repo.set(&payload.key, &valor).await?;

    Ok(Json(configuracao))
}

#[utoipa::path(
    delete,
    path = "/api/configuracoes/{key}",
    tag = "Configuracoes",
    params(("key" = String, Path, description = "Chave da configuração")),
    responses(
        (status = 204, description = "Configuração removida"),
        (status = 404, description = "Chave não encontrada")
    ),
    security(("cookie_sessao" = []))
)]
pub async fn excluir(
    State(app_state): State<AppState>,
    Path(key): Path<String>,
) -> Result<StatusCode, AppError> {
    let afetadas = app_state.configuracao_repo.delete(&key).await?;
    if afetadas == 0 {
        return Err(AppError::NaoEncontrado("Configuração"));
    }

    Ok(StatusCode::NO_CONTENT)
}

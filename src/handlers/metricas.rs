use axum::{extract::State, Json};

use crate::{common::error::AppError, config::AppState, models::metricas::Metricas};

#[utoipa::path(
    get,
    path = "/api/metricas",
    tag = "Metricas",
    responses((status = 200, description = "Totais por situação e volume por bairro", body = Metricas)),
    security(("cookie_sessao" = []))
)]
pub async fn resumo(State(app_state): State<AppState>) -> Result<Json<Metricas>, AppError> {
    Ok(Json(app_state.metricas_repo.resumo().await?))
}

use axum::{extract::State, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    models::cliente::{consolidar_clientes, ClienteConsolidado},
};

// A carteira de clientes não tem tabela própria: é recalculada a cada
// leitura a partir do histórico de entregas.
#[utoipa::path(
    get,
    path = "/api/clientes",
    tag = "Clientes",
    responses((status = 200, description = "Clientes consolidados a partir das entregas", body = [ClienteConsolidado])),
    security(("cookie_sessao" = []))
)]
pub async fn listar(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<ClienteConsolidado>>, AppError> {
    let origens = app_state.cliente_repo.list_origens().await?;
    Ok(Json(consolidar_clientes(&origens)))
}

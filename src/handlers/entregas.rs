use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    common::{
        csv::{nome_arquivo_exportacao, resposta_download},
        error::AppError,
    },
    config::AppState,
    models::{
        entrega::{
            CriarEntregaPayload, EntregaView, FinalizarEntregaPayload, ListaEntregas,
            PaginacaoParams,
        },
        produto::{SugestaoParams, SugestaoValor},
    },
};

#[utoipa::path(
    get,
    path = "/api/entregas",
    tag = "Entregas",
    params(PaginacaoParams),
    responses((status = 200, description = "Página de entregas, da mais recente para a mais antiga", body = ListaEntregas)),
    security(("cookie_sessao" = []))
)]
pub async fn listar(
    State(app_state): State<AppState>,
    Query(params): Query<PaginacaoParams>,
) -> Result<Json<ListaEntregas>, AppError> {
    Ok(Json(app_state.entrega_service.listar(&params).await?))
}

#[utoipa::path(
    post,
    path = "/api/entregas",
    tag = "Entregas",
    request_body = CriarEntregaPayload,
    responses(
        (status = 201, description = "Entrega registrada com protocolo gerado", body = EntregaView),
        (status = 404, description = "Entregador indicado não existe")
    ),
    security(("cookie_sessao" = []))
)]
pub async fn criar(
    State(app_state): State<AppState>,
    Json(payload): Json<CriarEntregaPayload>,
) -> Result<impl IntoResponse, AppError> {
    let entrega = app_state.entrega_service.criar(&payload).await?;
    Ok((StatusCode::CREATED, Json(entrega)))
}

#[utoipa::path(
    get,
    path = "/api/entregas/{id}",
    tag = "Entregas",
    params(("id" = i32, Path, description = "ID da entrega")),
    responses(
        (status = 200, description = "Visão consolidada da entrega", body = EntregaView),
        (status = 404, description = "Entrega não encontrada")
    ),
    security(("cookie_sessao" = []))
)]
pub async fn buscar(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<EntregaView>, AppError> {
    Ok(Json(app_state.entrega_service.buscar(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/entregas/{id}/despachar",
    tag = "Entregas",
    params(("id" = i32, Path, description = "ID da entrega")),
    responses(
        (status = 200, description = "Entrega despachada para a rua", body = EntregaView),
        (status = 409, description = "Entrega já saiu do estado pendente")
    ),
    security(("cookie_sessao" = []))
)]
pub async fn despachar(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<EntregaView>, AppError> {
    Ok(Json(app_state.entrega_service.despachar(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/entregas/{id}/confirmar",
    tag = "Entregas",
    params(("id" = i32, Path, description = "ID da entrega")),
    responses(
        (status = 200, description = "Entrega confirmada como entregue", body = EntregaView),
        (status = 409, description = "Entrega já estava em estado terminal"),
        (status = 502, description = "Webhook de confirmação indisponível")
    ),
    security(("cookie_sessao" = []))
)]
pub async fn confirmar(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<EntregaView>, AppError> {
    Ok(Json(app_state.entrega_service.confirmar(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/entregas/{id}/cancelar",
    tag = "Entregas",
    params(("id" = i32, Path, description = "ID da entrega")),
    responses(
        (status = 200, description = "Entrega cancelada", body = EntregaView),
        (status = 409, description = "Entrega já estava em estado terminal"),
        (status = 502, description = "Webhook de cancelamento indisponível")
    ),
    security(("cookie_sessao" = []))
)]
pub async fn cancelar(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<EntregaView>, AppError> {
    Ok(Json(app_state.entrega_service.cancelar(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/entregas/{id}/finalizar",
    tag = "Entregas",
    params(("id" = i32, Path, description = "ID da entrega")),
    request_body = FinalizarEntregaPayload,
    responses(
        (status = 200, description = "Entrega finalizada com os valores de cobrança", body = EntregaView),
        (status = 409, description = "Entrega já estava em estado terminal")
    ),
    security(("cookie_sessao" = []))
)]
pub async fn finalizar(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<FinalizarEntregaPayload>,
) -> Result<Json<EntregaView>, AppError> {
    Ok(Json(app_state.entrega_service.finalizar(id, &payload).await?))
}

#[utoipa::path(
    get,
    path = "/api/entregas/{id}/sugerir-valor",
    tag = "Entregas",
    params(
        ("id" = i32, Path, description = "ID da entrega"),
        SugestaoParams
    ),
    responses(
        (status = 200, description = "Produto casado com a mercadoria e valor sugerido", body = SugestaoValor),
        (status = 404, description = "Nenhum produto do catálogo casa com a mercadoria")
    ),
    security(("cookie_sessao" = []))
)]
pub async fn sugerir_valor(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    Query(params): Query<SugestaoParams>,
) -> Result<Json<SugestaoValor>, AppError> {
    Ok(Json(app_state.entrega_service.sugerir_valor(id, &params).await?))
}

#[utoipa::path(
    get,
    path = "/api/entregas/csv",
    tag = "Entregas",
    responses(
        (status = 200, description = "Arquivo CSV com todas as entregas", body = String, content_type = "text/csv"),
        (status = 404, description = "Nenhuma entrega para exportar")
    ),
    security(("cookie_sessao" = []))
)]
pub async fn exportar_csv(State(app_state): State<AppState>) -> Result<Response, AppError> {
    let corpo = app_state.entrega_service.exportar_csv().await?;
    Ok(resposta_download(&nome_arquivo_exportacao("entregas"), corpo))
}

#[utoipa::path(
    delete,
    path = "/api/entregas/{id}",
    tag = "Entregas",
    params(("id" = i32, Path, description = "ID da entrega")),
    responses(
        (status = 204, description = "Entrega excluída"),
        (status = 404, description = "Entrega não encontrada")
    ),
    security(("cookie_sessao" = []))
)]
pub async fn excluir(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    app_state.entrega_service.excluir(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use validator::Validate;

use crate::{
    common::{
        csv::{gerar_csv, nome_arquivo_exportacao, resposta_download, CelulaCsv},
        error::AppError,
        formato::formatar_data,
    },
    config::AppState,
    models::entregador::{Entregador, EntregadorPayload},
};

#[utoipa::path(
    get,
    path = "/api/entregadores",
    tag = "Entregadores",
    responses((status = 200, description = "Cadastro de entregadores em ordem alfabética", body = [Entregador])),
    security(("cookie_sessao" = []))
)]
pub async fn listar(State(app_state): State<AppState>) -> Result<Json<Vec<Entregador>>, AppError> {
    Ok(Json(app_state.entregador_repo.list_all().await?))
}

#[utoipa::path(
    post,
    path = "/api/entregadores",
    tag = "Entregadores",
    request_body = EntregadorPayload,
    responses((status = 201, description = "Entregador cadastrado", body = Entregador)),
    security(("cookie_sessao" = []))
)]
pub async fn criar(
    State(app_state): State<AppState>,
    Json(payload): Json<EntregadorPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let entregador = app_state.entregador_repo.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(entregador)))
}

#[utoipa::path(
    put,
    path = "/api/entregadores/{id}",
    tag = "Entregadores",
    params(("id" = i32, Path, description = "ID do entregador")),
    request_body = EntregadorPayload,
    responses(
        (status = 200, description = "Cadastro substituído", body = Entregador),
        (status = 404, description = "Entregador não encontrado")
    ),
    security(("cookie_sessao" = []))
)]
pub async fn atualizar(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<EntregadorPayload>,
) -> Result<Json<Entregador>, AppError> {
    if id <= 0 {
        return Err(AppError::IdInvalido);
    }
    payload.validate().map_err(AppError::ValidationError)?;

    let entregador = app_state
        .entregador_repo
        .update(id, &payload)
        .await?
        .ok_or(AppError::NaoEncontrado("Entregador"))?;

    Ok(Json(entregador))
}

#[utoipa::path(
    delete,
    path = "/api/entregadores/{id}",
    tag = "Entregadores",
    params(("id" = i32, Path, description = "ID do entregador")),
    responses(
        (status = 204, description = "Entregador excluído"),
        (status = 404, description = "Entregador não encontrado")
    ),
    security(("cookie_sessao" = []))
)]
pub async fn excluir(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    if id <= 0 {
        return Err(AppError::IdInvalido);
    }

    let afetadas = app_state.entregador_repo.delete(id).await?;
    if afetadas == 0 {
        return Err(AppError::NaoEncontrado("Entregador"));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/entregadores/csv",
    tag = "Entregadores",
    responses(
        (status = 200, description = "Arquivo CSV com o cadastro de entregadores", body = String, content_type = "text/csv"),
        (status = 404, description = "Nenhum entregador para exportar")
    ),
    security(("cookie_sessao" = []))
)]
pub async fn exportar_csv(State(app_state): State<AppState>) -> Result<Response, AppError> {
    let entregadores = app_state.entregador_repo.list_all().await?;
    if entregadores.is_empty() {
        return Err(AppError::ExportacaoVazia("entregador"));
    }

    let corpo = csv_entregadores(&entregadores);
    Ok(resposta_download(
        &nome_arquivo_exportacao("entregadores"),
        corpo,
    ))
}

fn csv_entregadores(entregadores: &[Entregador]) -> String {
    let cabecalhos = [
        "ID",
        "Nome",
        "Unidade",
        "Telefone",
        "Valor Frete",
        "Ativo",
        "Observacoes",
        "Criado Em",
        "Atualizado Em",
    ];

    let linhas: Vec<Vec<CelulaCsv>> = entregadores
        .iter()
        .map(|e| {
            vec![
                CelulaCsv::numero(e.id),
                CelulaCsv::texto(e.nome.clone()),
                CelulaCsv::texto(e.unidade.clone().unwrap_or_default()),
                CelulaCsv::texto(e.telefone.clone().unwrap_or_default()),
                CelulaCsv::texto(
                    e.valor_frete
                        .map(|v| format!("{v:.2}"))
                        .unwrap_or_default(),
                ),
                CelulaCsv::texto(if e.ativo { "Sim" } else { "Nao" }),
                CelulaCsv::texto(e.observacoes.clone().unwrap_or_default()),
                CelulaCsv::texto(formatar_data(Some(&e.created_at))),
                CelulaCsv::texto(
                    e.updated_at
                        .as_ref()
                        .map(|d| formatar_data(Some(d)))
                        .unwrap_or_default(),
                ),
            ]
        })
        .collect();

    gerar_csv(&cabecalhos, &linhas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono::Utc;
    use rust_decimal::Decimal;

    #[test]
    fn csv_formata_frete_ativo_e_datas() {
        let entregadores = vec![Entregador {
            id: 7,
            nome: "Carlos Silva".to_string(),
            unidade: Some("Matriz".to_string()),
            telefone: None,
            valor_frete: Some(Decimal::new(850, 2)),
            observacoes: None,
            ativo: false,
            created_at: Utc.with_ymd_and_hms(2025, 3, 10, 14, 30, 0).unwrap(),
            updated_at: None,
        }];

        let csv = csv_entregadores(&entregadores);
        let mut linhas = csv.lines();

        assert_eq!(
            linhas.next().unwrap(),
            "ID,Nome,Unidade,Telefone,Valor Frete,Ativo,Observacoes,Criado Em,Atualizado Em"
        );
        assert_eq!(
            linhas.next().unwrap(),
            "7,\"Carlos Silva\",\"Matriz\",,\"8.50\",\"Nao\",,\"10/03/2025 14:30\","
        );
    }
}

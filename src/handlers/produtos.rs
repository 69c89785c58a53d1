use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use validator::Validate;

use crate::{
    common::{
        csv::{gerar_csv, nome_arquivo_exportacao, resposta_download, CelulaCsv},
        error::AppError,
    },
    config::AppState,
    models::produto::{Produto, ProdutoPayload},
};

#[utoipa::path(
    get,
    path = "/api/produtos",
    tag = "Produtos",
    responses((status = 200, description = "Catálogo completo em ordem alfabética", body = [Produto])),
    security(("cookie_sessao" = []))
)]
pub async fn listar(State(app_state): State<AppState>) -> Result<Json<Vec<Produto>>, AppError> {
    Ok(Json(app_state.produto_repo.list_all().await?))
}

#[utoipa::path(
    get,
    path = "/api/produtos/unidades",
    tag = "Produtos",
    responses((status = 200, description = "Unidades distintas em uso no catálogo", body = [String])),
    security(("cookie_sessao" = []))
)]
pub async fn unidades(State(app_state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(app_state.produto_repo.unidades().await?))
}

#[utoipa::path(
    post,
    path = "/api/produtos",
    tag = "Produtos",
    request_body = ProdutoPayload,
    responses((status = 201, description = "Produto cadastrado", body = Produto)),
    security(("cookie_sessao" = []))
)]
pub async fn criar(
    State(app_state): State<AppState>,
    Json(payload): Json<ProdutoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let produto = app_state.produto_repo.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(produto)))
}

#[utoipa::path(
    put,
    path = "/api/produtos/{id}",
    tag = "Produtos",
    params(("id" = i32, Path, description = "ID do produto")),
    request_body = ProdutoPayload,
    responses(
        (status = 200, description = "Produto substituído", body = Produto),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("cookie_sessao" = []))
)]
pub async fn atualizar(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<ProdutoPayload>,
) -> Result<Json<Produto>, AppError> {
    if id <= 0 {
        return Err(AppError::IdInvalido);
    }
    payload.validate().map_err(AppError::ValidationError)?;

    let produto = app_state
        .produto_repo
        .update(id, &payload)
        .await?
        .ok_or(AppError::NaoEncontrado("Produto"))?;

    Ok(Json(produto))
}

#[utoipa::path(
    delete,
    path = "/api/produtos/{id}",
    tag = "Produtos",
    params(("id" = i32, Path, description = "ID do produto")),
    responses(
        (status = 204, description = "Produto excluído"),
        (status = 404, description = "Produto não encontrado")
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

    let afetadas = app_state.produto_repo.delete(id).await?;
    if afetadas == 0 {
        return Err(AppError::NaoEncontrado("Produto"));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/produtos/csv",
    tag = "Produtos",
    responses(
        (status = 200, description = "Arquivo CSV com o catálogo de produtos", body = String, content_type = "text/csv"),
        (status = 404, description = "Nenhum produto para exportar")
    ),
    security(("cookie_sessao" = []))
)]
pub async fn exportar_csv(State(app_state): State<AppState>) -> Result<Response, AppError> {
    let produtos = app_state.produto_repo.list_all().await?;
    if produtos.is_empty() {
        return Err(AppError::ExportacaoVazia("produto"));
    }

    let corpo = csv_produtos(&produtos);
    Ok(resposta_download(
        &nome_arquivo_exportacao("produtos"),
        corpo,
    ))
}

fn dinheiro(valor: &Option<Decimal>) -> String {
    valor.map(|v| format!("{v:.2}")).unwrap_or_default()
}

fn csv_produtos(produtos: &[Produto]) -> String {
    let cabecalhos = [
        "ID",
        "Nome",
        "Valor",
        "Valor Pix",
        "Valor Debito",
        "Valor Credito",
        "Valor Entrega",
        "Valor Retirada",
        "Unidade",
        "Ativo",
        "Observacoes",
    ];

    let linhas: Vec<Vec<CelulaCsv>> = produtos
        .iter()
        .map(|p| {
            vec![
                CelulaCsv::numero(p.id),
                CelulaCsv::texto(p.nome.clone()),
                CelulaCsv::texto(format!("{:.2}", p.valor)),
                CelulaCsv::texto(dinheiro(&p.valor_pix)),
                CelulaCsv::texto(dinheiro(&p.valor_debito)),
                CelulaCsv::texto(dinheiro(&p.valor_credito)),
                CelulaCsv::texto(dinheiro(&p.valor_entrega)),
                CelulaCsv::texto(dinheiro(&p.valor_retirada)),
                CelulaCsv::texto(p.unidade.clone()),
                CelulaCsv::texto(if p.ativo { "Sim" } else { "Nao" }),
                CelulaCsv::texto(p.observacoes.clone().unwrap_or_default()),
            ]
        })
        .collect();

    gerar_csv(&cabecalhos, &linhas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn csv_preenche_variacoes_presentes_e_deixa_as_demais_vazias() {
        let produtos = vec![Produto {
            id: 3,
            nome: "Botijão P13".to_string(),
            valor: Decimal::new(12000, 2),
            valor_pix: Some(Decimal::new(11500, 2)),
            valor_debito: None,
            valor_credito: None,
            valor_entrega: None,
            valor_retirada: None,
            unidade: "Matriz".to_string(),
            observacoes: None,
            ativo: true,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            updated_at: None,
        }];

        let csv = csv_produtos(&produtos);
        let mut linhas = csv.lines();

        assert_eq!(
            linhas.next().unwrap(),
            "ID,Nome,Valor,Valor Pix,Valor Debito,Valor Credito,Valor Entrega,Valor Retirada,Unidade,Ativo,Observacoes"
        );
        assert_eq!(
            linhas.next().unwrap(),
            "3,\"Botijão P13\",\"120.00\",\"115.00\",,,,,\"Matriz\",\"Sim\","
        );
    }
}

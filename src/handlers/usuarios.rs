use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::{
        AtualizarUsuarioPayload, CriarUsuarioPayload, DefinirSenhaPayload, Usuario, ROLES_VALIDOS,
    },
};

fn validar_role(role: &str) -> Result<(), AppError> {
    if ROLES_VALIDOS.contains(&role) {
        Ok(())
    } else {
        Err(AppError::RoleInvalida)
    }
}

#[utoipa::path(
    get,
    path = "/api/usuarios",
    tag = "Usuarios",
    responses((status = 200, description = "Usuários do painel, do mais recente para o mais antigo", body = [Usuario])),
    security(("cookie_sessao" = []))
)]
pub async fn listar(State(app_state): State<AppState>) -> Result<Json<Vec<Usuario>>, AppError> {
    Ok(Json(app_state.usuario_repo.list_all().await?))
}

#[utoipa::path(
    post,
    path = "/api/usuarios",
    tag = "Usuarios",
    request_body = CriarUsuarioPayload,
    responses(
        (status = 200, description = "Usuário criado", body = Usuario),
        (status = 409, description = "E-mail já cadastrado")
    ),
    security(("cookie_sessao" = []))
)]
pub async fn criar(
    State(app_state): State<AppState>,
    Json(payload): Json<CriarUsuarioPayload>,
) -> Result<Json<Usuario>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let role = payload.role.as_deref().unwrap_or("user");
    validar_role(role)?;

    let password_hash = app_state.auth_service.hash_senha(&payload.password).await?;
    let usuario = app_state
        .usuario_repo
        .create(
            &payload.email.trim().to_lowercase(),
            payload.nome.as_deref(),
            role,
            payload.is_active.unwrap_or(true),
            &password_hash,
        )
        .await?;

    Ok(Json(usuario))
}

#[utoipa::path(
    put,
    path = "/api/usuarios/{id}",
    tag = "Usuarios",
    params(("id" = i32, Path, description = "ID do usuário")),
    request_body = AtualizarUsuarioPayload,
    responses(
        (status = 200, description = "Usuário atualizado", body = Usuario),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("cookie_sessao" = []))
)]
pub async fn atualizar(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<AtualizarUsuarioPayload>,
) -> Result<Json<Usuario>, AppError> {
    if id <= 0 {
        return Err(AppError::IdInvalido);
    }
    if let Some(role) = payload.role.as_deref() {
        validar_role(role)?;
    }

    let usuario = app_state
        .usuario_repo
        .update_parcial(
            id,
            payload.nome.as_deref(),
            payload.role.as_deref(),
            payload.is_active,
        )
        .await?
        .ok_or(AppError::NaoEncontrado("Usuário"))?;

    Ok(Json(usuario))
}

#[utoipa::path(
    post,
    path = "/api/usuarios/{id}/set-password",
    tag = "Usuarios",
    params(("id" = i32, Path, description = "ID do usuário")),
    request_body = DefinirSenhaPayload,
    responses(
        (status = 200, description = "Senha redefinida"),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("cookie_sessao" = []))
)]
pub async fn definir_senha(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<DefinirSenhaPayload>,
) -> Result<Json<Value>, AppError> {
    if id <= 0 {
        return Err(AppError::IdInvalido);
    }
    payload.validate().map_err(AppError::ValidationError)?;

    let password_hash = app_state.auth_service.hash_senha(&payload.password).await?;
    let afetadas = app_state.usuario_repo.set_password(id, &password_hash).await?;
    if afetadas == 0 {
        return Err(AppError::NaoEncontrado("Usuário"));
    }

    Ok(Json(json!({ "ok": true })))
}

#[utoipa::path(
    delete,
    path = "/api/usuarios/{id}",
    tag = "Usuarios",
    params(("id" = i32, Path, description = "ID do usuário")),
    responses(
        (status = 204, description = "Usuário excluído"),
        (status = 404, description = "Usuário não encontrado")
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

    let afetadas = app_state.usuario_repo.delete(id).await?;
    if afetadas == 0 {
        return Err(AppError::NaoEncontrado("Usuário"));
    }

    Ok(StatusCode::NO_CONTENT)
}

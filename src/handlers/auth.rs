use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde_json::{json, Value};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::{codificar_sessao, UsuarioAutenticado, COOKIE_SESSAO},
    models::auth::{LoginPayload, LoginResposta, SessaoUsuario},
};

// Handler de login: valida as credenciais e grava o cookie de sessão
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Sessão iniciada com sucesso", body = LoginResposta),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginPayload>,
) -> Result<(CookieJar, Json<LoginResposta>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let usuario = app_state
        .auth_service
        .login(payload.email.trim(), &payload.password)
        .await?;

    let mut cookie = Cookie::new(COOKIE_SESSAO, codificar_sessao(&usuario.email));
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_secure(app_state.config.producao);

    Ok((
        jar.add(cookie),
        Json(LoginResposta {
            ok: true,
            role: usuario.role,
        }),
    ))
}

// Handler de logout: apenas descarta o cookie, não há estado no servidor
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    responses((status = 200, description = "Sessão encerrada"))
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<Value>) {
    let mut cookie = Cookie::from(COOKIE_SESSAO);
    cookie.set_path("/");

    (jar.remove(cookie), Json(json!({ "ok": true })))
}

// Handler da rota protegida /me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses((status = 200, description = "Identidade da sessão corrente", body = SessaoUsuario)),
    security(("cookie_sessao" = []))
)]
pub async fn me(usuario: UsuarioAutenticado) -> Json<SessaoUsuario> {
    Json(SessaoUsuario {
        email: usuario.email,
        role: usuario.role,
    })
}

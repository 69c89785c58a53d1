// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::{common::error::AppError, config::AppState, models::auth::SessaoUsuario};

pub const COOKIE_SESSAO: &str = "tg.session";

// Usuário autenticado da requisição corrente, com o papel relido do banco.
#[derive(Debug, Clone)]
pub struct UsuarioAutenticado {
    pub email: String,
    pub role: String,
}

impl UsuarioAutenticado {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

// Monta o valor do cookie de sessão: base64 de um JSON com o e-mail.
pub fn codificar_sessao(email: &str) -> String {
    let corpo = serde_json::json!({ "email": email }).to_string();
    BASE64.encode(corpo)
}

fn decodificar_sessao(valor: &str) -> Option<SessaoUsuario> {
    let bytes = BASE64.decode(valor).ok()?;
    serde_json::from_slice(&bytes).ok()
}

// O middleware em si: valida o cookie e recarrega papel e situação da
// conta a cada requisição, para sessão antiga não segurar usuário
// desativado nem papel rebaixado.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let cookie = jar.get(COOKIE_SESSAO).ok_or(AppError::NaoAutorizado)?;
    let sessao = decodificar_sessao(cookie.value()).ok_or(AppError::NaoAutorizado)?;
    if sessao.email.is_empty() {
        return Err(AppError::NaoAutorizado);
    }

    let usuario = app_state.usuario_repo.find_by_email(&sessao.email).await?;
    match usuario {
        Some(u) if u.is_active => {
            request.extensions_mut().insert(UsuarioAutenticado {
                email: u.email,
                role: u.role,
            });
            Ok(next.run(request).await)
        }
        // Conta removida ou desativada depois do login
        _ => Err(AppError::Bloqueado),
    }
}

// Guarda das rotas administrativas; roda depois do auth_guard.
pub async fn admin_guard(request: Request, next: Next) -> Result<Response, AppError> {
    let usuario = request
        .extensions()
        .get::<UsuarioAutenticado>()
        .ok_or(AppError::NaoAutorizado)?;
    if !usuario.is_admin() {
        return Err(AppError::Proibido);
    }
    Ok(next.run(request).await)
}

// Extrator para obter o usuário autenticado diretamente nos handlers
impl<S> FromRequestParts<S> for UsuarioAutenticado
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<UsuarioAutenticado>()
            .cloned()
            .ok_or(AppError::NaoAutorizado)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sessao_codificada_volta_igual() {
        let valor = codificar_sessao("maria@topgas.local");
        let sessao = decodificar_sessao(&valor).unwrap();
        assert_eq!(sessao.email, "maria@topgas.local");
    }

    #[test]
    fn cookie_adulterado_nao_decodifica() {
        assert!(decodificar_sessao("~~~nao-e-base64~~~").is_none());
        // base64 válido, mas o conteúdo não é o JSON esperado
        let lixo = BASE64.encode("so texto");
        assert!(decodificar_sessao(&lixo).is_none());
    }

    #[test]
    fn admin_so_pelo_papel_exato() {
        let admin = UsuarioAutenticado {
            email: "a@a".into(),
            role: "admin".into(),
        };
        let comum = UsuarioAutenticado {
            email: "b@b".into(),
            role: "user".into(),
        };
        assert!(admin.is_admin());
        assert!(!comum.is_admin());
    }
}

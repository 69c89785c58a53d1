// src/docs.rs

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::middleware::auth::COOKIE_SESSAO;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::me,

        // --- Entregas ---
        handlers::entregas::listar,
        handlers::entregas::criar,
        handlers::entregas::buscar,
        handlers::entregas::despachar,
        handlers::entregas::confirmar,
        handlers::entregas::cancelar,
        handlers::entregas::finalizar,
        handlers::entregas::sugerir_valor,
        handlers::entregas::exportar_csv,
        handlers::entregas::excluir,

        // --- Entregadores ---
        handlers::entregadores::listar,
        handlers::entregadores::criar,
        handlers::entregadores::atualizar,
        handlers::entregadores::excluir,
        handlers::entregadores::exportar_csv,

        // --- Produtos ---
        handlers::produtos::listar,
        handlers::produtos::unidades,
        handlers::produtos::criar,
        handlers::produtos::atualizar,
        handlers::produtos::excluir,
        handlers::produtos::exportar_csv,

        // --- Clientes ---
        handlers::clientes::listar,

        // --- Usuarios ---
        handlers::usuarios::listar,
        handlers::usuarios::criar,
        handlers::usuarios::atualizar,
        handlers::usuarios::definir_senha,
        handlers::usuarios::excluir,

        // --- Configuracoes ---
        handlers::configuracoes::listar,
        handlers::configuracoes::definir,
        handlers::configuracoes::excluir,

        // --- Metricas ---
        handlers::metricas::resumo,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Usuario,
            models::auth::LoginPayload,
            models::auth::LoginResposta,
            models::auth::SessaoUsuario,
            models::auth::CriarUsuarioPayload,
            models::auth::AtualizarUsuarioPayload,
            models::auth::DefinirSenhaPayload,

            // --- Entregas ---
            models::entrega::StatusPedido,
            models::entrega::FormaPagamento,
            models::entrega::EntregaView,
            models::entrega::CriarEntregaPayload,
            models::entrega::FinalizarEntregaPayload,
            models::entrega::ListaEntregas,

            // --- Entregadores ---
            models::entregador::Entregador,
            models::entregador::EntregadorPayload,

            // --- Produtos ---
            models::produto::Produto,
            models::produto::ProdutoPayload,
            models::produto::SugestaoValor,

            // --- Clientes ---
            models::cliente::ClienteConsolidado,

            // --- Configuracoes ---
            models::configuracao::Configuracao,
            models::configuracao::DefinirConfiguracaoPayload,

            // --- Metricas ---
            models::metricas::Metricas,
            models::metricas::RegiaoContagem,
        )
    ),
    tags(
        (name = "Auth", description = "Login, logout e sessão"),
        (name = "Entregas", description = "Ciclo de vida das entregas"),
        (name = "Entregadores", description = "Cadastro de entregadores"),
        (name = "Produtos", description = "Catálogo de produtos"),
        (name = "Clientes", description = "Carteira de clientes consolidada"),
        (name = "Usuarios", description = "Usuários do painel (somente admin)"),
        (name = "Configuracoes", description = "Pares chave/valor do sistema (somente admin)"),
        (name = "Metricas", description = "Indicadores operacionais")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "cookie_sessao",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(COOKIE_SESSAO))),
        );
    }
}

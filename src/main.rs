//src/main.rs

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;
use crate::middleware::auth::{admin_guard, auth_guard};

#[tokio::main]
async fn main() {
    // Inicializa o logger antes de qualquer outra coisa
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Garante que o painel nunca sobe sem ao menos um admin
    app_state
        .auth_service
        .garantir_admin(
            &app_state.config.admin_email,
            &app_state.config.admin_password,
        )
        .await
        .expect("Falha ao garantir o usuário admin inicial.");

    // Rotas públicas de sessão
    let auth_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout));

    // Rotas do dia a dia: qualquer usuário ativo
    let operacao_routes = Router::new()
        .route("/auth/me", get(handlers::auth::me))
        .route("/metricas", get(handlers::metricas::resumo))
        .route(
            "/entregas",
            get(handlers::entregas::listar).post(handlers::entregas::criar),
        )
        .route("/entregas/{id}", get(handlers::entregas::buscar))
        .route("/entregas/{id}/despachar", post(handlers::entregas::despachar))
        .route("/entregas/{id}/confirmar", post(handlers::entregas::confirmar))
        .route("/entregas/{id}/cancelar", post(handlers::entregas::cancelar))
        .route("/entregas/{id}/finalizar", post(handlers::entregas::finalizar))
        .route(
            "/entregas/{id}/sugerir-valor",
            get(handlers::entregas::sugerir_valor),
        )
        .route("/clientes", get(handlers::clientes::listar))
        .route("/entregadores", get(handlers::entregadores::listar))
        .route("/produtos", get(handlers::produtos::listar))
        .route("/produtos/unidades", get(handlers::produtos::unidades))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Rotas administrativas. A ordem das camadas importa: a última adicionada
    // roda primeiro, então auth_guard popula a sessão antes do admin_guard.
    let admin_routes = Router::new()
        .route("/entregas/csv", get(handlers::entregas::exportar_csv))
        .route("/entregas/{id}", delete(handlers::entregas::excluir))
        .route("/entregadores", post(handlers::entregadores::criar))
        .route(
            "/entregadores/{id}",
            put(handlers::entregadores::atualizar).delete(handlers::entregadores::excluir),
        )
        .route("/entregadores/csv", get(handlers::entregadores::exportar_csv))
        .route("/produtos", post(handlers::produtos::criar))
        .route(
            "/produtos/{id}",
            put(handlers::produtos::atualizar).delete(handlers::produtos::excluir),
        )
        .route("/produtos/csv", get(handlers::produtos::exportar_csv))
        .route(
            "/usuarios",
            get(handlers::usuarios::listar).post(handlers::usuarios::criar),
        )
        .route(
            "/usuarios/{id}",
            put(handlers::usuarios::atualizar).delete(handlers::usuarios::excluir),
        )
        .route(
            "/usuarios/{id}/set-password",
            post(handlers::usuarios::definir_senha),
        )
        .route(
            "/configuracoes",
            get(handlers::configuracoes::listar).post(handlers::configuracoes::definir),
        )
        .route("/configuracoes/{key}", delete(handlers::configuracoes::excluir))
        .layer(axum_middleware::from_fn(admin_guard))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // O painel roda em outra origem e manda o cookie de sessão, então o CORS
    // precisa de credenciais. Sem origem configurada, espelha a da requisição.
    let origem_cors = match app_state.config.cors_origin.as_deref() {
        Some(origem) => AllowOrigin::exact(
            origem
                .parse::<HeaderValue>()
                .expect("CORS_ORIGIN inválida"),
        ),
        None => AllowOrigin::mirror_request(),
    };
    let cors = CorsLayer::new()
        .allow_origin(origem_cors)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api", operacao_routes)
        .nest("/api", admin_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state.clone());

    // Inicia o servidor
    let addr = format!("0.0.0.0:{}", app_state.config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}

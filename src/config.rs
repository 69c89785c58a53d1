// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{
        ClienteRepository, ConfiguracaoRepository, EntregaRepository, EntregadorRepository,
        MetricasRepository, ProdutoRepository, UsuarioRepository,
    },
    services::{
        auth::AuthService, entrega_service::EntregaService, notificacao::NotificadorWebhook,
    },
};

// Configuração lida do ambiente na subida; nada disso muda em runtime
// (o que muda em runtime mora na tabela `configuracoes`).
#[derive(Clone)]
pub struct AppConfig {
    pub port: u16,
    pub cors_origin: Option<String>,
    pub producao: bool,
    pub webhooks_ativos: bool,
    pub webhook_timeout: Duration,
    pub admin_email: String,
    pub admin_password: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        let cors_origin = env::var("CORS_ORIGIN").ok().filter(|o| !o.is_empty());
        let producao = env::var("APP_ENV").map(|v| v == "production").unwrap_or(false);
        let webhooks_ativos = env::var("WEBHOOKS_ATIVOS")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);
        let webhook_timeout = env::var("WEBHOOK_TIMEOUT_SEGUNDOS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(5));
        let admin_email =
            env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@topgas.local".to_string());
        let admin_password = env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());

        Self {
            port,
            cors_origin,
            producao,
            webhooks_ativos,
            webhook_timeout,
            admin_email,
            admin_password,
        }
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: AppConfig,
    pub auth_service: AuthService,
    pub entrega_service: EntregaService,
    pub entregador_repo: EntregadorRepository,
    pub produto_repo: ProdutoRepository,
    pub cliente_repo: ClienteRepository,
    pub usuario_repo: UsuarioRepository,
    pub configuracao_repo: ConfiguracaoRepository,
    pub metricas_repo: MetricasRepository,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = AppConfig::from_env();
        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let entrega_repo = EntregaRepository::new(db_pool.clone());
        let entregador_repo = EntregadorRepository::new(db_pool.clone());
        let produto_repo = ProdutoRepository::new(db_pool.clone());
        let cliente_repo = ClienteRepository::new(db_pool.clone());
        let usuario_repo = UsuarioRepository::new(db_pool.clone());
        let configuracao_repo = ConfiguracaoRepository::new(db_pool.clone());
        let metricas_repo = MetricasRepository::new(db_pool.clone());

        let notificador = NotificadorWebhook::new(config.webhook_timeout, config.webhooks_ativos)?;
        let auth_service = AuthService::new(usuario_repo.clone());
        let entrega_service = EntregaService::new(
            db_pool.clone(),
            entrega_repo,
            entregador_repo.clone(),
            produto_repo.clone(),
            configuracao_repo.clone(),
            notificador,
        );

        Ok(Self {
            db_pool,
            config,
            auth_service,
            entrega_service,
            entregador_repo,
            produto_repo,
            cliente_repo,
            usuario_repo,
            configuracao_repo,
            metricas_repo,
        })
    }
}

// src/services/notificacao.rs

use std::time::Duration;

use serde::Serialize;

use crate::{common::error::AppError, models::entrega::StatusPedido};

#[derive(Debug, Serialize)]
struct NotificacaoPayload<'a> {
    delivery_id: i32,
    status: &'a str,
}

// Cliente do webhook de confirmação/cancelamento. A notificação acontece
// ANTES do UPDATE no banco: se o destino recusar, a transição não persiste
// e o chamador recebe notification_error para tentar de novo.
#[derive(Clone)]
pub struct NotificadorWebhook {
    client: reqwest::Client,
    ativo: bool,
}

impl NotificadorWebhook {
    pub fn new(timeout: Duration, ativo: bool) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Falha ao construir cliente HTTP: {}", e))?;
        Ok(Self { client, ativo })
    }

    // Uma única tentativa, sem retry; quem quiser repetir refaz a operação.
    pub async fn notificar(
        &self,
        url: &str,
        entrega_id: i32,
        status: StatusPedido,
    ) -> Result<(), AppError> {
        if !self.ativo {
            tracing::debug!(
                "Webhooks desativados; pulando notificação da entrega {}",
                entrega_id
            );
            return Ok(());
        }

        let payload = NotificacaoPayload {
            delivery_id: entrega_id,
            status: status.as_str(),
        };

        let resposta = self
            .client
            .post(url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::FalhaNotificacao(format!("falha de transporte: {e}")))?;

        if !resposta.status().is_success() {
            return Err(AppError::FalhaNotificacao(format!(
                "webhook respondeu {}",
                resposta.status()
            )));
        }

        tracing::info!("📣 Webhook notificado: entrega {} -> {}", entrega_id, status);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::post, Json, Router};
    use std::sync::{Arc, Mutex};

    async fn servidor_local(rota: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endereco = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, rota).await.unwrap();
        });
        format!("http://{endereco}")
    }

    #[tokio::test]
    async fn envia_payload_com_id_e_status() {
        let recebido: Arc<Mutex<Option<serde_json::Value>>> = Arc::new(Mutex::new(None));
        let rota = Router::new().route(
            "/hook",
            post({
                let recebido = recebido.clone();
                move |Json(corpo): Json<serde_json::Value>| async move {
                    *recebido.lock().unwrap() = Some(corpo);
                    "ok"
                }
            }),
        );
        let base = servidor_local(rota).await;

        let notificador = NotificadorWebhook::new(Duration::from_secs(2), true).unwrap();
        notificador
            .notificar(&format!("{base}/hook"), 42, StatusPedido::Entregue)
            .await
            .unwrap();

        let corpo = recebido.lock().unwrap().take().unwrap();
        assert_eq!(corpo["delivery_id"], 42);
        assert_eq!(corpo["status"], "entregue");
    }

    #[tokio::test]
    async fn resposta_nao_2xx_vira_notification_error() {
        let rota = Router::new().route(
            "/hook",
            post(|| async { (axum::http::StatusCode::INTERNAL_SERVER_ERROR, "quebrou") }),
        );
        let base = servidor_local(rota).await;

        let notificador = NotificadorWebhook::new(Duration::from_secs(2), true).unwrap();
        let resultado = notificador
            .notificar(&format!("{base}/hook"), 1, StatusPedido::Cancelado)
            .await;
        assert!(matches!(resultado, Err(AppError::FalhaNotificacao(_))));
    }

    #[tokio::test]
    async fn destino_inalcancavel_vira_notification_error() {
        let notificador = NotificadorWebhook::new(Duration::from_millis(500), true).unwrap();
        let resultado = notificador
            .notificar("http://127.0.0.1:9/hook", 1, StatusPedido::Entregue)
            .await;
        assert!(matches!(resultado, Err(AppError::FalhaNotificacao(_))));
    }

    #[tokio::test]
    async fn flag_desligada_nao_envia_nada() {
        // URL inexistente de propósito: com a flag desligada nada sai
        let notificador = NotificadorWebhook::new(Duration::from_secs(1), false).unwrap();
        notificador
            .notificar("http://host-inexistente.invalid/hook", 1, StatusPedido::Entregue)
            .await
            .unwrap();
    }
}

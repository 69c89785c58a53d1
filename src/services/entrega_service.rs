// src/services/entrega_service.rs

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    common::{
        csv::{gerar_csv, CelulaCsv},
        error::AppError,
        formato::formatar_data,
    },
    db::{ConfiguracaoRepository, EntregaRepository, EntregadorRepository, ProdutoRepository},
    models::{
        entrega::{
            formatar_protocolo, total_paginas, CriarEntregaPayload, EntregaView,
            FinalizacaoEntrega, FinalizarEntregaPayload, FormaPagamento, ListaEntregas,
            PaginacaoParams, StatusPedido,
        },
        produto::{sugerir_produto, valor_aplicavel, ModoAtendimento, SugestaoParams, SugestaoValor},
    },
    services::notificacao::NotificadorWebhook,
};

// Chaves editáveis em `configuracoes`; ausentes ou vazias caem no destino padrão.
pub const CHAVE_WEBHOOK_CONFIRMACAO: &str = "webhook_confirmacao_url";
pub const CHAVE_WEBHOOK_CANCELAMENTO: &str = "webhook_cancelamento_url";
const WEBHOOK_CONFIRMACAO_PADRAO: &str = "https://hooks.topgas.app/entregas/confirmacao";
const WEBHOOK_CANCELAMENTO_PADRAO: &str = "https://hooks.topgas.app/entregas/cancelamento";

#[derive(Clone)]
pub struct EntregaService {
    pool: PgPool,
    entrega_repo: EntregaRepository,
    entregador_repo: EntregadorRepository,
    produto_repo: ProdutoRepository,
    configuracao_repo: ConfiguracaoRepository,
    notificador: NotificadorWebhook,
}

impl EntregaService {
    pub fn new(
        pool: PgPool,
        entrega_repo: EntregaRepository,
        entregador_repo: EntregadorRepository,
        produto_repo: ProdutoRepository,
        configuracao_repo: ConfiguracaoRepository,
        notificador: NotificadorWebhook,
    ) -> Self {
        Self {
            pool,
            entrega_repo,
            entregador_repo,
            produto_repo,
            configuracao_repo,
            notificador,
        }
    }

    fn validar_id(&self, id: i32) -> Result<(), AppError> {
        if id <= 0 {
            return Err(AppError::IdInvalido);
        }
        Ok(())
    }

    async fn url_webhook(&self, chave: &str, padrao: &str) -> Result<String, AppError> {
        let valor = self.configuracao_repo.get(chave).await?;
        Ok(valor
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| padrao.to_string()))
    }

    // =========================================================================
    //  CRIAÇÃO E LEITURA
    // =========================================================================

    pub async fn criar(&self, payload: &CriarEntregaPayload) -> Result<EntregaView, AppError> {
        // Cadastro indicado precisa existir antes de gravar qualquer coisa
        if let Some(entregador_id) = payload.entregador_id {
            self.entregador_repo
                .find_by_id(entregador_id)
                .await?
                .ok_or(AppError::NaoEncontrado("Entregador"))?;
        }

        // O protocolo deriva do id, então INSERT e UPDATE rodam juntos
        let mut tx = self.pool.begin().await?;
        let id = self.entrega_repo.insert(&mut *tx, payload).await?;
        let protocolo = formatar_protocolo(id);
        self.entrega_repo.set_protocolo(&mut *tx, id, &protocolo).await?;
        tx.commit().await?;

        tracing::info!("📦 Entrega {} criada ({})", id, protocolo);
        self.buscar(id).await
    }

    pub async fn listar(&self, params: &PaginacaoParams) -> Result<ListaEntregas, AppError> {
        let (pagina, limite) = params.normalizar();
        let offset = (pagina - 1) * limite;

        let registros = self.entrega_repo.list_page(limite, offset).await?;
        let total = self.entrega_repo.count_all().await?;
        let entregas = registros.iter().map(EntregaView::from_registro).collect();

        Ok(ListaEntregas {
            entregas,
            total,
            pagina,
            limite,
            total_paginas: total_paginas(total, limite),
        })
    }

    pub async fn buscar(&self, id: i32) -> Result<EntregaView, AppError> {
        self.validar_id(id)?;
        let registro = self
            .entrega_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NaoEncontrado("Entrega"))?;
        Ok(EntregaView::from_registro(&registro))
    }

    // =========================================================================
    //  TRANSIÇÕES DE STATUS
    // =========================================================================

    pub async fn despachar(&self, id: i32) -> Result<EntregaView, AppError> {
        self.validar_id(id)?;
        let registro = self
            .entrega_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NaoEncontrado("Entrega"))?;

        if !StatusPedido::normalizar(&registro.status_pedido).pode_despachar() {
            return Err(AppError::Conflito("already_dispatched"));
        }

        let afetadas = self.entrega_repo.marcar_despachada(id).await?;
        if afetadas == 0 {
            return self.erro_transicao(id, "already_dispatched").await;
        }

        tracing::info!("🛵 Entrega {} despachada", id);
        self.buscar(id).await
    }

    // Notifica o webhook ANTES de gravar: se o destino recusar, o banco não
    // muda e o chamador pode repetir a operação inteira.
    pub async fn confirmar(&self, id: i32) -> Result<EntregaView, AppError> {
        self.validar_id(id)?;
        let registro = self
            .entrega_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NaoEncontrado("Entrega"))?;

        if StatusPedido::normalizar(&registro.status_pedido).is_terminal() {
            return Err(AppError::Conflito("already_finalized"));
        }

        let url = self
            .url_webhook(CHAVE_WEBHOOK_CONFIRMACAO, WEBHOOK_CONFIRMACAO_PADRAO)
            .await?;
        self.notificador
            .notificar(&url, id, StatusPedido::Entregue)
            .await?;

        let afetadas = self.entrega_repo.marcar_confirmada(id).await?;
        if afetadas == 0 {
            return self.erro_transicao(id, "already_finalized").await;
        }

        tracing::info!("✅ Entrega {} confirmada", id);
        self.buscar(id).await
    }

    pub async fn cancelar(&self, id: i32) -> Result<EntregaView, AppError> {
        self.validar_id(id)?;
        let registro = self
            .entrega_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NaoEncontrado("Entrega"))?;

        if StatusPedido::normalizar(&registro.status_pedido).is_terminal() {
            return Err(AppError::Conflito("already_finalized"));
        }

        let url = self
            .url_webhook(CHAVE_WEBHOOK_CANCELAMENTO, WEBHOOK_CANCELAMENTO_PADRAO)
            .await?;
        self.notificador
            .notificar(&url, id, StatusPedido::Cancelado)
            .await?;

        let afetadas = self.entrega_repo.marcar_cancelada(id).await?;
        if afetadas == 0 {
            return self.erro_transicao(id, "already_finalized").await;
        }

        tracing::info!("🚫 Entrega {} cancelada", id);
        self.buscar(id).await
    }

    // Fecha o pedido gravando forma de pagamento e valores. Não dispara
    // webhook: a finalização sempre foi uma mudança silenciosa de estado.
    pub async fn finalizar(
        &self,
        id: i32,
        payload: &FinalizarEntregaPayload,
    ) -> Result<EntregaView, AppError> {
        self.validar_id(id)?;

        // Validação síncrona antes de qualquer mutação
        let forma_pagamento = payload
            .forma_pagamento
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .ok_or(AppError::CampoObrigatorio("forma_pagamento"))?;
        let valor_itens = payload
            .valor_itens
            .ok_or(AppError::CampoObrigatorio("valor_itens"))?;

        let registro = self
            .entrega_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NaoEncontrado("Entrega"))?;

        if StatusPedido::normalizar(&registro.status_pedido).is_terminal() {
            return Err(AppError::Conflito("already_finalized"));
        }

        // Entregador do payload substitui o vínculo; sem payload, mantém
        let cadastro = match payload.entregador_id {
            Some(entregador_id) => Some(
                self.entregador_repo
                    .find_by_id(entregador_id)
                    .await?
                    .ok_or(AppError::NaoEncontrado("Entregador"))?,
            ),
            None => None,
        };

        // Frete base do cadastro: o novo (payload) ou o já vinculado à entrega
        let frete_cadastro = cadastro
            .as_ref()
            .and_then(|c| c.valor_frete)
            .or(registro.cadastro_valor_frete);
        let valor_frete = resolver_frete(payload.valor_frete, registro.valor_frete, frete_cadastro);

        let valor_total = valor_itens + valor_frete;

        let dados = FinalizacaoEntrega {
            forma_pagamento: forma_pagamento.to_string(),
            valor_itens,
            valor_frete,
            valor_total,
            trocar_entregador: cadastro.is_some(),
            entregador_id: payload.entregador_id,
            entregador_nome: cadastro.as_ref().map(|c| c.nome.clone()),
            entregador_telefone: cadastro.as_ref().and_then(|c| c.telefone.clone()),
            observacoes: payload.observacoes.clone(),
        };

        let afetadas = self.entrega_repo.finalizar(id, &dados).await?;
        if afetadas == 0 {
            return self.erro_transicao(id, "already_finalized").await;
        }

        tracing::info!(
            "✅ Entrega {} finalizada: {} + {} = {}",
            id,
            valor_itens,
            valor_frete,
            valor_total
        );
        self.buscar(id).await
    }

    // UPDATE guardado que não afetou nada: ou o pedido sumiu, ou outra
    // requisição fechou primeiro.
    async fn erro_transicao(&self, id: i32, detalhe: &'static str) -> Result<EntregaView, AppError> {
        if self.entrega_repo.exists(id).await? {
            return Err(AppError::Conflito(detalhe));
        }
        Err(AppError::NaoEncontrado("Entrega"))
    }

    // =========================================================================
    //  EXCLUSÃO, SUGESTÃO E EXPORTAÇÃO
    // =========================================================================

    pub async fn excluir(&self, id: i32) -> Result<(), AppError> {
        self.validar_id(id)?;
        let afetadas = self.entrega_repo.delete(id).await?;
        if afetadas == 0 {
            return Err(AppError::NaoEncontrado("Entrega"));
        }
        tracing::info!("🗑️ Entrega {} excluída", id);
        Ok(())
    }

    // Sugere um valor de itens casando a mercadoria com o catálogo ativo.
    pub async fn sugerir_valor(
        &self,
        id: i32,
        params: &SugestaoParams,
    ) -> Result<SugestaoValor, AppError> {
        self.validar_id(id)?;
        let registro = self
            .entrega_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NaoEncontrado("Entrega"))?;

        let mercadoria = registro.mercadoria.as_deref().unwrap_or("");
        let produtos = self.produto_repo.list_ativos().await?;
        let produto =
            sugerir_produto(&produtos, mercadoria).ok_or(AppError::NaoEncontrado("Produto"))?;

        let forma = params
            .forma_pagamento
            .as_deref()
            .and_then(FormaPagamento::parse);
        let modo = params.modo.as_deref().and_then(ModoAtendimento::parse);

        Ok(SugestaoValor {
            produto_id: produto.id,
            nome: produto.nome.clone(),
            unidade: produto.unidade.clone(),
            valor_sugerido: valor_aplicavel(produto, forma, modo),
        })
    }

    pub async fn exportar_csv(&self) -> Result<String, AppError> {
        let registros = self.entrega_repo.list_all().await?;
        if registros.is_empty() {
            return Err(AppError::ExportacaoVazia("entrega"));
        }
        let views: Vec<EntregaView> = registros.iter().map(EntregaView::from_registro).collect();
        Ok(csv_entregas(&views))
    }
}

// Precedência do frete na finalização: informado no payload > valor já
// gravado na entrega > frete base do cadastro > 0.
fn resolver_frete(
    do_payload: Option<Decimal>,
    da_entrega: Option<Decimal>,
    do_cadastro: Option<Decimal>,
) -> Decimal {
    do_payload
        .or(da_entrega)
        .or(do_cadastro)
        .unwrap_or(Decimal::ZERO)
}

fn dinheiro_csv(valor: &Option<Decimal>) -> String {
    valor.map(|v| format!("{v:.2}")).unwrap_or_default()
}

// O relatório usa a MESMA visão da listagem; nada é recalculado aqui.
fn csv_entregas(views: &[EntregaView]) -> String {
    let cabecalhos = [
        "ID",
        "Protocolo",
        "Cliente",
        "Telefone",
        "Bairro",
        "Cidade",
        "Endereco",
        "Ponto Referencia",
        "Mercadoria",
        "Entregador",
        "Telefone Entregador",
        "Forma Pagamento",
        "Valor Itens",
        "Valor Frete",
        "Valor Total",
        "Status",
        "Inicio",
        "Envio",
        "Confirmacao",
        "Cancelamento",
        "Tempo Total",
    ];

    let linhas: Vec<Vec<CelulaCsv>> = views
        .iter()
        .map(|v| {
            vec![
                CelulaCsv::numero(v.id),
                CelulaCsv::texto(v.protocolo.clone().unwrap_or_default()),
                CelulaCsv::texto(v.nome_cliente.clone().unwrap_or_default()),
                CelulaCsv::texto(v.telefone_cliente.clone().unwrap_or_default()),
                CelulaCsv::texto(v.bairro.clone().unwrap_or_default()),
                CelulaCsv::texto(v.cidade.clone().unwrap_or_default()),
                CelulaCsv::texto(v.endereco.clone().unwrap_or_default()),
                CelulaCsv::texto(v.ponto_referencia.clone().unwrap_or_default()),
                CelulaCsv::texto(v.mercadoria.clone().unwrap_or_default()),
                CelulaCsv::texto(v.entregador_nome.clone()),
                CelulaCsv::texto(v.entregador_telefone.clone()),
                CelulaCsv::texto(
                    v.forma_pagamento_formatada
                        .clone()
                        .or_else(|| v.forma_pagamento.clone())
                        .unwrap_or_default(),
                ),
                CelulaCsv::texto(dinheiro_csv(&v.valor_itens)),
                CelulaCsv::texto(dinheiro_csv(&v.valor_frete)),
                CelulaCsv::texto(dinheiro_csv(&v.valor_total)),
                CelulaCsv::texto(v.status_pedido.as_str()),
                CelulaCsv::texto(formatar_data(Some(&v.data_e_hora_inicio_pedido))),
                CelulaCsv::texto(formatar_data(v.data_e_hora_envio_pedido.as_ref())),
                CelulaCsv::texto(formatar_data(v.data_e_hora_confirmacao_pedido.as_ref())),
                CelulaCsv::texto(formatar_data(v.data_e_hora_cancelamento_pedido.as_ref())),
                CelulaCsv::texto(v.tempo_total.clone().unwrap_or_default()),
            ]
        })
        .collect();

    gerar_csv(&cabecalhos, &linhas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn view_exemplo() -> EntregaView {
        EntregaView {
            id: 42,
            protocolo: Some("TG-000042".to_string()),
            nome_cliente: Some("Maria, a do Centro".to_string()),
            telefone_cliente: Some("11999990000".to_string()),
            bairro: Some("Centro".to_string()),
            cidade: Some("São Paulo".to_string()),
            ponto_referencia: None,
            endereco: Some("Rua A, 10".to_string()),
            mercadoria: Some("Botijão P13".to_string()),
            entregador_id: None,
            entregador_nome: "João".to_string(),
            entregador_telefone: "-".to_string(),
            forma_pagamento: Some("pix".to_string()),
            forma_pagamento_formatada: Some("Pix".to_string()),
            valor_itens: Some(Decimal::new(3550, 2)),
            valor_frete: Some(Decimal::new(800, 2)),
            valor_total: Some(Decimal::new(4350, 2)),
            valor_total_calculado: Some(Decimal::new(4350, 2)),
            observacoes: None,
            status_pedido: StatusPedido::Entregue,
            tempo_total: Some("2 h 30 m".to_string()),
            data_e_hora_inicio_pedido: Utc.with_ymd_and_hms(2025, 3, 10, 10, 0, 0).unwrap(),
            data_e_hora_envio_pedido: None,
            data_e_hora_confirmacao_pedido: Some(
                Utc.with_ymd_and_hms(2025, 3, 10, 12, 30, 0).unwrap(),
            ),
            data_e_hora_cancelamento_pedido: None,
            finalizado_em: Some(Utc.with_ymd_and_hms(2025, 3, 10, 12, 30, 0).unwrap()),
            created_at: Utc.with_ymd_and_hms(2025, 3, 10, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn csv_usa_os_valores_da_visao() {
        let corpo = csv_entregas(&[view_exemplo()]);
        let mut linhas = corpo.lines();

        let cabecalho = linhas.next().unwrap();
        assert!(cabecalho.starts_with("ID,Protocolo,Cliente"));
        assert!(cabecalho.ends_with("Cancelamento,Tempo Total"));

        let linha = linhas.next().unwrap();
        // id numérico sem aspas; nome com vírgula escapado entre aspas
        assert!(linha.starts_with("42,\"TG-000042\",\"Maria, a do Centro\""));
        // dinheiro com duas casas, como texto
        assert!(linha.contains("\"35.50\",\"8.00\",\"43.50\""));
        assert!(linha.contains("\"entregue\""));
        assert!(linha.contains("\"10/03/2025 10:00\""));
        // envio nunca aconteceu
        assert!(linha.contains("\"Aguardando...\""));
        assert!(linha.ends_with("\"2 h 30 m\""));
        assert!(linhas.next().is_none());
    }

    #[test]
    fn dinheiro_ausente_vira_celula_vazia() {
        assert_eq!(dinheiro_csv(&None), "");
        assert_eq!(dinheiro_csv(&Some(Decimal::new(500, 1))), "50.00");
    }

    #[test]
    fn frete_informado_vence_todas_as_fontes() {
        let frete = resolver_frete(
            Some(Decimal::new(800, 2)),
            Some(Decimal::new(1200, 2)),
            Some(Decimal::new(1500, 2)),
        );
        assert_eq!(frete, Decimal::new(800, 2));
    }

    #[test]
    fn frete_gravado_vence_o_do_cadastro() {
        let frete = resolver_frete(None, Some(Decimal::new(1200, 2)), Some(Decimal::new(1500, 2)));
        assert_eq!(frete, Decimal::new(1200, 2));
    }

    #[test]
    fn frete_do_cadastro_cobre_a_ausencia() {
        let frete = resolver_frete(None, None, Some(Decimal::new(1500, 2)));
        assert_eq!(frete, Decimal::new(1500, 2));
    }

    #[test]
    fn sem_nenhuma_fonte_o_frete_e_zero() {
        assert_eq!(resolver_frete(None, None, None), Decimal::ZERO);
    }

    #[test]
    fn finalizacao_pix_soma_itens_e_frete() {
        let frete = resolver_frete(Some(Decimal::new(800, 2)), None, None);
        let total = Decimal::new(3550, 2) + frete;
        assert_eq!(total, Decimal::new(4350, 2));
        assert_eq!(FormaPagamento::parse("pix").unwrap().rotulo(), "Pix");
    }
}

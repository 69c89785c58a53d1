// src/models/entrega.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::common::formato::{formatar_tempo_total, normalizar_busca};

// ============================================================================
//  STATUS DO PEDIDO
// ============================================================================

// O banco herdou status em texto livre com grafias variadas ("Entregue",
// "finalizada", "Em Entrega"...). Toda normalização acontece aqui; o resto
// do código só enxerga o enum fechado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StatusPedido {
    Pendente,
    EmEntrega,
    Entregue,
    Cancelado,
}

const ALIASES_ENTREGUE: [&str; 4] = ["entregue", "finalizado", "finalizada", "finalizadas"];
const ALIASES_CANCELADO: [&str; 3] = ["cancelado", "cancelada", "canceladas"];
const ALIASES_EM_ENTREGA: [&str; 6] = [
    "em entrega",
    "em_entrega",
    "em rota",
    "em rota de entrega",
    "em_andamento",
    "em andamento",
];

impl StatusPedido {
    // Reconhece as grafias que as versões antigas do sistema gravaram.
    pub fn parse(valor: &str) -> Option<Self> {
        let s = valor.trim().to_lowercase();
        if s == "pendente" {
            return Some(StatusPedido::Pendente);
        }
        if ALIASES_EM_ENTREGA.contains(&s.as_str()) {
            return Some(StatusPedido::EmEntrega);
        }
        if ALIASES_ENTREGUE.contains(&s.as_str()) {
            return Some(StatusPedido::Entregue);
        }
        if ALIASES_CANCELADO.contains(&s.as_str()) {
            return Some(StatusPedido::Cancelado);
        }
        None
    }

    // Status desconhecido cai no balde inicial, como o sistema sempre tratou.
    pub fn normalizar(valor: &str) -> Self {
        Self::parse(valor).unwrap_or(StatusPedido::Pendente)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusPedido::Pendente => "pendente",
            StatusPedido::EmEntrega => "em_entrega",
            StatusPedido::Entregue => "entregue",
            StatusPedido::Cancelado => "cancelado",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, StatusPedido::Entregue | StatusPedido::Cancelado)
    }

    pub fn pode_despachar(&self) -> bool {
        matches!(self, StatusPedido::Pendente)
    }

    pub fn pode_confirmar(&self) -> bool {
        !self.is_terminal()
    }

    pub fn pode_cancelar(&self) -> bool {
        !self.is_terminal()
    }

    // Grafias que contam como "entregue" nas agregações SQL.
    pub fn aliases_entregue() -> Vec<String> {
        ALIASES_ENTREGUE.iter().map(|s| s.to_string()).collect()
    }

    // Grafias que contam como "cancelado" nas agregações SQL.
    pub fn aliases_cancelado() -> Vec<String> {
        ALIASES_CANCELADO.iter().map(|s| s.to_string()).collect()
    }

    // Grafias terminais, usadas no guard otimista dos UPDATEs de transição.
    pub fn aliases_terminais() -> Vec<String> {
        let mut todos = Self::aliases_entregue();
        todos.extend(Self::aliases_cancelado());
        todos
    }

    // Tudo que NÃO conta como pendente (guard do despacho: qualquer grafia
    // desconhecida é tratada como pendente, igual ao `normalizar`).
    pub fn aliases_nao_pendentes() -> Vec<String> {
        let mut todos: Vec<String> = ALIASES_EM_ENTREGA.iter().map(|s| s.to_string()).collect();
        todos.extend(Self::aliases_terminais());
        todos
    }
}

impl std::fmt::Display for StatusPedido {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
//  FORMA DE PAGAMENTO
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FormaPagamento {
    Dinheiro,
    Pix,
    Debito,
    Credito,
}

impl FormaPagamento {
    pub fn parse(valor: &str) -> Option<Self> {
        match normalizar_busca(valor).as_str() {
            "dinheiro" => Some(FormaPagamento::Dinheiro),
            "pix" => Some(FormaPagamento::Pix),
            "debito" => Some(FormaPagamento::Debito),
            "credito" => Some(FormaPagamento::Credito),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FormaPagamento::Dinheiro => "dinheiro",
            FormaPagamento::Pix => "pix",
            FormaPagamento::Debito => "debito",
            FormaPagamento::Credito => "credito",
        }
    }

    // Rótulo exibido em tela e nos relatórios.
    pub fn rotulo(&self) -> &'static str {
        match self {
            FormaPagamento::Dinheiro => "Dinheiro",
            FormaPagamento::Pix => "Pix",
            FormaPagamento::Debito => "Débito",
            FormaPagamento::Credito => "Crédito",
        }
    }
}

// ============================================================================
//  REGISTRO (linha do banco) E VISÃO CONSOLIDADA
// ============================================================================

// Linha de `entregas` com o LEFT JOIN do cadastro de entregadores.
// As colunas cadastro_* vêm aliasadas na consulta do repositório.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EntregaRegistro {
    pub id: i32,
    pub protocolo: Option<String>,
    pub nome_cliente: Option<String>,
    pub telefone_cliente: Option<String>,
    pub bairro: Option<String>,
    pub cidade: Option<String>,
    pub ponto_referencia: Option<String>,
    pub endereco: Option<String>,
    pub mercadoria: Option<String>,
    pub entregador_id: Option<i32>,
    // Par legado gravado antes do cadastro de entregadores existir
    pub entregador: Option<String>,
    pub telefone_entregador: Option<String>,
    pub forma_pagamento: Option<String>,
    pub valor_itens: Option<Decimal>,
    pub valor_frete: Option<Decimal>,
    pub valor_total: Option<Decimal>,
    pub observacoes: Option<String>,
    pub status_pedido: String,
    pub data_e_hora_inicio_pedido: DateTime<Utc>,
    pub data_e_hora_envio_pedido: Option<DateTime<Utc>>,
    pub data_e_hora_confirmacao_pedido: Option<DateTime<Utc>>,
    pub data_e_hora_cancelamento_pedido: Option<DateTime<Utc>>,
    pub finalizado_em: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub cadastro_nome: Option<String>,
    pub cadastro_telefone: Option<String>,
    pub cadastro_valor_frete: Option<Decimal>,
}

// A visão que a listagem, a busca individual e o CSV compartilham.
// Campos derivados seguem sempre as mesmas regras de precedência;
// nenhum endpoint recalcula nada por conta própria.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EntregaView {
    pub id: i32,
    pub protocolo: Option<String>,
    pub nome_cliente: Option<String>,
    pub telefone_cliente: Option<String>,
    pub bairro: Option<String>,
    pub cidade: Option<String>,
    pub ponto_referencia: Option<String>,
    pub endereco: Option<String>,
    pub mercadoria: Option<String>,
    pub entregador_id: Option<i32>,
    pub entregador_nome: String,
    pub entregador_telefone: String,
    pub forma_pagamento: Option<String>,
    pub forma_pagamento_formatada: Option<String>,
    pub valor_itens: Option<Decimal>,
    pub valor_frete: Option<Decimal>,
    pub valor_total: Option<Decimal>,
    // Soma recalculada de itens + frete, exposta ao lado do valor persistido
    // para auditoria. Nunca sobrescreve o que está gravado.
    pub valor_total_calculado: Option<Decimal>,
    pub observacoes: Option<String>,
    pub status_pedido: StatusPedido,
    pub tempo_total: Option<String>,
    pub data_e_hora_inicio_pedido: DateTime<Utc>,
    pub data_e_hora_envio_pedido: Option<DateTime<Utc>>,
    pub data_e_hora_confirmacao_pedido: Option<DateTime<Utc>>,
    pub data_e_hora_cancelamento_pedido: Option<DateTime<Utc>>,
    pub finalizado_em: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

fn texto_preenchido(valor: &Option<String>) -> Option<String> {
    valor
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

impl EntregaView {
    // Projeção pura do registro para a visão consolidada.
    pub fn from_registro(r: &EntregaRegistro) -> Self {
        let status = StatusPedido::normalizar(&r.status_pedido);

        // Cadastro tem prioridade; o par legado cobre pedidos antigos.
        let entregador_nome = texto_preenchido(&r.cadastro_nome)
            .or_else(|| texto_preenchido(&r.entregador))
            .unwrap_or_else(|| "-".to_string());
        let entregador_telefone = texto_preenchido(&r.cadastro_telefone)
            .or_else(|| texto_preenchido(&r.telefone_entregador))
            .unwrap_or_else(|| "-".to_string());

        let valor_frete = r.valor_frete.or(r.cadastro_valor_frete);

        let valor_total_calculado = if r.valor_itens.is_some() || valor_frete.is_some() {
            Some(
                r.valor_itens.unwrap_or(Decimal::ZERO) + valor_frete.unwrap_or(Decimal::ZERO),
            )
        } else {
            None
        };
        // O valor gravado manda; o calculado só preenche a lacuna.
        let valor_total = r.valor_total.or(valor_total_calculado);

        let forma_pagamento_formatada = r
            .forma_pagamento
            .as_deref()
            .and_then(FormaPagamento::parse)
            .map(|f| f.rotulo().to_string());

        let tempo_total = match (status, &r.data_e_hora_confirmacao_pedido) {
            (StatusPedido::Entregue, Some(confirmacao)) => Some(formatar_tempo_total(
                &r.data_e_hora_inicio_pedido,
                confirmacao,
            )),
            _ => None,
        };

        EntregaView {
            id: r.id,
            protocolo: r.protocolo.clone(),
            nome_cliente: r.nome_cliente.clone(),
            telefone_cliente: r.telefone_cliente.clone(),
            bairro: r.bairro.clone(),
            cidade: r.cidade.clone(),
            ponto_referencia: r.ponto_referencia.clone(),
            endereco: r.endereco.clone(),
            mercadoria: r.mercadoria.clone(),
            entregador_id: r.entregador_id,
            entregador_nome,
            entregador_telefone,
            forma_pagamento: r.forma_pagamento.clone(),
            forma_pagamento_formatada,
            valor_itens: r.valor_itens,
            valor_frete,
            valor_total,
            valor_total_calculado,
            observacoes: r.observacoes.clone(),
            status_pedido: status,
            tempo_total,
            data_e_hora_inicio_pedido: r.data_e_hora_inicio_pedido,
            data_e_hora_envio_pedido: r.data_e_hora_envio_pedido,
            data_e_hora_confirmacao_pedido: r.data_e_hora_confirmacao_pedido,
            data_e_hora_cancelamento_pedido: r.data_e_hora_cancelamento_pedido,
            finalizado_em: r.finalizado_em,
            created_at: r.created_at,
        }
    }
}

// ============================================================================
//  PAYLOADS E RESPOSTAS
// ============================================================================

#[derive(Debug, Deserialize, ToSchema)]
pub struct CriarEntregaPayload {
    pub nome_cliente: Option<String>,
    pub telefone_cliente: Option<String>,
    pub bairro: Option<String>,
    pub cidade: Option<String>,
    pub ponto_referencia: Option<String>,
    pub endereco: Option<String>,
    pub mercadoria: Option<String>,
    pub entregador_id: Option<i32>,
    pub valor_itens: Option<Decimal>,
    pub valor_frete: Option<Decimal>,
    pub observacoes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FinalizarEntregaPayload {
    pub forma_pagamento: Option<String>,
    pub valor_itens: Option<Decimal>,
    pub valor_frete: Option<Decimal>,
    pub observacoes: Option<String>,
    pub entregador_id: Option<i32>,
}

// Dados comerciais já resolvidos pelo service (frete com precedência
// aplicada, total calculado, entregador adotado) prontos para persistir.
#[derive(Debug, Clone)]
pub struct FinalizacaoEntrega {
    pub forma_pagamento: String,
    pub valor_itens: Decimal,
    pub valor_frete: Decimal,
    pub valor_total: Decimal,
    pub trocar_entregador: bool,
    pub entregador_id: Option<i32>,
    pub entregador_nome: Option<String>,
    pub entregador_telefone: Option<String>,
    pub observacoes: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListaEntregas {
    pub entregas: Vec<EntregaView>,
    pub total: i64,
    pub pagina: i64,
    pub limite: i64,
    pub total_paginas: i64,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct PaginacaoParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PaginacaoParams {
    // Página mínima 1; limite padrão 50, nunca acima de 1000.
    pub fn normalizar(&self) -> (i64, i64) {
        let pagina = self.page.unwrap_or(1).max(1);
        let limite = self.limit.unwrap_or(50).clamp(1, 1000);
        (pagina, limite)
    }
}

pub fn total_paginas(total: i64, limite: i64) -> i64 {
    if total == 0 {
        0
    } else {
        (total + limite - 1) / limite
    }
}

// Protocolo visível ao cliente, derivado do id da entrega.
pub fn formatar_protocolo(id: i32) -> String {
    format!("TG-{id:06}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn registro_base() -> EntregaRegistro {
        EntregaRegistro {
            id: 1,
            protocolo: Some("TG-000001".to_string()),
            nome_cliente: Some("Maria".to_string()),
            telefone_cliente: Some("11999990000".to_string()),
            bairro: Some("Centro".to_string()),
            cidade: Some("São Paulo".to_string()),
            ponto_referencia: None,
            endereco: Some("Rua A, 10".to_string()),
            mercadoria: Some("Botijão P13".to_string()),
            entregador_id: None,
            entregador: None,
            telefone_entregador: None,
            forma_pagamento: None,
            valor_itens: None,
            valor_frete: None,
            valor_total: None,
            observacoes: None,
            status_pedido: "pendente".to_string(),
            data_e_hora_inicio_pedido: Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap(),
            data_e_hora_envio_pedido: None,
            data_e_hora_confirmacao_pedido: None,
            data_e_hora_cancelamento_pedido: None,
            finalizado_em: None,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap(),
            cadastro_nome: None,
            cadastro_telefone: None,
            cadastro_valor_frete: None,
        }
    }

    #[test]
    fn normaliza_grafias_de_status() {
        assert_eq!(StatusPedido::parse("Entregue"), Some(StatusPedido::Entregue));
        assert_eq!(StatusPedido::parse(" FINALIZADA "), Some(StatusPedido::Entregue));
        assert_eq!(StatusPedido::parse("finalizadas"), Some(StatusPedido::Entregue));
        assert_eq!(StatusPedido::parse("Cancelado"), Some(StatusPedido::Cancelado));
        assert_eq!(StatusPedido::parse("canceladas"), Some(StatusPedido::Cancelado));
        assert_eq!(StatusPedido::parse("Em Entrega"), Some(StatusPedido::EmEntrega));
        assert_eq!(StatusPedido::parse("em rota de entrega"), Some(StatusPedido::EmEntrega));
        assert_eq!(StatusPedido::parse("em_andamento"), Some(StatusPedido::EmEntrega));
        assert_eq!(StatusPedido::parse("pendente"), Some(StatusPedido::Pendente));
        assert_eq!(StatusPedido::parse("qualquer coisa"), None);
    }

    #[test]
    fn status_desconhecido_normaliza_para_pendente() {
        assert_eq!(StatusPedido::normalizar("???"), StatusPedido::Pendente);
        assert_eq!(StatusPedido::normalizar(""), StatusPedido::Pendente);
    }

    #[test]
    fn transicoes_permitidas_por_status() {
        assert!(StatusPedido::Pendente.pode_despachar());
        assert!(StatusPedido::Pendente.pode_confirmar());
        assert!(StatusPedido::Pendente.pode_cancelar());

        assert!(!StatusPedido::EmEntrega.pode_despachar());
        assert!(StatusPedido::EmEntrega.pode_confirmar());
        assert!(StatusPedido::EmEntrega.pode_cancelar());

        for terminal in [StatusPedido::Entregue, StatusPedido::Cancelado] {
            assert!(terminal.is_terminal());
            assert!(!terminal.pode_despachar());
            assert!(!terminal.pode_confirmar());
            assert!(!terminal.pode_cancelar());
        }
    }

    #[test]
    fn aliases_terminais_cobrem_entregue_e_cancelado() {
        let aliases = StatusPedido::aliases_terminais();
        for grafia in ["entregue", "finalizada", "cancelado", "canceladas"] {
            assert!(aliases.contains(&grafia.to_string()), "faltou {grafia}");
        }
        assert!(!aliases.contains(&"pendente".to_string()));
    }

    #[test]
    fn forma_pagamento_aceita_acentos() {
        assert_eq!(FormaPagamento::parse("PIX"), Some(FormaPagamento::Pix));
        assert_eq!(FormaPagamento::parse("débito"), Some(FormaPagamento::Debito));
        assert_eq!(FormaPagamento::parse("credito"), Some(FormaPagamento::Credito));
        assert_eq!(FormaPagamento::parse("Dinheiro"), Some(FormaPagamento::Dinheiro));
        assert_eq!(FormaPagamento::parse("cheque"), None);
    }

    #[test]
    fn rotulos_de_pagamento() {
        assert_eq!(FormaPagamento::Pix.rotulo(), "Pix");
        assert_eq!(FormaPagamento::Debito.rotulo(), "Débito");
        assert_eq!(FormaPagamento::Credito.rotulo(), "Crédito");
        assert_eq!(FormaPagamento::Dinheiro.rotulo(), "Dinheiro");
    }

    #[test]
    fn entregador_legado_sem_cadastro_aparece_na_visao() {
        let mut r = registro_base();
        r.id = 7;
        r.entregador = Some("João".to_string());
        let view = EntregaView::from_registro(&r);
        assert_eq!(view.entregador_nome, "João");
        assert_eq!(view.entregador_telefone, "-");
    }

    #[test]
    fn cadastro_tem_prioridade_sobre_par_legado() {
        let mut r = registro_base();
        r.entregador = Some("João".to_string());
        r.cadastro_nome = Some("Carlos".to_string());
        r.cadastro_telefone = Some("11888887777".to_string());
        let view = EntregaView::from_registro(&r);
        assert_eq!(view.entregador_nome, "Carlos");
        assert_eq!(view.entregador_telefone, "11888887777");
    }

    #[test]
    fn sem_entregador_algum_vira_traco() {
        let view = EntregaView::from_registro(&registro_base());
        assert_eq!(view.entregador_nome, "-");
        assert_eq!(view.entregador_telefone, "-");
    }

    #[test]
    fn frete_da_entrega_prevalece_sobre_o_cadastro() {
        let mut r = registro_base();
        r.valor_frete = Some(Decimal::new(1000, 2)); // 10.00
        r.cadastro_valor_frete = Some(Decimal::new(500, 2)); // 5.00
        let view = EntregaView::from_registro(&r);
        assert_eq!(view.valor_frete, Some(Decimal::new(1000, 2)));
    }

    #[test]
    fn frete_do_cadastro_preenche_quando_entrega_nao_tem() {
        let mut r = registro_base();
        r.cadastro_valor_frete = Some(Decimal::new(500, 2));
        let view = EntregaView::from_registro(&r);
        assert_eq!(view.valor_frete, Some(Decimal::new(500, 2)));
    }

    #[test]
    fn valor_total_persistido_e_autoritativo() {
        let mut r = registro_base();
        r.valor_itens = Some(Decimal::new(3550, 2)); // 35.50
        r.valor_frete = Some(Decimal::new(800, 2)); // 8.00
        r.valor_total = Some(Decimal::new(9999, 2)); // valor antigo divergente
        let view = EntregaView::from_registro(&r);
        assert_eq!(view.valor_total, Some(Decimal::new(9999, 2)));
        // A divergência fica visível no campo calculado
        assert_eq!(view.valor_total_calculado, Some(Decimal::new(4350, 2)));
    }

    #[test]
    fn valor_total_calculado_preenche_na_ausencia_do_persistido() {
        let mut r = registro_base();
        r.valor_itens = Some(Decimal::new(3550, 2));
        r.valor_frete = Some(Decimal::new(800, 2));
        let view = EntregaView::from_registro(&r);
        assert_eq!(view.valor_total, Some(Decimal::new(4350, 2)));
        assert_eq!(view.valor_total_calculado, Some(Decimal::new(4350, 2)));
    }

    #[test]
    fn valor_total_nulo_quando_nada_se_sabe() {
        let view = EntregaView::from_registro(&registro_base());
        assert_eq!(view.valor_total, None);
        assert_eq!(view.valor_total_calculado, None);
    }

    #[test]
    fn um_lado_conhecido_ja_gera_total_calculado() {
        let mut r = registro_base();
        r.valor_itens = Some(Decimal::new(3550, 2));
        let view = EntregaView::from_registro(&r);
        assert_eq!(view.valor_total_calculado, Some(Decimal::new(3550, 2)));
    }

    #[test]
    fn tempo_total_so_para_entregas_confirmadas() {
        let mut r = registro_base();
        r.status_pedido = "entregue".to_string();
        r.data_e_hora_confirmacao_pedido =
            Some(Utc.with_ymd_and_hms(2025, 1, 1, 12, 30, 0).unwrap());
        let view = EntregaView::from_registro(&r);
        assert_eq!(view.tempo_total.as_deref(), Some("2 h 30 m"));

        let pendente = EntregaView::from_registro(&registro_base());
        assert_eq!(pendente.tempo_total, None);
    }

    #[test]
    fn forma_formatada_acompanha_o_campo_bruto() {
        let mut r = registro_base();
        r.forma_pagamento = Some("pix".to_string());
        let view = EntregaView::from_registro(&r);
        assert_eq!(view.forma_pagamento_formatada.as_deref(), Some("Pix"));

        r.forma_pagamento = Some("fiado".to_string());
        let view = EntregaView::from_registro(&r);
        assert_eq!(view.forma_pagamento_formatada, None);
    }

    #[test]
    fn paginacao_aplica_padroes_e_limites() {
        let p = PaginacaoParams { page: None, limit: None };
        assert_eq!(p.normalizar(), (1, 50));

        let p = PaginacaoParams { page: Some(0), limit: Some(0) };
        assert_eq!(p.normalizar(), (1, 1));

        let p = PaginacaoParams { page: Some(-3), limit: Some(9999) };
        assert_eq!(p.normalizar(), (1, 1000));

        let p = PaginacaoParams { page: Some(4), limit: Some(25) };
        assert_eq!(p.normalizar(), (4, 25));
    }

    #[test]
    fn total_de_paginas_arredonda_para_cima() {
        assert_eq!(total_paginas(0, 50), 0);
        assert_eq!(total_paginas(1, 50), 1);
        assert_eq!(total_paginas(50, 50), 1);
        assert_eq!(total_paginas(51, 50), 2);
        assert_eq!(total_paginas(101, 25), 5);
    }

    #[test]
    fn protocolo_com_zeros_a_esquerda() {
        assert_eq!(formatar_protocolo(42), "TG-000042");
        assert_eq!(formatar_protocolo(1234567), "TG-1234567");
    }
}

// src/models/produto.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::common::formato::normalizar_busca;
use crate::models::entrega::FormaPagamento;

// Produto do catálogo, com o valor base e as variações opcionais por
// forma de pagamento e por modalidade (entrega ou retirada no balcão).
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Produto {
    pub id: i32,
    pub nome: String,
    pub valor: Decimal,
    pub valor_pix: Option<Decimal>,
    pub valor_debito: Option<Decimal>,
    pub valor_credito: Option<Decimal>,
    pub valor_entrega: Option<Decimal>,
    pub valor_retirada: Option<Decimal>,
    pub unidade: String,
    pub observacoes: Option<String>,
    pub ativo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ProdutoPayload {
    #[validate(
        required(message = "O nome do produto é obrigatório."),
        length(min = 1, message = "O nome do produto é obrigatório.")
    )]
    pub nome: Option<String>,
    #[validate(required(message = "O valor do produto é obrigatório."))]
    pub valor: Option<Decimal>,
    pub valor_pix: Option<Decimal>,
    pub valor_debito: Option<Decimal>,
    pub valor_credito: Option<Decimal>,
    pub valor_entrega: Option<Decimal>,
    pub valor_retirada: Option<Decimal>,
    #[validate(
        required(message = "A unidade do produto é obrigatória."),
        length(min = 1, message = "A unidade do produto é obrigatória.")
    )]
    pub unidade: Option<String>,
    pub observacoes: Option<String>,
    pub ativo: Option<bool>,
}

// ============================================================================
//  SUGESTÃO DE VALOR NA FINALIZAÇÃO
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModoAtendimento {
    Entrega,
    Retirada,
}

impl ModoAtendimento {
    pub fn parse(valor: &str) -> Option<Self> {
        match normalizar_busca(valor).as_str() {
            "entrega" => Some(ModoAtendimento::Entrega),
            "retirada" => Some(ModoAtendimento::Retirada),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SugestaoParams {
    pub forma_pagamento: Option<String>,
    pub modo: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SugestaoValor {
    pub produto_id: i32,
    pub nome: String,
    pub unidade: String,
    pub valor_sugerido: Decimal,
}

// Casa a descrição livre da mercadoria com o catálogo, ignorando caixa e
// acentos. Vence o produto de nome mais longo contido na descrição; se
// nenhum couber, tenta a contenção inversa (descrição dentro do nome).
pub fn sugerir_produto<'a>(produtos: &'a [Produto], mercadoria: &str) -> Option<&'a Produto> {
    let alvo = normalizar_busca(mercadoria);
    if alvo.is_empty() {
        return None;
    }

    let mut melhor: Option<&Produto> = None;
    for produto in produtos {
        let nome = normalizar_busca(&produto.nome);
        if nome.is_empty() || !alvo.contains(&nome) {
            continue;
        }
        if melhor.is_none_or(|m| nome.len() > normalizar_busca(&m.nome).len()) {
            melhor = Some(produto);
        }
    }
    if melhor.is_some() {
        return melhor;
    }

    produtos
        .iter()
        .find(|p| normalizar_busca(&p.nome).contains(&alvo))
}

// Preço aplicável: variação da forma de pagamento > variação da modalidade
// > valor base.
pub fn valor_aplicavel(
    produto: &Produto,
    forma: Option<FormaPagamento>,
    modo: Option<ModoAtendimento>,
) -> Decimal {
    let por_forma = match forma {
        Some(FormaPagamento::Pix) => produto.valor_pix,
        Some(FormaPagamento::Debito) => produto.valor_debito,
        Some(FormaPagamento::Credito) => produto.valor_credito,
        // Dinheiro usa o valor base (não há coluna própria)
        Some(FormaPagamento::Dinheiro) | None => None,
    };
    let por_modo = match modo {
        Some(ModoAtendimento::Entrega) => produto.valor_entrega,
        Some(ModoAtendimento::Retirada) => produto.valor_retirada,
        None => None,
    };

    por_forma.or(por_modo).unwrap_or(produto.valor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn produto(id: i32, nome: &str, valor: i64) -> Produto {
        Produto {
            id,
            nome: nome.to_string(),
            valor: Decimal::new(valor, 2),
            valor_pix: None,
            valor_debito: None,
            valor_credito: None,
            valor_entrega: None,
            valor_retirada: None,
            unidade: "Matriz".to_string(),
            observacoes: None,
            ativo: true,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            updated_at: None,
        }
    }

    #[test]
    fn casa_por_substring_sem_acentos() {
        let catalogo = vec![produto(1, "Botijão P13", 12000), produto(2, "Água Mineral", 800)];
        let achado = sugerir_produto(&catalogo, "2x botijao p13 cheio");
        assert_eq!(achado.map(|p| p.id), Some(1));

        let achado = sugerir_produto(&catalogo, "AGUA mineral 20L");
        assert_eq!(achado.map(|p| p.id), Some(2));
    }

    #[test]
    fn prefere_o_nome_mais_especifico() {
        let catalogo = vec![produto(1, "Botijão", 11000), produto(2, "Botijão P13", 12000)];
        let achado = sugerir_produto(&catalogo, "botijão p13");
        assert_eq!(achado.map(|p| p.id), Some(2));
    }

    #[test]
    fn contencao_inversa_como_ultimo_recurso() {
        let catalogo = vec![produto(1, "Botijão P13 Completo", 15000)];
        // A descrição abreviada cabe dentro do nome do produto
        let achado = sugerir_produto(&catalogo, "p13 completo");
        assert_eq!(achado.map(|p| p.id), Some(1));

        let achado = sugerir_produto(&catalogo, "carvão 5kg");
        assert!(achado.is_none());
    }

    #[test]
    fn mercadoria_vazia_nao_sugere_nada() {
        let catalogo = vec![produto(1, "Botijão P13", 12000)];
        assert!(sugerir_produto(&catalogo, "   ").is_none());
    }

    #[test]
    fn variacao_de_pagamento_vence_modalidade_e_base() {
        let mut p = produto(1, "Botijão P13", 12000);
        p.valor_pix = Some(Decimal::new(11500, 2));
        p.valor_entrega = Some(Decimal::new(12500, 2));

        let valor = valor_aplicavel(
            &p,
            Some(FormaPagamento::Pix),
            Some(ModoAtendimento::Entrega),
        );
        assert_eq!(valor, Decimal::new(11500, 2));
    }

    #[test]
    fn sem_variacao_de_pagamento_usa_modalidade() {
        let mut p = produto(1, "Botijão P13", 12000);
        p.valor_entrega = Some(Decimal::new(12500, 2));

        let valor = valor_aplicavel(
            &p,
            Some(FormaPagamento::Dinheiro),
            Some(ModoAtendimento::Entrega),
        );
        assert_eq!(valor, Decimal::new(12500, 2));
    }

    #[test]
    fn cai_no_valor_base_sem_variacoes() {
        let p = produto(1, "Botijão P13", 12000);
        let valor = valor_aplicavel(&p, Some(FormaPagamento::Credito), None);
        assert_eq!(valor, Decimal::new(12000, 2));
    }
}

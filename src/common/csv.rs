// src/common/csv.rs

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::Utc;

// Uma célula do CSV. Números saem sem aspas; texto não vazio sai
// entre aspas, com aspas internas duplicadas.
#[derive(Debug, Clone)]
pub enum CelulaCsv {
    Numero(String),
    Texto(String),
}

impl CelulaCsv {
    pub fn numero<T: ToString>(valor: T) -> Self {
        CelulaCsv::Numero(valor.to_string())
    }

    pub fn texto(valor: impl Into<String>) -> Self {
        CelulaCsv::Texto(valor.into())
    }

    fn renderizar(&self) -> String {
        match self {
            CelulaCsv::Numero(v) => v.clone(),
            CelulaCsv::Texto(v) => {
                if v.contains(',') || v.contains('"') || v.contains('\n') {
                    format!("\"{}\"", v.replace('"', "\"\""))
                } else if !v.trim().is_empty() {
                    format!("\"{v}\"")
                } else {
                    // vazio (ou só espaços) fica sem aspas
                    v.clone()
                }
            }
        }
    }
}

// Gera o corpo do CSV: primeira linha com os cabeçalhos, depois os dados.
pub fn gerar_csv(cabecalhos: &[&str], linhas: &[Vec<CelulaCsv>]) -> String {
    let mut saida = Vec::with_capacity(linhas.len() + 1);
    saida.push(cabecalhos.join(","));
    for linha in linhas {
        let celulas: Vec<String> = linha.iter().map(CelulaCsv::renderizar).collect();
        saida.push(celulas.join(","));
    }
    saida.join("\n")
}

// Nome de arquivo de exportação com a data do dia: prefixo_AAAAMMDD.csv
pub fn nome_arquivo_exportacao(prefixo: &str) -> String {
    format!("{}_{}.csv", prefixo, Utc::now().format("%Y%m%d"))
}

// Monta a resposta HTTP de download do CSV.
pub fn resposta_download(nome_arquivo: &str, corpo: String) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{nome_arquivo}\""),
            ),
        ],
        corpo,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cabecalho_e_linhas() {
        let linhas = vec![
            vec![CelulaCsv::numero(1), CelulaCsv::texto("Maria")],
            vec![CelulaCsv::numero(2), CelulaCsv::texto("João")],
        ];
        let csv = gerar_csv(&["ID", "Nome"], &linhas);
        assert_eq!(csv, "ID,Nome\n1,\"Maria\"\n2,\"João\"");
    }

    #[test]
    fn texto_com_virgula_escapa_aspas() {
        let linhas = vec![vec![CelulaCsv::texto("Rua A, 10")]];
        let csv = gerar_csv(&["Endereco"], &linhas);
        assert_eq!(csv, "Endereco\n\"Rua A, 10\"");
    }

    #[test]
    fn aspas_internas_sao_duplicadas() {
        let linhas = vec![vec![CelulaCsv::texto("botijão \"cheio\"")]];
        let csv = gerar_csv(&["Obs"], &linhas);
        assert_eq!(csv, "Obs\n\"botijão \"\"cheio\"\"\"");
    }

    #[test]
    fn vazio_fica_sem_aspas_e_numero_sem_aspas() {
        let linhas = vec![vec![
            CelulaCsv::numero(42),
            CelulaCsv::texto(""),
            CelulaCsv::texto("35.50"),
        ]];
        let csv = gerar_csv(&["ID", "Obs", "Valor"], &linhas);
        assert_eq!(csv, "ID,Obs,Valor\n42,,\"35.50\"");
    }

    #[test]
    fn nome_de_arquivo_tem_extensao_csv() {
        let nome = nome_arquivo_exportacao("entregas");
        assert!(nome.starts_with("entregas_"));
        assert!(nome.ends_with(".csv"));
        // entregas_ + AAAAMMDD + .csv
        assert_eq!(nome.len(), "entregas_".len() + 8 + 4);
    }
}

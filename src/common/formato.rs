// src/common/formato.rs

use chrono::{DateTime, Utc};

// Formata data para exibição nos relatórios (dd/mm/aaaa hh:mm).
// Campos de data ainda não preenchidos aparecem como "Aguardando...".
pub fn formatar_data(data: Option<&DateTime<Utc>>) -> String {
    match data {
        Some(d) => d.format("%d/%m/%Y %H:%M").to_string(),
        None => "Aguardando...".to_string(),
    }
}

// Calcula o tempo decorrido entre duas datas, no formato "2 h 30 m".
// Partes zeradas são omitidas; duração nula vira "0 s".
pub fn formatar_tempo_total(inicio: &DateTime<Utc>, fim: &DateTime<Utc>) -> String {
    let diff = fim.signed_duration_since(inicio);
    let total_segundos = diff.num_seconds();
    if total_segundos < 0 {
        // Dados inconsistentes (fim antes do início)
        return "-".to_string();
    }

    let dias = total_segundos / 86_400;
    let horas = (total_segundos % 86_400) / 3_600;
    let minutos = (total_segundos % 3_600) / 60;
    let segundos = total_segundos % 60;

    let mut partes = Vec::new();
    if dias > 0 {
        partes.push(format!("{dias} d"));
    }
    if horas > 0 {
        partes.push(format!("{horas} h"));
    }
    if minutos > 0 {
        partes.push(format!("{minutos} m"));
    }
    if segundos > 0 {
        partes.push(format!("{segundos} s"));
    }

    if partes.is_empty() {
        "0 s".to_string()
    } else {
        partes.join(" ")
    }
}

// Normaliza texto para busca: minúsculas e sem acentos.
// Cobre o conjunto de acentuação do português.
pub fn normalizar_busca(texto: &str) -> String {
    texto
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            'ñ' => 'n',
            outro => outro,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn data(ano: i32, mes: u32, dia: u32, hora: u32, minuto: u32, segundo: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(ano, mes, dia, hora, minuto, segundo)
            .unwrap()
    }

    #[test]
    fn formata_data_preenchida() {
        let d = data(2025, 3, 7, 14, 5, 0);
        assert_eq!(formatar_data(Some(&d)), "07/03/2025 14:05");
    }

    #[test]
    fn data_ausente_vira_aguardando() {
        assert_eq!(formatar_data(None), "Aguardando...");
    }

    #[test]
    fn tempo_total_horas_e_minutos() {
        let inicio = data(2025, 1, 1, 10, 0, 0);
        let fim = data(2025, 1, 1, 12, 30, 0);
        assert_eq!(formatar_tempo_total(&inicio, &fim), "2 h 30 m");
    }

    #[test]
    fn tempo_total_com_dias_e_segundos() {
        let inicio = data(2025, 1, 1, 0, 0, 0);
        let fim = data(2025, 1, 2, 1, 0, 45);
        assert_eq!(formatar_tempo_total(&inicio, &fim), "1 d 1 h 45 s");
    }

    #[test]
    fn tempo_total_zerado() {
        let instante = data(2025, 1, 1, 8, 0, 0);
        assert_eq!(formatar_tempo_total(&instante, &instante), "0 s");
    }

    #[test]
    fn tempo_total_negativo_vira_traco() {
        let inicio = data(2025, 1, 2, 0, 0, 0);
        let fim = data(2025, 1, 1, 0, 0, 0);
        assert_eq!(formatar_tempo_total(&inicio, &fim), "-");
    }

    #[test]
    fn normaliza_acentos_e_caixa() {
        assert_eq!(normalizar_busca("  Botijão P13 "), "botijao p13");
        assert_eq!(normalizar_busca("ÁGUA Mineral"), "agua mineral");
        assert_eq!(normalizar_busca("Gás"), "gas");
    }
}

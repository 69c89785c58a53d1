// src/models/cliente.rs

use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

use crate::models::entrega::StatusPedido;

// Linha mínima de `entregas` usada na consolidação de clientes.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ClienteOrigem {
    pub id: i32,
    pub nome_cliente: Option<String>,
    pub telefone_cliente: Option<String>,
    pub bairro: Option<String>,
    pub cidade: Option<String>,
    pub status_pedido: String,
}

// Cliente não é tabela: é o agrupamento das entregas por (nome, telefone).
// O id apresentado é o MAIOR id de entrega do grupo, que também fornece
// bairro e cidade.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClienteConsolidado {
    pub id: i32,
    pub nome_cliente: String,
    pub bairro: Option<String>,
    pub cidade: Option<String>,
    pub telefone_cliente: Option<String>,
    pub total_pedidos_entregues: i64,
}

// Agrupa as entregas por (nome, telefone) normalizados com trim.
// Entregas sem nome de cliente ficam de fora. Resultado ordenado do
// grupo mais recente para o mais antigo.
pub fn consolidar_clientes(registros: &[ClienteOrigem]) -> Vec<ClienteConsolidado> {
    let mut grupos: HashMap<(String, String), ClienteConsolidado> = HashMap::new();

    for registro in registros {
        let nome = match registro.nome_cliente.as_deref().map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => continue,
        };
        let telefone = registro
            .telefone_cliente
            .as_deref()
            .map(str::trim)
            .unwrap_or("")
            .to_string();

        let entregue = StatusPedido::parse(&registro.status_pedido)
            == Some(StatusPedido::Entregue);

        let chave = (nome.clone(), telefone.clone());
        match grupos.get_mut(&chave) {
            Some(grupo) => {
                if entregue {
                    grupo.total_pedidos_entregues += 1;
                }
                // Representante é sempre a entrega de maior id
                if registro.id > grupo.id {
                    grupo.id = registro.id;
                    grupo.bairro = registro.bairro.clone();
                    grupo.cidade = registro.cidade.clone();
                }
            }
            None => {
                grupos.insert(
                    chave,
                    ClienteConsolidado {
                        id: registro.id,
                        nome_cliente: nome,
                        bairro: registro.bairro.clone(),
                        cidade: registro.cidade.clone(),
                        telefone_cliente: if telefone.is_empty() {
                            None
                        } else {
                            Some(telefone)
                        },
                        total_pedidos_entregues: i64::from(entregue),
                    },
                );
            }
        }
    }

    let mut clientes: Vec<ClienteConsolidado> = grupos.into_values().collect();
    clientes.sort_by(|a, b| b.id.cmp(&a.id));
    clientes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origem(id: i32, nome: &str, telefone: &str, status: &str) -> ClienteOrigem {
        ClienteOrigem {
            id,
            nome_cliente: Some(nome.to_string()),
            telefone_cliente: if telefone.is_empty() {
                None
            } else {
                Some(telefone.to_string())
            },
            bairro: Some(format!("Bairro {id}")),
            cidade: Some("São Paulo".to_string()),
            status_pedido: status.to_string(),
        }
    }

    #[test]
    fn agrupa_por_nome_e_telefone_com_trim() {
        let registros = vec![
            origem(1, "Maria", "1199999", "entregue"),
            ClienteOrigem {
                nome_cliente: Some("  Maria  ".to_string()),
                telefone_cliente: Some(" 1199999 ".to_string()),
                ..origem(2, "Maria", "1199999", "Entregue")
            },
            origem(3, "Maria", "1188888", "entregue"),
        ];

        let clientes = consolidar_clientes(&registros);
        assert_eq!(clientes.len(), 2);

        let maria_principal = clientes
            .iter()
            .find(|c| c.telefone_cliente.as_deref() == Some("1199999"))
            .unwrap();
        assert_eq!(maria_principal.total_pedidos_entregues, 2);
        assert_eq!(maria_principal.id, 2);
    }

    #[test]
    fn conta_apenas_status_entregue_ignorando_caixa() {
        let registros = vec![
            origem(1, "João", "111", "Entregue"),
            origem(2, "João", "111", "FINALIZADA"),
            origem(3, "João", "111", "cancelado"),
            origem(4, "João", "111", "pendente"),
        ];

        let clientes = consolidar_clientes(&registros);
        assert_eq!(clientes.len(), 1);
        assert_eq!(clientes[0].total_pedidos_entregues, 2);
        // Maior id representa o grupo, mesmo sem ser entrega concluída
        assert_eq!(clientes[0].id, 4);
        assert_eq!(clientes[0].bairro.as_deref(), Some("Bairro 4"));
    }

    #[test]
    fn entregas_sem_nome_ficam_de_fora() {
        let registros = vec![
            ClienteOrigem {
                nome_cliente: None,
                ..origem(1, "", "111", "entregue")
            },
            ClienteOrigem {
                nome_cliente: Some("   ".to_string()),
                ..origem(2, "", "111", "entregue")
            },
            origem(3, "Ana", "", "entregue"),
        ];

        let clientes = consolidar_clientes(&registros);
        assert_eq!(clientes.len(), 1);
        assert_eq!(clientes[0].nome_cliente, "Ana");
        assert_eq!(clientes[0].telefone_cliente, None);
    }

    #[test]
    fn consolidacao_e_idempotente() {
        let registros = vec![
            origem(1, "Maria", "111", "entregue"),
            origem(2, "João", "222", "cancelado"),
            origem(3, "Maria", "111", "entregue"),
        ];

        let primeira = consolidar_clientes(&registros);
        let segunda = consolidar_clientes(&registros);

        assert_eq!(primeira.len(), segunda.len());
        for (a, b) in primeira.iter().zip(segunda.iter()) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.nome_cliente, b.nome_cliente);
            assert_eq!(a.total_pedidos_entregues, b.total_pedidos_entregues);
        }
    }

    #[test]
    fn ordena_do_grupo_mais_recente_para_o_mais_antigo() {
        let registros = vec![
            origem(10, "Ana", "1", "pendente"),
            origem(5, "Bia", "2", "pendente"),
            origem(20, "Carla", "3", "pendente"),
        ];

        let clientes = consolidar_clientes(&registros);
        let ids: Vec<i32> = clientes.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![20, 10, 5]);
    }
}

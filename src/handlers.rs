pub mod auth;
pub mod clientes;
pub mod configuracoes;
pub mod entregadores;
pub mod entregas;
pub mod metricas;
pub mod produtos;
pub mod usuarios;

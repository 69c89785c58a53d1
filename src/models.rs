pub mod auth;
pub mod cliente;
pub mod configuracao;
pub mod entrega;
pub mod entregador;
pub mod metricas;
pub mod produto;

pub mod auth;
pub mod entrega_service;
pub mod notificacao;

pub mod entrega_repo;
pub use entrega_repo::EntregaRepository;
pub mod entregador_repo;
pub use entregador_repo::EntregadorRepository;
pub mod produto_repo;
pub use produto_repo::ProdutoRepository;
pub mod cliente_repo;
pub use cliente_repo::ClienteRepository;
pub mod usuario_repo;
pub use usuario_repo::UsuarioRepository;
pub mod configuracao_repo;
pub use configuracao_repo::ConfiguracaoRepository;
pub mod metricas_repo;
pub use metricas_repo::MetricasRepository;

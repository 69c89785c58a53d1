// src/services/auth.rs

use bcrypt::{hash, verify};

use crate::{common::error::AppError, db::UsuarioRepository, models::auth::Usuario};

#[derive(Clone)]
pub struct AuthService {
    usuario_repo: UsuarioRepository,
}

impl AuthService {
    pub fn new(usuario_repo: UsuarioRepository) -> Self {
        Self { usuario_repo }
    }

    pub async fn login(&self, email: &str, senha: &str) -> Result<Usuario, AppError> {
        let usuario = self
            .usuario_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::CredenciaisInvalidas)?;

        // Conta inativa responde igual a senha errada; não vaza que existe.
        if !usuario.is_active {
            return Err(AppError::CredenciaisInvalidas);
        }

        let hash_gravado = usuario
            .password_hash
            .clone()
            .ok_or(AppError::CredenciaisInvalidas)?;

        let senha_clone = senha.to_owned();

        // Executa a verificação em um thread separado
        let senha_confere = tokio::task::spawn_blocking(move || verify(&senha_clone, &hash_gravado))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))?
            // Hash ilegível no banco conta como credencial ruim, não como 500
            .unwrap_or(false);

        if !senha_confere {
            return Err(AppError::CredenciaisInvalidas);
        }

        Ok(usuario)
    }

    pub async fn hash_senha(&self, senha: &str) -> Result<String, AppError> {
        let senha_clone = senha.to_owned();
        let hash_gerado =
            tokio::task::spawn_blocking(move || hash(&senha_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
        Ok(hash_gerado)
    }

    // Garante um admin para o primeiro acesso; se o e-mail já existe,
    // não mexe em nada (nem na senha).
    pub async fn garantir_admin(&self, email: &str, senha: &str) -> Result<(), AppError> {
        if self.usuario_repo.find_by_email(email).await?.is_some() {
            return Ok(());
        }

        let hash_gerado = self.hash_senha(senha).await?;
        self.usuario_repo
            .create(
                &email.to_lowercase(),
                Some("Administrador"),
                "admin",
                true,
                &hash_gerado,
            )
            .await?;

        tracing::info!("👤 Usuário admin inicial criado: {}", email);
        Ok(())
    }
}

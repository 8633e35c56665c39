use thiserror::Error;
use warden_core::{StoreError, UserStore};
use warden_crypto::{hash_password, verify_password, KdfParams, PasswordError};

/// Authenticated caller, attached to request extensions by the basic auth
/// middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
    pub name: String,
    pub roles: Vec<String>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid_credentials")]
    InvalidCredentials,
    #[error("verification failed: {0}")]
    Verification(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Checks `password` against the stored hash of `name`.
///
/// Unknown users and wrong passwords are indistinguishable to the caller,
/// including in timing: an unknown login still pays one `kdf` hash.
pub async fn authenticate<S>(
    store: &S,
    kdf: KdfParams,
    name: &str,
    password: &str,
) -> Result<Principal, AuthError>
where
    S: UserStore + ?Sized,
{
    let Some(credentials) = store.find_credentials(name).await? else {
        spend_kdf_cost(kdf, password).await;
        return Err(AuthError::InvalidCredentials);
    };

    let stored = credentials.password_hash;
    let candidate = password.to_string();
    let verified = tokio::task::spawn_blocking(move || verify_password(&stored, &candidate))
        .await
        .map_err(|err| AuthError::Verification(err.to_string()))?;
    match verified {
        Ok(true) => {}
        Ok(false) => return Err(AuthError::InvalidCredentials),
        Err(err @ PasswordError::MalformedHash(_)) => {
            tracing::error!(
                event = "credential_malformed",
                user_id = credentials.user_id,
                error = %err,
                "Stored password hash cannot be parsed"
            );
            return Err(AuthError::Verification(err.to_string()));
        }
        Err(err) => return Err(AuthError::Verification(err.to_string())),
    }

    let user = store
        .find_by_name(&credentials.name)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;
    Ok(Principal {
        user_id: user.id,
        name: user.name.clone(),
        roles: user.role_names().into_iter().map(str::to_string).collect(),
    })
}

async fn spend_kdf_cost(kdf: KdfParams, password: &str) {
    let candidate = password.to_string();
    let outcome = tokio::task::spawn_blocking(move || hash_password(&candidate, &kdf)).await;
    if let Ok(Err(err)) = outcome {
        tracing::debug!(event = "decoy_hash_failed", error = %err);
    }
}

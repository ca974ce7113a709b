use crate::{api, api::handlers::auth::AuthConfig, cli::actions::Action};
use anyhow::Result;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            dsn,
            secret_key,
            totp_issuer,
            frontend_url,
            session_ttl_seconds,
        } => {
            let auth_config = AuthConfig::new(secret_key, frontend_url)
                .with_session_ttl_seconds(session_ttl_seconds)
                .with_totp_issuer(totp_issuer);

            api::new(port, dsn, auth_config).await?;
        }
    }

    Ok(())
}

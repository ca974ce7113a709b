pub mod server;

use secrecy::SecretString;

/// Actions the CLI can dispatch.
#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        dsn: String,
        secret_key: SecretString,
        totp_issuer: String,
        frontend_url: String,
        session_ttl_seconds: u64,
    },
}

use utoipa::openapi::{Contact, InfoBuilder, License};
use utoipa::OpenApi;

use super::handlers::auth::types::{
    LoginRequest, LoginResponse, MessageResponse, ProfileResponse, RegisterRequest,
    TotpConfirmRequest, TotpDisableRequest, TotpSetupRequest, TotpSetupResponse,
    TotpStatusResponse, UpdatePasswordRequest, UpdateProfileRequest, VerifyTotpRequest,
};
use super::handlers::{auth, health, me};

/// OpenAPI document for every served route.
///
/// Add new endpoints here so they show up in `/docs`.
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        auth::register::register,
        auth::login::login,
        auth::login::verify_totp,
        auth::session::logout,
        me::profile,
        me::update_profile,
        me::update_password,
        auth::totp::totp_setup,
        auth::totp::totp_confirm,
        auth::totp::totp_disable,
        auth::totp::totp_status,
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        LoginResponse,
        VerifyTotpRequest,
        ProfileResponse,
        UpdateProfileRequest,
        UpdatePasswordRequest,
        TotpSetupRequest,
        TotpSetupResponse,
        TotpConfirmRequest,
        TotpDisableRequest,
        TotpStatusResponse,
        MessageResponse,
    )),
    tags(
        (name = "farmgate", description = "Service health and metadata"),
        (name = "auth", description = "Registration, login, and session lifecycle"),
        (name = "user", description = "Profile and password management"),
        (name = "2fa", description = "Two-factor enrollment and verification"),
    )
)]
pub struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    // Use Cargo.toml metadata instead of the derive defaults.
    let mut spec = ApiDoc::openapi();

    let mut info = InfoBuilder::new()
        .title(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .description(optional_str(env!("CARGO_PKG_DESCRIPTION")))
        .build();
    info.contact = cargo_contact();
    info.license = cargo_license();
    spec.info = info;

    spec
}

fn cargo_contact() -> Option<Contact> {
    // Cargo authors are `;` separated and may include "Name <email>".
    let authors = env!("CARGO_PKG_AUTHORS");
    let primary = authors.split(';').next().map(str::trim)?;
    if primary.is_empty() {
        return None;
    }

    let (name, email) = parse_author(primary);
    if name.is_none() && email.is_none() {
        return None;
    }

    let mut contact = Contact::new();
    contact.name = name.map(str::to_string);
    contact.email = email.map(str::to_string);
    Some(contact)
}

fn cargo_license() -> Option<License> {
    let identifier = optional_str(env!("CARGO_PKG_LICENSE"))?;
    let mut license = License::new(identifier);
    license.identifier = Some(identifier.to_string());
    Some(license)
}

fn optional_str(value: &'static str) -> Option<&'static str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn parse_author(author: &str) -> (Option<&str>, Option<&str>) {
    if let Some(start) = author.find('<') {
        let name = author[..start].trim();
        let email = author[start + 1..].trim_end_matches('>').trim();
        let name = if name.is_empty() { None } else { Some(name) };
        let email = if email.is_empty() { None } else { Some(email) };
        (name, email)
    } else {
        let name = author.trim();
        (if name.is_empty() { None } else { Some(name) }, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_info_from_cargo() {
        let spec = openapi();
        assert_eq!(spec.info.title, env!("CARGO_PKG_NAME"));
        assert_eq!(spec.info.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(
            spec.info.description.as_deref(),
            Some(env!("CARGO_PKG_DESCRIPTION"))
        );

        let contact = spec.info.contact;
        assert!(contact.is_some());
        if let Some(contact) = contact {
            assert_eq!(contact.name.as_deref(), Some("Digital Farm Team"));
            assert_eq!(contact.email.as_deref(), Some("platform@digitalfarm.dev"));
        }

        let license = spec.info.license;
        assert!(license.is_some());
        if let Some(license) = license {
            assert_eq!(license.name, "BSD-3-Clause");
            assert_eq!(license.identifier.as_deref(), Some("BSD-3-Clause"));
        }
    }

    #[test]
    fn openapi_tags_and_paths() {
        let spec = openapi();
        let tags = spec.tags.clone().unwrap_or_default();
        assert!(tags.iter().any(|tag| tag.name == "auth"));
        assert!(tags.iter().any(|tag| tag.name == "2fa"));
        assert!(spec.paths.paths.contains_key("/auth/login"));
        assert!(spec.paths.paths.contains_key("/auth/verify-totp"));
        assert!(spec.paths.paths.contains_key("/totp/disable"));
        assert!(spec.paths.paths.contains_key("/user/password"));
    }
}

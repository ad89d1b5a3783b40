//! Canonical actor IRIs.
//!
//! Identities map to actor IRIs of the form
//! `https://{domain}/members/{name}`, and back. The mapping is pure:
//! no lookup, no network.

use shelfmark_common::{AppError, AppResult, Identity};
use url::Url;

const MEMBER_PATH: &str = "/members/";

/// Canonical actor IRI for an identity.
pub fn actor_iri(identity: &Identity) -> AppResult<Url> {
    Url::parse(&format!(
        "https://{}{}{}",
        identity.domain(),
        MEMBER_PATH,
        identity.name()
    ))
    .map_err(|e| AppError::InvalidInput(format!("Cannot build actor IRI for {identity}: {e}")))
}

/// Recover the identity from a canonical actor IRI.
///
/// Rejects IRIs that do not follow the member path convention; the
/// identity rules then reject anything that is not a normalized
/// `name@domain`.
pub fn identity_from_iri(iri: &Url) -> AppResult<Identity> {
    let host = iri
        .host_str()
        .ok_or_else(|| AppError::InvalidInput(format!("Actor IRI has no host: {iri}")))?;

    let domain = match iri.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };

    let name = iri
        .path()
        .strip_prefix(MEMBER_PATH)
        .ok_or_else(|| AppError::InvalidInput(format!("Not a member IRI: {iri}")))?;

    if name.is_empty() || name.contains('/') {
        return Err(AppError::InvalidInput(format!("Not a member IRI: {iri}")));
    }

    Identity::from_parts(name, &domain)
}

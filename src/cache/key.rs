//! Cache Key Strategy
//!
//! Builds stable cache keys from an entity id plus a fingerprint of the
//! observation set, so entries are implicitly invalidated when the
//! observations behind a generation change.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use sha2::{Digest, Sha256};

use crate::models::Observation;

// == Constants ==
/// Fingerprint segment used when no observations are supplied.
///
/// A fixed literal rather than an empty string, so a request with no
/// observations cannot collide with degenerate encodings of an emptied
/// collection.
pub const EMPTY_FINGERPRINT: &str = "default";

/// Length of the encoded fingerprint segment.
pub const FINGERPRINT_LEN: usize = 16;

// == Build Key ==
/// Builds a cache key of the form `{namespace}:{entity_id}:{fingerprint}`.
///
/// Two calls with the same entity and a structurally equal, identically
/// ordered observation set produce the same key in every process. Any
/// change to an observation's id or volatile fields produces a different
/// key with overwhelming probability.
pub fn build_key(namespace: &str, entity_id: &str, observations: &[Observation]) -> String {
    format!(
        "{}:{}:{}",
        namespace,
        entity_id,
        fingerprint(observations)
    )
}

// == Entity Prefix ==
/// Prefix shared by every key of one entity within a namespace.
///
/// Used by the store's `invalidate` to drop all fingerprint-distinct
/// entries of a single entity at once.
pub fn entity_prefix(namespace: &str, entity_id: &str) -> String {
    format!("{}:{}:", namespace, entity_id)
}

// == Fingerprint ==
/// Derives a short deterministic fingerprint from the observation set.
///
/// Projects each observation to `id|status|updated_at`, joins the
/// projections in order, hashes the result and encodes a fixed-length
/// prefix. The truncation is an accepted collision trade-off; this is a
/// cache key, not a content address.
pub fn fingerprint(observations: &[Observation]) -> String {
    if observations.is_empty() {
        return EMPTY_FINGERPRINT.to_string();
    }

    let joined = observations
        .iter()
        .map(|obs| format!("{}|{}|{}", obs.id, obs.status, obs.updated_at))
        .collect::<Vec<_>>()
        .join(";");

    let digest = Sha256::digest(joined.as_bytes());
    let encoded = URL_SAFE_NO_PAD.encode(digest);
    encoded.chars().take(FINGERPRINT_LEN).collect()
}

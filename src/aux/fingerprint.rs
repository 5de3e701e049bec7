//! Content fingerprinting and name sanitization shared by every auxiliary file kind (spec §4.4).

use sha2::{Digest, Sha256};

/// SHA-256 digest of `content`, hex-encoded, matching the fingerprint format the Dataplane API
/// reports for SSL certificates when it exposes one at all.
pub(crate) fn fingerprint(content: &[u8]) -> String {
    let digest = Sha256::digest(content);
    hex::encode(digest)
}

/// Replaces characters the Dataplane API rejects in a certificate storage name (e.g. `.`) with
/// `_`, applied identically on both sides of a comparison so sanitized current state lines up
/// with a sanitized desired path (spec §4.4, §6).
pub(crate) fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sanitizes_dots_and_slashes() {
        assert_eq!(sanitize_name("wildcard.example.com.pem"), "wildcard_example_com_pem");
        assert_eq!(sanitize_name("certs/api.crt"), "certs_api_crt");
    }

    #[test]
    fn fingerprint_is_stable_for_identical_content() {
        let a = fingerprint(b"hello");
        let b = fingerprint(b"hello");
        assert_eq!(a, b);
        assert_ne!(a, fingerprint(b"world"));
    }
}

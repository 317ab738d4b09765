use md5::{Digest, Md5};

/// Deterministic Gravatar URL for an email address: 200px, PG-rated, with
/// the "mystery man" fallback. Gravatar keys on the MD5 of the lowercased
/// address, so the same email always maps to the same avatar.
pub fn gravatar_url(email: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(email.trim().to_lowercase().as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("https://www.gravatar.com/avatar/{digest}?s=200&r=pg&d=mm")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_address_hashes_to_known_url() {
        assert_eq!(
            gravatar_url("test@example.com"),
            "https://www.gravatar.com/avatar/55502f40dc8b7c769880b10874abc9d0?s=200&r=pg&d=mm"
        );
    }

    #[test]
    fn case_and_whitespace_do_not_change_the_avatar() {
        assert_eq!(
            gravatar_url("  Test@Example.COM "),
            gravatar_url("test@example.com")
        );
    }
}

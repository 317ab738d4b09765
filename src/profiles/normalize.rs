use url::Url;

use crate::profiles::dto::SkillsInput;

/// Canonical HTTPS form of a user-supplied link. Empty input passes
/// through unchanged; a bare host gains an `https://` scheme; plain HTTP
/// is upgraded. Input that still fails to parse is returned as-is rather
/// than rejected, matching the lenient handling of the profile form.
pub fn canonical_url(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }

    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    };

    match Url::parse(&candidate) {
        Ok(mut url) => {
            if url.scheme() == "http" {
                let _ = url.set_scheme("https");
            }
            let mut out = url.to_string();
            // Url prints a bare origin with a trailing slash; drop it so
            // "example.com" round-trips to "https://example.com".
            if url.path() == "/" && url.query().is_none() && url.fragment().is_none() {
                out.truncate(out.len() - 1);
            }
            out
        }
        Err(_) => candidate,
    }
}

/// Ordered, trimmed, non-empty skill list from either wire shape.
pub fn skill_list(input: SkillsInput) -> Vec<String> {
    let parts = match input {
        SkillsInput::List(items) => items,
        SkillsInput::Csv(raw) => raw.split(',').map(str::to_string).collect(),
    };
    parts
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

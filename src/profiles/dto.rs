use serde::Deserialize;

/// Skills arrive either pre-split or as one comma-delimited string; both
/// normalize to the same ordered list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SkillsInput {
    List(Vec<String>),
    Csv(String),
}

impl Default for SkillsInput {
    fn default() -> Self {
        SkillsInput::Csv(String::new())
    }
}

/// Create-or-replace payload for the caller's profile. Every field left
/// out of the request body is reset to its default in the stored profile;
/// this endpoint replaces, it does not merge. Embedded experience and
/// education lists are managed by their own endpoints and are untouched.
#[derive(Debug, Deserialize)]
pub struct UpsertProfileRequest {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, alias = "githubusername")]
    pub github_username: String,
    #[serde(default)]
    pub skills: SkillsInput,
    #[serde(default)]
    pub youtube: String,
    #[serde(default)]
    pub twitter: String,
    #[serde(default)]
    pub instagram: String,
    #[serde(default)]
    pub linkedin: String,
    #[serde(default)]
    pub facebook: String,
}

#[derive(Debug, Deserialize)]
pub struct ExperienceRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct EducationRequest {
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub fieldofstudy: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub description: String,
}

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Social links live embedded in the profile row; an absent platform is an
/// empty string, mirroring the form fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocialLinks {
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

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub id: Uuid, // assigned server-side on insert
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: String,
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EducationEntry {
    pub id: Uuid,
    pub school: String,
    pub degree: String,
    pub fieldofstudy: String,
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub description: String,
}

/// Profile record; one row per user. Skills and the embedded lists are
/// JSONB columns, ordered most-recent-first for experience/education.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company: String,
    pub location: String,
    pub website: String,
    pub bio: String,
    pub status: String,
    pub github_username: String,
    pub skills: Json<Vec<String>>,
    pub social: Json<SocialLinks>,
    pub experience: Json<Vec<ExperienceEntry>>,
    pub education: Json<Vec<EducationEntry>>,
    pub updated_at: OffsetDateTime,
}

/// Profile joined with the owner's public identity.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProfileWithUser {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub profile: Profile,
    pub name: String,
    pub avatar_url: String,
}

/// Replaceable portion of a profile, already validated and normalized.
/// `Profile::upsert` writes every one of these fields, so anything the
/// caller omitted arrives here as its default and overwrites the stored
/// value (replace, not merge).
#[derive(Debug, Clone)]
pub struct ProfileFields {
    pub company: String,
    pub location: String,
    pub website: String,
    pub bio: String,
    pub status: String,
    pub github_username: String,
    pub skills: Vec<String>,
    pub social: SocialLinks,
}

const PROFILE_COLUMNS: &str = "id, user_id, company, location, website, bio, status, \
     github_username, skills, social, experience, education, updated_at";

impl Profile {
    pub async fn find_by_user(db: &PgPool, user_id: Uuid) -> sqlx::Result<Option<Profile>> {
        sqlx::query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(db)
        .await
    }

    pub async fn find_with_user(
        db: &PgPool,
        user_id: Uuid,
    ) -> sqlx::Result<Option<ProfileWithUser>> {
        sqlx::query_as::<_, ProfileWithUser>(
            r#"
            SELECT p.id, p.user_id, p.company, p.location, p.website, p.bio, p.status,
                   p.github_username, p.skills, p.social, p.experience, p.education,
                   p.updated_at, u.name, u.avatar_url
            FROM profiles p
            JOIN users u ON u.id = p.user_id
            WHERE p.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await
    }

    pub async fn list_with_users(db: &PgPool) -> sqlx::Result<Vec<ProfileWithUser>> {
        sqlx::query_as::<_, ProfileWithUser>(
            r#"
            SELECT p.id, p.user_id, p.company, p.location, p.website, p.bio, p.status,
                   p.github_username, p.skills, p.social, p.experience, p.education,
                   p.updated_at, u.name, u.avatar_url
            FROM profiles p
            JOIN users u ON u.id = p.user_id
            ORDER BY p.updated_at DESC
            "#,
        )
        .fetch_all(db)
        .await
    }

    /// Create-or-replace keyed on user_id. A single statement, so repeated
    /// calls with identical fields converge on the same row. Experience
    /// and education columns are not listed in the update and survive.
    pub async fn upsert(
        db: &PgPool,
        user_id: Uuid,
        fields: &ProfileFields,
    ) -> sqlx::Result<Profile> {
        sqlx::query_as::<_, Profile>(&format!(
            r#"
            INSERT INTO profiles
                (user_id, company, location, website, bio, status, github_username, skills, social)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (user_id) DO UPDATE SET
                company = EXCLUDED.company,
                location = EXCLUDED.location,
                website = EXCLUDED.website,
                bio = EXCLUDED.bio,
                status = EXCLUDED.status,
                github_username = EXCLUDED.github_username,
                skills = EXCLUDED.skills,
                social = EXCLUDED.social,
                updated_at = now()
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(&fields.company)
        .bind(&fields.location)
        .bind(&fields.website)
        .bind(&fields.bio)
        .bind(&fields.status)
        .bind(&fields.github_username)
        .bind(Json(&fields.skills))
        .bind(Json(&fields.social))
        .fetch_one(db)
        .await
    }

    /// Prepend one entry atomically; the list stays most-recent-first.
    /// Returns None when the user has no profile.
    pub async fn prepend_experience(
        db: &PgPool,
        user_id: Uuid,
        entry: &ExperienceEntry,
    ) -> sqlx::Result<Option<Profile>> {
        sqlx::query_as::<_, Profile>(&format!(
            r#"
            UPDATE profiles
            SET experience = $2::jsonb || experience, updated_at = now()
            WHERE user_id = $1
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(Json(std::slice::from_ref(entry)))
        .fetch_optional(db)
        .await
    }

    pub async fn prepend_education(
        db: &PgPool,
        user_id: Uuid,
        entry: &EducationEntry,
    ) -> sqlx::Result<Option<Profile>> {
        sqlx::query_as::<_, Profile>(&format!(
            r#"
            UPDATE profiles
            SET education = $2::jsonb || education, updated_at = now()
            WHERE user_id = $1
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(Json(std::slice::from_ref(entry)))
        .fetch_optional(db)
        .await
    }

    pub async fn replace_experience(
        db: &PgPool,
        user_id: Uuid,
        entries: &[ExperienceEntry],
    ) -> sqlx::Result<Option<Profile>> {
        sqlx::query_as::<_, Profile>(&format!(
            r#"
            UPDATE profiles
            SET experience = $2, updated_at = now()
            WHERE user_id = $1
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(Json(entries))
        .fetch_optional(db)
        .await
    }

    pub async fn replace_education(
        db: &PgPool,
        user_id: Uuid,
        entries: &[EducationEntry],
    ) -> sqlx::Result<Option<Profile>> {
        sqlx::query_as::<_, Profile>(&format!(
            r#"
            UPDATE profiles
            SET education = $2, updated_at = now()
            WHERE user_id = $1
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(Json(entries))
        .fetch_optional(db)
        .await
    }

    /// Idempotent, like `User::delete`.
    pub async fn delete_by_user(db: &PgPool, user_id: Uuid) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str) -> ExperienceEntry {
        ExperienceEntry {
            id: Uuid::new_v4(),
            title: title.into(),
            company: "Acme".into(),
            location: String::new(),
            from: "2020-01-01".into(),
            to: String::new(),
            current: true,
            description: String::new(),
        }
    }

    #[test]
    fn profile_serializes_embedded_lists_transparently() {
        let profile = Profile {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            company: "Acme".into(),
            location: "Berlin".into(),
            website: "https://example.com".into(),
            bio: String::new(),
            status: "Developer".into(),
            github_username: "octocat".into(),
            skills: Json(vec!["rust".into(), "sql".into()]),
            social: Json(SocialLinks::default()),
            experience: Json(vec![entry("Engineer")]),
            education: Json(Vec::new()),
            updated_at: OffsetDateTime::UNIX_EPOCH,
        };
        let value = serde_json::to_value(&profile).expect("serialize");
        assert_eq!(value["skills"], serde_json::json!(["rust", "sql"]));
        assert_eq!(value["experience"][0]["title"], "Engineer");
        assert_eq!(value["social"]["youtube"], "");
    }

    #[test]
    fn entry_roundtrips_with_its_id() {
        let original = entry("Engineer");
        let json = serde_json::to_string(&original).expect("serialize");
        let back: ExperienceEntry = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.id, original.id);
        assert_eq!(back.title, "Engineer");
        assert!(back.current);
    }
}

use serde::{Deserialize, Deserializer, Serialize};

/// The backend serializes some ids as JSON strings and others as raw
/// integers depending on the route. Normalize everything to `String`.
fn de_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

fn de_id_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    let raw = Vec::<Raw>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|r| match r {
            Raw::Text(s) => s,
            Raw::Number(n) => n.to_string(),
        })
        .collect())
}

fn de_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|r| match r {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    }))
}

/// The authenticated user as the backend reports them. Cleared on logout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default, deserialize_with = "de_id_vec")]
    pub enrolled_courses: Vec<String>,
    #[serde(default)]
    pub karma: i64,
}

impl Identity {
    pub fn is_enrolled(&self, course_id: &str) -> bool {
        self.enrolled_courses.iter().any(|c| c == course_id)
    }
}

/// Another user's public profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub karma: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(deserialize_with = "de_id", alias = "user_id")]
    pub user_id: String,
    #[serde(deserialize_with = "de_id")]
    pub course_id: String,
    pub content: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub likes: i64,
    #[serde(default)]
    pub is_liked: bool,
    // Older routes still emit `timestamp` instead of `createdAt`.
    #[serde(default, alias = "timestamp")]
    pub created_at: String,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(deserialize_with = "de_id", alias = "user_id")]
    pub user_id: String,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub post_id: Option<String>,
    pub content: String,
    #[serde(default, alias = "timestamp")]
    pub created_at: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub likes: i64,
}

/// The authoritative like state returned by a like toggle. Applied to the
/// feed as an unconditional overwrite, never as a local increment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResult {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub likes: i64,
    pub is_liked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub instructor: String,
    #[serde(default, deserialize_with = "de_id_vec")]
    pub enrolled_students: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub participant: Participant,
    #[serde(default)]
    pub last_message: Option<LastMessage>,
    #[serde(default)]
    pub unread_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

/// Preview of the newest message in a chat listing. All fields may be null
/// for a chat with no traffic yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub sender_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub content: String,
    #[serde(deserialize_with = "de_id")]
    pub sender_id: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub sender_username: Option<String>,
    #[serde(default)]
    pub is_read: bool,
}

//! Blog records, create inputs and typed partial updates.

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::postgres::PgRow;
use std::fmt::Debug;

/// A record type persisted in one table and exposed under one route segment.
pub trait Resource:
    Serialize + for<'r> sqlx::FromRow<'r, PgRow> + Debug + Clone + Send + Sync + Unpin + 'static
{
    /// Body accepted by create (no id).
    type New: DeserializeOwned + Debug + Send + Sync + 'static;
    /// Body accepted by update (id plus changed fields).
    type Patch: DeserializeOwned + Debug + Send + Sync + 'static;

    /// Singular name used in error messages, e.g. "user".
    const NAME: &'static str;
    /// Table name, also the route segment.
    const TABLE: &'static str;

    fn id(&self) -> i32;

    /// Build the record the caller submitted once the store assigned an id.
    fn from_new(id: i32, new: Self::New) -> Self;
}

/// Deserialize a present field (including explicit `null`) as `Some(..)`.
/// Combined with `#[serde(default)]`, an absent field stays `None`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// `TIMESTAMP` values on the wire: written as RFC 3339 in UTC (`...Z`), read from
/// RFC 3339 with any offset (normalized to UTC) or a bare `YYYY-MM-DDTHH:MM:SS`.
pub mod utc_timestamp {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
        DateTime::parse_from_rfc3339(raw)
            .map(|t| t.naive_utc())
            .or_else(|_| raw.parse::<NaiveDateTime>())
    }

    pub fn format(t: &NaiveDateTime) -> String {
        t.and_utc().to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(t) => serializer.serialize_some(&format(t)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| parse(&raw).map_err(de::Error::custom))
            .transpose()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    pub id: Option<i32>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Nullable columns: `Some(None)` writes NULL.
    #[serde(default, deserialize_with = "present")]
    pub first_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub last_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub is_active: Option<Option<bool>>,
}

impl Resource for User {
    type New = NewUser;
    type Patch = UserPatch;

    const NAME: &'static str = "user";
    const TABLE: &'static str = "users";

    fn id(&self) -> i32 {
        self.id
    }

    fn from_new(id: i32, new: NewUser) -> Self {
        User {
            id,
            username: new.username,
            password: new.password,
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            is_active: new.is_active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub body: String,
    pub user_id: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub user_id: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostPatch {
    pub id: Option<i32>,
    pub title: Option<String>,
    pub body: Option<String>,
    /// `Some(None)` clears the author.
    #[serde(default, deserialize_with = "present")]
    pub user_id: Option<Option<i32>>,
}

impl Resource for Post {
    type New = NewPost;
    type Patch = PostPatch;

    const NAME: &'static str = "post";
    const TABLE: &'static str = "posts";

    fn id(&self) -> i32 {
        self.id
    }

    fn from_new(id: i32, new: NewPost) -> Self {
        Post {
            id,
            title: new.title,
            body: new.body,
            user_id: new.user_id,
        }
    }
}

/// `date` is assigned by the database on insert; it is `None` in the
/// record returned by create and populated on every read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i32,
    #[serde(default, with = "utc_timestamp")]
    pub date: Option<NaiveDateTime>,
    pub body: String,
    pub user_id: Option<i32>,
    pub post_id: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewComment {
    pub body: String,
    pub user_id: Option<i32>,
    pub post_id: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentPatch {
    pub id: Option<i32>,
    #[serde(default, with = "utc_timestamp")]
    pub date: Option<NaiveDateTime>,
    pub body: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub user_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "present")]
    pub post_id: Option<Option<i32>>,
}

impl Resource for Comment {
    type New = NewComment;
    type Patch = CommentPatch;

    const NAME: &'static str = "comment";
    const TABLE: &'static str = "comments";

    fn id(&self) -> i32 {
        self.id
    }

    fn from_new(id: i32, new: NewComment) -> Self {
        Comment {
            id,
            date: None,
            body: new.body,
            user_id: new.user_id,
            post_id: new.post_id,
        }
    }
}

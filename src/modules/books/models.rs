use serde::{de::DeserializeOwned, Deserialize, Serialize};

type JsonObject = serde_json::Map<String, serde_json::Value>;

/// Store-assigned book identifier.
pub type BookId = i64;

/// One catalog record as persisted in the `books` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    /// Assigned by the store on insert, never by clients
    pub id: BookId,
    pub name: String,
    pub description: String,
    pub author: String,
}

impl Book {
    /// Replace all mutable fields; absent payload fields have already become empty.
    pub fn overwrite(&mut self, fields: BookFields) {
        self.name = fields.name;
        self.description = fields.description;
        self.author = fields.author;
    }

    /// Replace only the fields present in the patch.
    pub fn merge(&mut self, patch: BookPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(author) = patch.author {
            self.author = author;
        }
    }
}

/// Request body for create and full update.
///
/// Only a JSON object is accepted. Unknown keys, including a client-supplied
/// `id`, are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "JsonObject")]
pub struct BookFields {
    pub name: String,
    pub description: String,
    pub author: String,
}

impl TryFrom<JsonObject> for BookFields {
    type Error = serde_json::Error;

    fn try_from(mut object: JsonObject) -> Result<Self, Self::Error> {
        Ok(Self {
            name: take_field(&mut object, "name")?.unwrap_or_default(),
            description: take_field(&mut object, "description")?.unwrap_or_default(),
            author: take_field(&mut object, "author")?.unwrap_or_default(),
        })
    }
}

/// Request body for a partial update. Only a JSON object is accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "JsonObject")]
pub struct BookPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl TryFrom<JsonObject> for BookPatch {
    type Error = serde_json::Error;

    fn try_from(mut object: JsonObject) -> Result<Self, Self::Error> {
        Ok(Self {
            name: take_field::<Option<String>>(&mut object, "name")?.flatten(),
            description: take_field::<Option<String>>(&mut object, "description")?.flatten(),
            author: take_field::<Option<String>>(&mut object, "author")?.flatten(),
        })
    }
}

fn take_field<T: DeserializeOwned>(
    object: &mut JsonObject,
    key: &str,
) -> Result<Option<T>, serde_json::Error> {
    object.remove(key).map(serde_json::from_value).transpose()
}

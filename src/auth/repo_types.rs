use serde::{Deserialize, Serialize};

use super::password::Credential;

/// Stored user record. Salt and hash are base64 in the JSON file and are
/// never exposed through the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub user_name: String,
    #[serde(with = "base64_bytes")]
    pub password_salt: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub password_hash: Vec<u8>,
}

impl UserRecord {
    pub fn new(user_name: impl Into<String>, credential: Credential) -> Self {
        let Credential { salt, hash } = credential;
        Self {
            user_name: user_name.into(),
            password_salt: salt,
            password_hash: hash,
        }
    }
}

mod base64_bytes {
    use base64ct::{Base64, Encoding};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&Base64::encode_string(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(d)?;
        Base64::decode_vec(&encoded).map_err(serde::de::Error::custom)
    }
}

use serde::{Deserialize, Serialize};

/// An application account. Authentication itself lives with the identity
/// provider; this record only anchors usernames referenced by leaves and
/// holiday selections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub hashed_password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub hashed_password: String,
}

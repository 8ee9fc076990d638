use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Author of a message or context entry.
///
/// Persisted rows are only ever written as `user` or `assistant`; `system`
/// exists for the seed message at the head of the context window.  Parsing
/// also accepts the `ai` / `bot` / `model` spellings that older databases
/// contain for assistant rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[strum(serialize = "system")]
    System,
    #[strum(to_string = "user", serialize = "human")]
    User,
    #[strum(to_string = "assistant", serialize = "ai", serialize = "bot", serialize = "model")]
    Assistant,
}

/// A single row of the `messages` table.  Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub role: Role,
    pub content: String,
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn legacy_assistant_spellings_parse() {
        for raw in ["assistant", "ai", "bot", "model", "AI"] {
            assert_eq!(Role::from_str(raw).unwrap(), Role::Assistant, "{raw}");
        }
    }

    #[test]
    fn roles_display_canonical_names() {
        assert_eq!(Role::User.to_string(), "user");
        assert_eq!(Role::Assistant.to_string(), "assistant");
        assert_eq!(Role::System.to_string(), "system");
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(Role::from_str("narrator").is_err());
    }
}

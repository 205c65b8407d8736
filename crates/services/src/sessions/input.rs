use serde::{Deserialize, Serialize};

/// A user intent directed at the running session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SessionCommand {
    Reveal,
    /// `true` for "I knew it", `false` for "I didn't know".
    Assess(bool),
    SelectOption(String),
    Confirm,
    Advance,
}

/// Keyboard input a quiz screen forwards to the session.
///
/// Space and Enter reveal an open-recall answer, confirm a multiple-choice
/// pick, or advance past a graded one. The arrow keys self-assess (left:
/// didn't know, right: knew it). Digits pick the n-th option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKey {
    Space,
    Enter,
    ArrowLeft,
    ArrowRight,
    /// `1..=9`; `0` binds nothing.
    Digit(u8),
    Other,
}

impl SessionKey {
    /// Map a DOM-style key name (`" "`, `"Enter"`, `"ArrowLeft"`, `"3"`).
    #[must_use]
    pub fn from_key_name(name: &str) -> Self {
        match name {
            " " | "Space" | "Spacebar" => SessionKey::Space,
            "Enter" => SessionKey::Enter,
            "ArrowLeft" => SessionKey::ArrowLeft,
            "ArrowRight" => SessionKey::ArrowRight,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => c
                        .to_digit(10)
                        .and_then(|d| u8::try_from(d).ok())
                        .map_or(SessionKey::Other, SessionKey::Digit),
                    _ => SessionKey::Other,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_names_map_to_keys() {
        assert_eq!(SessionKey::from_key_name(" "), SessionKey::Space);
        assert_eq!(SessionKey::from_key_name("Enter"), SessionKey::Enter);
        assert_eq!(SessionKey::from_key_name("ArrowLeft"), SessionKey::ArrowLeft);
        assert_eq!(SessionKey::from_key_name("ArrowRight"), SessionKey::ArrowRight);
        assert_eq!(SessionKey::from_key_name("4"), SessionKey::Digit(4));
        assert_eq!(SessionKey::from_key_name("42"), SessionKey::Other);
        assert_eq!(SessionKey::from_key_name("x"), SessionKey::Other);
    }

    #[test]
    fn commands_serialize_tagged() {
        let json = serde_json::to_string(&SessionCommand::SelectOption("B".into())).unwrap();
        assert_eq!(json, r#"{"type":"select_option","value":"B"}"#);
        let back: SessionCommand = serde_json::from_str(r#"{"type":"reveal"}"#).unwrap();
        assert_eq!(back, SessionCommand::Reveal);
    }
}

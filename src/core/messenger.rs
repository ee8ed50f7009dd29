//! Outbound messaging abstractions

use crate::core::session::ChatId;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(pub i32);

/// What pressing a menu option means. Target options carry the source of the menu they
/// sit on, so a button always converts the pair it shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    Source(String),
    Target { source: String, target: String },
}

impl Display for MenuAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MenuAction::Source(code) => write!(f, "from:{code}"),
            MenuAction::Target { source, target } => write!(f, "to:{source}:{target}"),
        }
    }
}

impl FromStr for MenuAction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || anyhow!("Invalid menu action: {}", s);
        let parts: Vec<&str> = s.split(':').collect();
        if parts.iter().skip(1).any(|code| code.is_empty()) {
            return Err(invalid());
        }
        match parts.as_slice() {
            ["from", code] => Ok(MenuAction::Source(code.to_string())),
            ["to", source, target] => Ok(MenuAction::Target {
                source: source.to_string(),
                target: target.to_string(),
            }),
            _ => Err(invalid()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOption {
    pub label: String,
    pub action: MenuAction,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Menu {
    pub options: Vec<MenuOption>,
}

/// Everything the conversation needs from a chat transport.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send(&self, chat: ChatId, text: &str, menu: Option<&Menu>) -> Result<MessageId>;

    /// Replaces the text of a sent message. A `None` menu removes any existing one.
    async fn edit(
        &self,
        chat: ChatId,
        message: MessageId,
        text: &str,
        menu: Option<&Menu>,
    ) -> Result<()>;

    async fn delete(&self, chat: ChatId, message: MessageId) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_action_wire_form() {
        let target = MenuAction::Target {
            source: "USD".into(),
            target: "EUR".into(),
        };
        assert_eq!(MenuAction::Source("USD".into()).to_string(), "from:USD");
        assert_eq!(target.to_string(), "to:USD:EUR");

        assert_eq!(
            "from:KZT".parse::<MenuAction>().unwrap(),
            MenuAction::Source("KZT".into())
        );
        assert_eq!("to:USD:EUR".parse::<MenuAction>().unwrap(), target);
    }

    #[test]
    fn test_menu_action_rejects_garbage() {
        for input in [
            "", "from", "from:", "via:USD", "from_USD", "to:EUR", "to:USD:", "to::EUR",
            "from:USD:EUR", "to:USD:EUR:GBP",
        ] {
            let result = input.parse::<MenuAction>();
            assert!(result.is_err(), "expected error for {input:?}");
        }
    }
}

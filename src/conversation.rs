//! Per-user conversion dialogue: source → target → amount → result.

use anyhow::Result;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, info, instrument, warn};

use crate::core::currency::CurrencySet;
use crate::core::messenger::{MenuAction, MessageId, Messenger};
use crate::core::session::{Peer, Session, SessionState, SessionStore};
use crate::providers::RateResolver;
use crate::ui;

static AMOUNT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+(\.[0-9]+)?$").expect("amount pattern is valid"));

/// Parses a non-negative decimal amount such as `12.5`. Signs, exponents and digits
/// outside ASCII are rejected.
pub fn parse_amount(text: &str) -> Option<f64> {
    let text = text.trim();
    if !AMOUNT_PATTERN.is_match(text) {
        return None;
    }
    text.parse::<f64>().ok().filter(|amount| amount.is_finite())
}

/// An interaction delivered by the chat transport.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Start,
    /// A menu button was pressed on `message`.
    Select {
        action: MenuAction,
        message: MessageId,
    },
    Text(String),
}

pub struct Conversation {
    currencies: CurrencySet,
    resolver: RateResolver,
    sessions: SessionStore,
}

impl Conversation {
    pub fn new(currencies: CurrencySet, resolver: RateResolver) -> Self {
        Conversation {
            currencies,
            resolver,
            sessions: SessionStore::new(),
        }
    }

    pub fn currencies(&self) -> &CurrencySet {
        &self.currencies
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Applies one event from `peer`. Replies go to the peer's chat.
    #[instrument(name = "Conversation", skip(self, messenger, peer), fields(peer = %peer))]
    pub async fn handle(&self, messenger: &dyn Messenger, peer: Peer, event: Event) -> Result<()> {
        match event {
            Event::Start => self.start(messenger, peer).await,
            Event::Select {
                action: MenuAction::Source(code),
                message,
            } => self.select_source(messenger, peer, &code, message).await,
            Event::Select {
                action: MenuAction::Target { source, target },
                message,
            } => {
                self.select_target(messenger, peer, &source, &target, message)
                    .await
            }
            Event::Text(text) => self.on_text(messenger, peer, &text).await,
        }
    }

    async fn start(&self, messenger: &dyn Messenger, peer: Peer) -> Result<()> {
        self.sessions.put(peer, Session::awaiting_source()).await;
        messenger
            .send(
                peer.chat,
                &ui::choose_source(),
                Some(&ui::source_menu(&self.currencies)),
            )
            .await?;
        Ok(())
    }

    async fn select_source(
        &self,
        messenger: &dyn Messenger,
        peer: Peer,
        code: &str,
        message: MessageId,
    ) -> Result<()> {
        if !self.currencies.contains(code) {
            warn!(code, "Unknown source currency selected");
            return self.restart(messenger, peer).await;
        }

        let session = Session {
            source: Some(code.to_string()),
            target: None,
            state: SessionState::AwaitingTarget,
        };
        self.sessions.put(peer, session).await;

        messenger
            .edit(
                peer.chat,
                message,
                &ui::choose_target(&self.currencies, code),
                Some(&ui::target_menu(&self.currencies, code)),
            )
            .await
    }

    /// The pressed button names its own pair, which replaces whatever the session holds.
    async fn select_target(
        &self,
        messenger: &dyn Messenger,
        peer: Peer,
        source: &str,
        target: &str,
        message: MessageId,
    ) -> Result<()> {
        if source == target
            || !self.currencies.contains(source)
            || !self.currencies.contains(target)
        {
            warn!(source, target, "Invalid currency pair selected");
            return self.restart(messenger, peer).await;
        }

        let session = self.sessions.get(peer).await;
        if session.source.as_deref() != Some(source) {
            debug!(previous = ?session.source, source, "Target chosen from another menu");
        }

        let session = Session {
            source: Some(source.to_string()),
            target: Some(target.to_string()),
            state: SessionState::AwaitingAmount,
        };
        self.sessions.put(peer, session).await;

        let text = ui::enter_amount(&self.currencies, source, target);
        messenger.edit(peer.chat, message, &text, None).await
    }

    async fn on_text(&self, messenger: &dyn Messenger, peer: Peer, text: &str) -> Result<()> {
        let session = self.sessions.get(peer).await;
        if session.state != SessionState::AwaitingAmount {
            messenger.send(peer.chat, &ui::use_start(), None).await?;
            return Ok(());
        }

        let Some(amount) = parse_amount(text) else {
            debug!(text, "Rejected amount");
            messenger.send(peer.chat, &ui::invalid_amount(), None).await?;
            return Ok(());
        };

        let (Some(source), Some(target)) = (session.source, session.target) else {
            warn!("Amount received without a currency pair");
            return self.restart(messenger, peer).await;
        };

        self.convert(messenger, peer, &source, &target, amount).await
    }

    async fn convert(
        &self,
        messenger: &dyn Messenger,
        peer: Peer,
        source: &str,
        target: &str,
        amount: f64,
    ) -> Result<()> {
        // Finished either way; the user must start over for another conversion.
        self.sessions.clear(peer).await;

        let notice = messenger.send(peer.chat, &ui::fetching_rates(), None).await?;
        let rates = self.resolver.resolve(source).await;
        if let Err(e) = messenger.delete(peer.chat, notice).await {
            warn!(error = %e, "Failed to remove progress notice");
        }

        let text = match rates.get(target) {
            Some(&rate) => {
                info!(source, target, amount, rate, "Converted amount");
                ui::conversion_result(&self.currencies, source, target, amount, rate)
            }
            None => {
                warn!(
                    source,
                    target,
                    available = rates.len(),
                    "No usable rate for currency pair"
                );
                ui::conversion_failed(&self.currencies, source, target)
            }
        };
        messenger.send(peer.chat, &text, None).await?;
        Ok(())
    }

    async fn restart(&self, messenger: &dyn Messenger, peer: Peer) -> Result<()> {
        self.sessions.clear(peer).await;
        messenger
            .send(peer.chat, &ui::restart_required(), None)
            .await?;
        Ok(())
    }
}

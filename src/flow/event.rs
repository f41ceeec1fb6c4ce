//! Inbound events.
//!
//! Every update from the chat transport is an [`Update`]: who sent it and one [`Input`].
//! Callback payloads travel as short strings (`add:3`, `pay:sbp`); [`Callback`] is their typed
//! form and round-trips through `Display`/`FromStr`.

use crate::model::{ChatId, MenuItemId, OrderId, PaymentMethod, StoreId};
use std::fmt;
use std::str::FromStr;

/// Sender of an update as reported by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatIdentity {
    pub chat_id: ChatId,
    pub username: Option<String>,
    pub display_name: String,
}

impl ChatIdentity {
    pub fn new(chat_id: ChatId, display_name: impl Into<String>) -> Self {
        Self {
            chat_id,
            username: None,
            display_name: display_name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    pub chat: ChatIdentity,
    pub input: Input,
}

impl Update {
    pub fn command(chat: ChatIdentity, command: Command) -> Self {
        Self {
            chat,
            input: Input::Command(command),
        }
    }

    pub fn callback(chat: ChatIdentity, callback: Callback) -> Self {
        Self {
            chat,
            input: Input::Callback(callback),
        }
    }

    pub fn text(chat: ChatIdentity, text: impl Into<String>) -> Self {
        Self {
            chat,
            input: Input::Text(text.into()),
        }
    }

    /// Parses a console line `<chat_id> <input>`: `/cmd` is a command, `@payload` a button
    /// press and anything else typed text.
    pub fn from_console_line(line: &str) -> Result<Self, ParseInputError> {
        let bad = || ParseInputError(line.to_string());
        let (chat, rest) = line.trim().split_once(' ').ok_or_else(bad)?;
        let chat_id: ChatId = chat.parse().map_err(|_| bad())?;
        let chat = ChatIdentity::new(chat_id, "");
        let rest = rest.trim();

        if rest.starts_with('/') {
            Ok(Update::command(chat, rest.parse()?))
        } else if let Some(payload) = rest.strip_prefix('@') {
            Ok(Update::callback(chat, payload.parse()?))
        } else {
            Ok(Update::text(chat, rest))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    Callback(Callback),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Register and offer store selection.
    Start,
    /// Start a new order from store selection.
    New,
    Cancel,
    /// Staff: begin a shift.
    StartSession,
    /// Staff: end a shift.
    CloseSession,
}

impl Command {
    /// Commands advertised to customers, with descriptions, for transport menu registration.
    pub const CATALOGUE: [(&'static str, &'static str); 3] = [
        ("start", "Start the bot"),
        ("new", "New order"),
        ("cancel", "Cancel the current action"),
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised input {0:?}")]
pub struct ParseInputError(pub String);

impl FromStr for Command {
    type Err = ParseInputError;

    /// Accepts `/start`, `/start@some_bot` and trailing arguments.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let word = s
            .trim()
            .strip_prefix('/')
            .and_then(|rest| rest.split_whitespace().next())
            .map(|w| w.split('@').next().unwrap_or(w))
            .ok_or_else(|| ParseInputError(s.to_string()))?;
        match word {
            "start" => Ok(Command::Start),
            "new" => Ok(Command::New),
            "cancel" => Ok(Command::Cancel),
            "start_session" => Ok(Command::StartSession),
            "close_session" => Ok(Command::CloseSession),
            _ => Err(ParseInputError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeChoice {
    Asap,
    Minutes(u32),
}

/// Button payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Callback {
    ChooseStore,
    SelectStore(StoreId),
    AddItem(MenuItemId),
    ViewCart,
    EditCart,
    RemoveItem(MenuItemId),
    BackToMenu,
    Checkout,
    SetTime(TimeChoice),
    CustomTime,
    Pay(PaymentMethod),
    Cancel,
    RetryOrder(OrderId),
    /// Shift start confirmation, also used to refresh the pending list. Carries the staff chat.
    StartSession(ChatId),
    StopSession,
    ClaimOrder(OrderId),
    IssueOrder(OrderId),
}

impl fmt::Display for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callback::ChooseStore => f.write_str("choose_store"),
            Callback::SelectStore(id) => write!(f, "store:{}", id.0),
            Callback::AddItem(id) => write!(f, "add:{}", id.0),
            Callback::ViewCart => f.write_str("view_cart"),
            Callback::EditCart => f.write_str("edit_cart"),
            Callback::RemoveItem(id) => write!(f, "remove:{}", id.0),
            Callback::BackToMenu => f.write_str("back_to_menu"),
            Callback::Checkout => f.write_str("create_order"),
            Callback::SetTime(TimeChoice::Asap) => f.write_str("set_time:asap"),
            Callback::SetTime(TimeChoice::Minutes(m)) => write!(f, "set_time:{m}"),
            Callback::CustomTime => f.write_str("set_custom_time"),
            Callback::Pay(method) => write!(f, "pay:{}", method.as_str()),
            Callback::Cancel => f.write_str("cancel"),
            Callback::RetryOrder(id) => write!(f, "retry_order:{}", id.0),
            Callback::StartSession(chat) => write!(f, "start_session:{chat}"),
            Callback::StopSession => f.write_str("stop_session:"),
            Callback::ClaimOrder(id) => write!(f, "accept_order:{}", id.0),
            Callback::IssueOrder(id) => write!(f, "issue_order:{}", id.0),
        }
    }
}

impl FromStr for Callback {
    type Err = ParseInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseInputError(s.to_string());
        let (tag, arg) = match s.split_once(':') {
            Some((tag, arg)) => (tag, Some(arg)),
            None => (s, None),
        };
        let num = |arg: Option<&str>| -> Result<u32, ParseInputError> {
            arg.and_then(|a| a.parse().ok()).ok_or_else(err)
        };

        let callback = match (tag, arg) {
            ("choose_store", None) => Callback::ChooseStore,
            ("store", arg) => Callback::SelectStore(StoreId(num(arg)?)),
            ("add", arg) => Callback::AddItem(MenuItemId(num(arg)?)),
            ("view_cart", None) => Callback::ViewCart,
            ("edit_cart", None) => Callback::EditCart,
            ("remove", arg) => Callback::RemoveItem(MenuItemId(num(arg)?)),
            ("back_to_menu", None) => Callback::BackToMenu,
            ("create_order", None) => Callback::Checkout,
            ("set_time", Some("asap")) => Callback::SetTime(TimeChoice::Asap),
            ("set_time", arg) => Callback::SetTime(TimeChoice::Minutes(num(arg)?)),
            ("set_custom_time", None) => Callback::CustomTime,
            ("pay", Some(method)) => Callback::Pay(PaymentMethod::parse(method).ok_or_else(err)?),
            ("cancel", None) => Callback::Cancel,
            ("retry_order", arg) => Callback::RetryOrder(OrderId(num(arg)?)),
            ("start_session", Some(chat)) => {
                Callback::StartSession(chat.parse().map_err(|_| err())?)
            }
            ("stop_session", _) => Callback::StopSession,
            ("accept_order", arg) => Callback::ClaimOrder(OrderId(num(arg)?)),
            ("issue_order", arg) => Callback::IssueOrder(OrderId(num(arg)?)),
            _ => return Err(err()),
        };
        Ok(callback)
    }
}

//! Outbound messages: plain text plus rows of inline buttons.

use super::event::Callback;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub callback: Callback,
}

impl Button {
    pub fn new(label: impl Into<String>, callback: Callback) -> Self {
        Self {
            label: label.into(),
            callback,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub buttons: Vec<Vec<Button>>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            buttons: Vec::new(),
        }
    }

    /// Appends a row of buttons.
    pub fn row(mut self, row: Vec<Button>) -> Self {
        if !row.is_empty() {
            self.buttons.push(row);
        }
        self
    }

    /// Appends a row holding a single button.
    pub fn button(self, label: impl Into<String>, callback: Callback) -> Self {
        self.row(vec![Button::new(label, callback)])
    }

    /// Every callback offered, row by row.
    pub fn callbacks(&self) -> impl Iterator<Item = Callback> + '_ {
        self.buttons.iter().flatten().map(|b| b.callback)
    }

    pub fn offers(&self, callback: Callback) -> bool {
        self.callbacks().any(|c| c == callback)
    }
}

/// Console rendering: the text, then one line per button row as `[label](@payload)`.
impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)?;
        for row in &self.buttons {
            f.write_str("\n ")?;
            for button in row {
                write!(f, " [{}](@{})", button.label, button.callback)?;
            }
        }
        Ok(())
    }
}

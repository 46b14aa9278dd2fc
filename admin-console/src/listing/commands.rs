// Toolbar commands offered for the current selection
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandKey {
    #[serde(rename = "new")]
    Create,
    #[serde(rename = "view")]
    View,
    #[serde(rename = "edit")]
    Edit,
    #[serde(rename = "delete")]
    Delete,
    #[serde(rename = "recoveryLink")]
    RecoveryLink,
    #[serde(rename = "refresh")]
    Refresh,
}

impl CommandKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKey::Create => "new",
            CommandKey::View => "view",
            CommandKey::Edit => "edit",
            CommandKey::Delete => "delete",
            CommandKey::RecoveryLink => "recoveryLink",
            CommandKey::Refresh => "refresh",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CommandKey::Create => "Create New",
            CommandKey::View => "View",
            CommandKey::Edit => "Edit",
            CommandKey::Delete => "Delete",
            CommandKey::RecoveryLink => "Recovery",
            CommandKey::Refresh => "Refresh",
        }
    }
}

impl fmt::Display for CommandKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown command: {0}")]
pub struct UnknownCommand(pub String);

impl FromStr for CommandKey {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(CommandKey::Create),
            "view" => Ok(CommandKey::View),
            "edit" => Ok(CommandKey::Edit),
            "delete" => Ok(CommandKey::Delete),
            "recoveryLink" => Ok(CommandKey::RecoveryLink),
            "refresh" => Ok(CommandKey::Refresh),
            other => Err(UnknownCommand(other.to_string())),
        }
    }
}

/// A toolbar entry. Triggering goes through `ListingController::trigger`
/// with the command's key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Command {
    pub key: CommandKey,
    pub label: &'static str,
}

impl From<CommandKey> for Command {
    fn from(key: CommandKey) -> Self {
        Self {
            key,
            label: key.label(),
        }
    }
}

/// Commands available for a selection of `selection_count` identities
pub fn commands_for(selection_count: usize) -> Vec<Command> {
    let mut keys = vec![CommandKey::Create];

    if selection_count == 1 {
        keys.push(CommandKey::View);
        keys.push(CommandKey::Edit);
    }
    if selection_count >= 1 {
        keys.push(CommandKey::Delete);
        keys.push(CommandKey::RecoveryLink);
    }
    keys.push(CommandKey::Refresh);

    keys.into_iter().map(Command::from).collect()
}

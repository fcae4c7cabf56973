//! Administrative control surface: `/herald reload`.

use crate::platform::Recipient;
use herald_text::markup::translate_legacy;
use thiserror::Error;
use tracing::info;

pub const COMMAND_LABEL: &str = "herald";
pub const ADMIN_PERMISSION: &str = "herald.admin";

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("&cMissing permission: {0}")]
    MissingPermission(String),
    #[error("&eUsage: /herald reload")]
    Usage,
}

/// Action a successful invocation asks the caller to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Reload,
}

pub enum CommandSender<'a> {
    Console,
    Player(&'a mut dyn Recipient),
}

impl CommandSender<'_> {
    pub fn has_permission(&self, node: &str) -> bool {
        match self {
            CommandSender::Console => true,
            CommandSender::Player(player) => player.has_permission(node),
        }
    }

    pub fn reply(&mut self, message: &str) {
        match self {
            CommandSender::Console => info!("{}", translate_legacy(message)),
            CommandSender::Player(player) => player.send_plain(&translate_legacy(message)),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// The label is not ours; the host should keep looking.
    Unhandled,
    /// A denial or usage message went to the sender; nothing else to do.
    Replied,
    /// Caller performs the action and reports the result to the sender.
    Perform(Action),
}

/// Handles one invocation of the control command. Unauthorized or malformed
/// invocations get a reply and are otherwise no-ops.
pub fn dispatch(sender: &mut CommandSender<'_>, label: &str, args: &[&str]) -> Dispatch {
    if !label.eq_ignore_ascii_case(COMMAND_LABEL) {
        return Dispatch::Unhandled;
    }
    match args {
        [sub] if sub.eq_ignore_ascii_case("reload") => {
            if !sender.has_permission(ADMIN_PERMISSION) {
                let denial = CommandError::MissingPermission(ADMIN_PERMISSION.to_string());
                sender.reply(&denial.to_string());
                return Dispatch::Replied;
            }
            Dispatch::Perform(Action::Reload)
        }
        _ => {
            sender.reply(&CommandError::Usage.to_string());
            Dispatch::Replied
        }
    }
}

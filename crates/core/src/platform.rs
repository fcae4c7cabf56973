//! The seam between the broadcaster and its host.
//!
//! A real server embeds the broadcaster by implementing [`Platform`] and
//! [`Recipient`] over its own player list, permission backend, and sound
//! engine. The built-in [`ConsolePlatform`] stands in for all of that so the
//! daemon can run stand-alone to validate and preview a configuration.

use crate::config::CONFIG;
use crate::sound::{self, SoundSpec};
use anyhow::Result;
use herald_text::TextComponent;
use tracing::{debug, info};

pub trait Platform: Send {
    /// Platform version string, e.g. "1.20.4" or "1.16.5-R0.1".
    fn server_version(&self) -> String;

    /// Current and maximum player counts, for placeholder substitution.
    fn player_counts(&self) -> (u32, u32);

    /// The current audience for a group: everyone when `permission` is
    /// empty, otherwise only holders of that node.
    fn recipients(&mut self, permission: &str) -> Vec<&mut dyn Recipient>;

    /// Catalog lookup for sound identifiers.
    fn sound_exists(&self, name: &str) -> bool;
}

pub trait Recipient {
    fn name(&self) -> &str;

    fn has_permission(&self, node: &str) -> bool;

    /// Rich delivery of a compiled message. May fail; the broadcaster then
    /// falls back to `send_plain` for this recipient only.
    fn send_rich(&mut self, message: &[TextComponent]) -> Result<()>;

    fn send_plain(&mut self, message: &str);

    fn play_sound(&mut self, sound: &SoundSpec);
}

/// Stand-alone preview platform: one console recipient, counts and version
/// taken from `Config.toml`, sounds resolved against the built-in catalog.
pub struct ConsolePlatform {
    console: ConsoleRecipient,
}

impl ConsolePlatform {
    pub fn new() -> ConsolePlatform {
        ConsolePlatform {
            console: ConsoleRecipient,
        }
    }
}

impl Default for ConsolePlatform {
    fn default() -> ConsolePlatform {
        ConsolePlatform::new()
    }
}

impl Platform for ConsolePlatform {
    fn server_version(&self) -> String {
        CONFIG.server_version.clone()
    }

    fn player_counts(&self) -> (u32, u32) {
        (1, CONFIG.max_players.max(0) as u32)
    }

    fn recipients(&mut self, _permission: &str) -> Vec<&mut dyn Recipient> {
        vec![&mut self.console]
    }

    fn sound_exists(&self, name: &str) -> bool {
        sound::catalog_contains(name)
    }
}

pub struct ConsoleRecipient;

impl Recipient for ConsoleRecipient {
    fn name(&self) -> &str {
        "console"
    }

    fn has_permission(&self, _node: &str) -> bool {
        true
    }

    fn send_rich(&mut self, message: &[TextComponent]) -> Result<()> {
        let text: String = message.iter().map(|c| c.text.as_str()).collect();
        info!(target: "chat", "{}", text);
        for component in message {
            if component.click_event.is_some() {
                debug!(target: "chat", "component: {}", component.encode_json());
            }
        }
        Ok(())
    }

    fn send_plain(&mut self, message: &str) {
        info!(target: "chat", "{}", message);
    }

    fn play_sound(&mut self, sound: &SoundSpec) {
        debug!(
            target: "chat",
            "sound {} (volume {}, pitch {})",
            sound.name, sound.volume, sound.pitch
        );
    }
}

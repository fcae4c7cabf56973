use anyhow::{Result, anyhow};
use herald_core::platform::{Platform, Recipient};
use herald_core::sound::SoundSpec;
use herald_text::TextComponent;

/// Recording stand-in for a connected player.
pub struct TestPlayer {
    pub name: String,
    pub permissions: Vec<String>,
    /// When set, rich delivery errors and the broadcaster must fall back.
    pub fail_rich: bool,
    pub rich: Vec<Vec<TextComponent>>,
    pub plain: Vec<String>,
    pub sounds: Vec<SoundSpec>,
}

impl TestPlayer {
    pub fn new(name: &str) -> TestPlayer {
        TestPlayer {
            name: name.to_string(),
            permissions: Vec::new(),
            fail_rich: false,
            rich: Vec::new(),
            plain: Vec::new(),
            sounds: Vec::new(),
        }
    }

    pub fn with_permission(mut self, node: &str) -> TestPlayer {
        self.permissions.push(node.to_string());
        self
    }

    pub fn with_broken_rich_delivery(mut self) -> TestPlayer {
        self.fail_rich = true;
        self
    }
}

impl Recipient for TestPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn has_permission(&self, node: &str) -> bool {
        self.permissions.iter().any(|held| held == node)
    }

    fn send_rich(&mut self, message: &[TextComponent]) -> Result<()> {
        if self.fail_rich {
            return Err(anyhow!("connection reset"));
        }
        self.rich.push(message.to_vec());
        Ok(())
    }

    fn send_plain(&mut self, message: &str) {
        self.plain.push(message.to_string());
    }

    fn play_sound(&mut self, sound: &SoundSpec) {
        self.sounds.push(sound.clone());
    }
}

/// Recording stand-in for the host server.
pub struct TestPlatform {
    pub version: String,
    pub online: u32,
    pub max_players: u32,
    pub players: Vec<TestPlayer>,
    pub sounds: Vec<String>,
}

impl TestPlatform {
    pub fn new(version: &str) -> TestPlatform {
        TestPlatform {
            version: version.to_string(),
            online: 0,
            max_players: 20,
            players: Vec::new(),
            sounds: vec!["minecraft:block.note_block.pling".to_string()],
        }
    }

    pub fn join(&mut self, player: TestPlayer) {
        self.players.push(player);
        self.online = self.players.len() as u32;
    }

    pub fn player(&self, name: &str) -> &TestPlayer {
        self.players
            .iter()
            .find(|p| p.name == name)
            .expect("no such player")
    }
}

impl Platform for TestPlatform {
    fn server_version(&self) -> String {
        self.version.clone()
    }

    fn player_counts(&self) -> (u32, u32) {
        (self.online, self.max_players)
    }

    fn recipients(&mut self, permission: &str) -> Vec<&mut dyn Recipient> {
        self.players
            .iter_mut()
            .filter(|player| permission.is_empty() || player.has_permission(permission))
            .map(|player| player as &mut dyn Recipient)
            .collect()
    }

    fn sound_exists(&self, name: &str) -> bool {
        self.sounds.iter().any(|known| known == name)
    }
}

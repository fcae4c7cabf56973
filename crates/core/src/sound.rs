/// Sound cue attached to a broadcast group. `name` must resolve in the
/// platform catalog for the cue to stay enabled past config loading.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundSpec {
    pub enabled: bool,
    pub name: String,
    pub volume: f32,
    pub pitch: f32,
}

impl Default for SoundSpec {
    fn default() -> SoundSpec {
        SoundSpec {
            enabled: false,
            name: String::new(),
            volume: 1.0,
            pitch: 1.0,
        }
    }
}

/// Sound identifiers the built-in console platform recognizes. A real server
/// host supplies its own catalog through `Platform::sound_exists`.
pub static SOUND_CATALOG: &[&str] = &[
    "minecraft:block.amethyst_block.chime",
    "minecraft:block.anvil.land",
    "minecraft:block.beacon.activate",
    "minecraft:block.bell.use",
    "minecraft:block.note_block.banjo",
    "minecraft:block.note_block.bass",
    "minecraft:block.note_block.bell",
    "minecraft:block.note_block.bit",
    "minecraft:block.note_block.chime",
    "minecraft:block.note_block.cow_bell",
    "minecraft:block.note_block.didgeridoo",
    "minecraft:block.note_block.flute",
    "minecraft:block.note_block.guitar",
    "minecraft:block.note_block.harp",
    "minecraft:block.note_block.iron_xylophone",
    "minecraft:block.note_block.pling",
    "minecraft:block.note_block.snare",
    "minecraft:block.note_block.xylophone",
    "minecraft:entity.arrow.hit_player",
    "minecraft:entity.experience_orb.pickup",
    "minecraft:entity.item.pickup",
    "minecraft:entity.player.levelup",
    "minecraft:entity.villager.no",
    "minecraft:entity.villager.yes",
    "minecraft:ui.button.click",
    "minecraft:ui.toast.in",
    "minecraft:ui.toast.out",
];

pub fn catalog_contains(name: &str) -> bool {
    SOUND_CATALOG.contains(&name)
}

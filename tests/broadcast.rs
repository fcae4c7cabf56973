mod common;

use common::{TestPlatform, TestPlayer};
use herald_core::groups::{self, GroupConfig};
use herald_core::platform::Platform;
use herald_core::server::broadcast;
use herald_core::sound::SoundSpec;
use herald_text::{ClickAction, TextColor};

fn group(messages: &[&str]) -> GroupConfig {
    GroupConfig {
        name: "test".to_string(),
        enabled: true,
        interval: 60,
        wait: 0,
        permission: String::new(),
        messages: messages.iter().map(|m| m.to_string()).collect(),
        sound: SoundSpec::default(),
    }
}

#[test]
fn delivers_messages_in_declared_order() {
    let mut platform = TestPlatform::new("1.20.4");
    platform.join(TestPlayer::new("alice"));
    platform.join(TestPlayer::new("bob"));

    let delivered = broadcast(&mut platform, &group(&["&afirst", "&bsecond"]));
    assert_eq!(delivered, 2);

    for name in ["alice", "bob"] {
        let player = platform.player(name);
        assert_eq!(player.rich.len(), 2);
        assert_eq!(player.rich[0][0].text, "first");
        assert_eq!(player.rich[1][0].text, "second");
        assert!(player.plain.is_empty());
        assert!(player.sounds.is_empty());
    }
}

#[test]
fn permission_filters_the_audience() {
    let mut platform = TestPlatform::new("1.20.4");
    platform.join(TestPlayer::new("staff").with_permission("herald.staff"));
    platform.join(TestPlayer::new("guest"));

    let mut restricted = group(&["&cstaff only"]);
    restricted.permission = "herald.staff".to_string();
    let delivered = broadcast(&mut platform, &restricted);

    assert_eq!(delivered, 1);
    assert_eq!(platform.player("staff").rich.len(), 1);
    assert!(platform.player("guest").rich.is_empty());
}

#[test]
fn link_and_command_spans_are_clickable() {
    let mut platform = TestPlatform::new("1.20.4");
    platform.join(TestPlayer::new("alice"));

    broadcast(
        &mut platform,
        &group(&["vote at [our site](https://vote.test) or click `/vote`"]),
    );

    let message = &platform.player("alice").rich[0];
    let link = message
        .iter()
        .find(|c| c.text == "our site")
        .expect("link component");
    let event = link.click_event.as_ref().expect("click event");
    assert_eq!(event.action, ClickAction::OpenUrl);
    assert_eq!(event.value, "https://vote.test");

    let command = message
        .iter()
        .find(|c| c.text == "/vote")
        .expect("command component");
    let event = command.click_event.as_ref().expect("click event");
    assert_eq!(event.action, ClickAction::RunCommand);
    assert_eq!(event.value, "/vote");
}

#[test]
fn placeholders_reflect_platform_counts() {
    let mut platform = TestPlatform::new("1.20.4");
    platform.join(TestPlayer::new("alice"));
    platform.join(TestPlayer::new("bob"));
    platform.max_players = 64;

    broadcast(&mut platform, &group(&["%online%/%maxplayers% online"]));

    let message = &platform.player("alice").rich[0];
    assert_eq!(message[0].text, "2/64 online");
}

#[test]
fn failed_rich_delivery_falls_back_to_plain_for_that_recipient_only() {
    let mut platform = TestPlatform::new("1.20.4");
    platform.join(TestPlayer::new("flaky").with_broken_rich_delivery());
    platform.join(TestPlayer::new("solid"));

    broadcast(&mut platform, &group(&["&ahello &#00ff00world"]));

    let flaky = platform.player("flaky");
    assert!(flaky.rich.is_empty());
    assert_eq!(flaky.plain.len(), 1);
    assert_eq!(
        flaky.plain[0],
        "\u{a7}ahello \u{a7}x\u{a7}0\u{a7}0\u{a7}f\u{a7}f\u{a7}0\u{a7}0world"
    );

    let solid = platform.player("solid");
    assert_eq!(solid.rich.len(), 1);
    assert!(solid.plain.is_empty());
}

#[test]
fn sound_cue_plays_once_per_line_per_recipient() {
    let mut platform = TestPlatform::new("1.20.4");
    platform.join(TestPlayer::new("alice"));

    let mut noisy = group(&["one", "two"]);
    noisy.sound = SoundSpec {
        enabled: true,
        name: "minecraft:block.note_block.pling".to_string(),
        volume: 0.5,
        pitch: 2.0,
    };
    broadcast(&mut platform, &noisy);

    let sounds = &platform.player("alice").sounds;
    assert_eq!(sounds.len(), 2);
    assert_eq!(sounds[0].name, "minecraft:block.note_block.pling");
    assert_eq!(sounds[0].volume, 0.5);
    assert_eq!(sounds[0].pitch, 2.0);
}

#[test]
fn hex_colors_render_on_modern_platforms() {
    let mut platform = TestPlatform::new("1.16.5-R0.1");
    platform.join(TestPlayer::new("alice"));

    broadcast(&mut platform, &group(&["&#ff0000alert"]));

    let message = &platform.player("alice").rich[0];
    assert_eq!(message.len(), 1);
    assert_eq!(message[0].text, "alert");
    assert_eq!(message[0].color, Some(TextColor::Hex("#ff0000".into())));
}

#[test]
fn hex_colors_vanish_on_legacy_platforms() {
    let mut platform = TestPlatform::new("1.15.2");
    platform.join(TestPlayer::new("alice"));

    broadcast(&mut platform, &group(&["&#ff0000alert"]));

    let message = &platform.player("alice").rich[0];
    assert_eq!(message.len(), 1);
    assert_eq!(message[0].text, "alert");
    assert_eq!(message[0].color, None);
}

#[test]
fn document_to_delivery_round() {
    let mut platform = TestPlatform::new("1.20.4");
    platform.join(TestPlayer::new("alice"));

    let doc: serde_yaml_ng::Value = serde_yaml_ng::from_str(
        r#"
announcements:
  tips:
    interval: 120
    messages:
      - "&7tip: run `/spawn` to get home"
    sound:
      enabled: true
      name: "minecraft:block.note_block.pling"
"#,
    )
    .unwrap();
    let (groups, diagnostics) = groups::load_groups(&doc, 300, |name| platform.sound_exists(name));
    assert!(diagnostics.is_empty());
    assert_eq!(groups.len(), 1);

    broadcast(&mut platform, &groups[0]);

    let player = platform.player("alice");
    assert_eq!(player.rich.len(), 1);
    assert_eq!(player.sounds.len(), 1);
    let command = player.rich[0]
        .iter()
        .find(|c| c.click_event.is_some())
        .expect("clickable component");
    assert_eq!(command.text, "/spawn");
}

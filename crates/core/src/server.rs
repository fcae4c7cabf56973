//! Broadcast scheduling and delivery.

use crate::commands::{self, Action, CommandSender, Dispatch};
use crate::config::CONFIG;
use crate::groups::{self, Diagnostic, GroupConfig};
use crate::placeholders;
use crate::platform::{ConsolePlatform, Platform};
use anyhow::{Context, Result};
use herald_text::TextComponent;
use herald_text::markup::{self, FeatureFlags};
use serde_yaml_ng::Value;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub const TICKS_PER_SECOND: u64 = 20;
const MILLIS_PER_TICK: u64 = 1000 / TICKS_PER_SECOND;
const TICK_DURATION: Duration = Duration::from_millis(MILLIS_PER_TICK);

const DEFAULT_MESSAGES: &str = r#"announcements:
  default:
    enabled: true
    interval: 300
    wait: 10
    permission: ""
    messages:
      - "&7[&bherald&7] &fWelcome! &a{online}&f of &a%maxplayers%&f players online."
      - "&7[&bherald&7] &fNeed help? Read the [wiki](https://example.com/wiki) or run `/help`."
    sound:
      enabled: false
      name: "minecraft:block.note_block.pling"
      volume: 1.0
      pitch: 1.0
"#;

fn ticks_duration(ticks: u64) -> Duration {
    Duration::from_millis(ticks.saturating_mul(MILLIS_PER_TICK))
}

struct Schedule {
    group: GroupConfig,
    next_fire: Instant,
    period: Duration,
}

pub struct BroadcastServer {
    platform: Box<dyn Platform>,
    groups: Vec<GroupConfig>,
    diagnostics: Vec<Diagnostic>,
    schedules: Vec<Schedule>,
}

impl BroadcastServer {
    pub fn new(platform: Box<dyn Platform>) -> BroadcastServer {
        BroadcastServer {
            platform,
            groups: Vec::new(),
            diagnostics: Vec::new(),
            schedules: Vec::new(),
        }
    }

    /// Runs the broadcaster against the built-in console platform until
    /// ctrl-c or a console `stop`.
    pub fn run() -> Result<()> {
        let mut server = BroadcastServer::new(Box::new(ConsolePlatform::new()));
        server.print_banner();
        let active = server.load();
        server.validation_report();
        server.startup_summary();
        info!("Enabled. Active groups: {}", active);

        let running = Arc::new(AtomicBool::new(true));
        let handler_flag = running.clone();
        ctrlc::set_handler(move || handler_flag.store(false, Ordering::SeqCst))
            .context("Failed to set ctrl-c handler")?;

        let console = spawn_console_reader();

        while running.load(Ordering::SeqCst) {
            server.run_due(Instant::now());
            while let Ok(line) = console.try_recv() {
                server.handle_console_line(&line, &running);
            }
            thread::sleep(TICK_DURATION);
        }

        info!("Disabled.");
        Ok(())
    }

    /// Validates the configuration, prints the report, and exits without
    /// scheduling anything. Errors when the document has issues.
    pub fn check() -> Result<()> {
        let mut server = BroadcastServer::new(Box::new(ConsolePlatform::new()));
        server.print_banner();
        server.load();
        server.validation_report();
        server.startup_summary();
        if !server.diagnostics.is_empty() {
            anyhow::bail!("{} configuration issue(s) found", server.diagnostics.len());
        }
        info!("Configuration OK");
        Ok(())
    }

    /// Reads and validates the messages document and rebuilds all group
    /// schedules. Returns the number of scheduled groups.
    pub fn load(&mut self) -> usize {
        let doc = self.read_document();
        let platform = &self.platform;
        let (groups, diagnostics) = groups::load_groups(&doc, CONFIG.default_interval, |name| {
            platform.sound_exists(name)
        });
        for diagnostic in &diagnostics {
            warn!("Group '{}': {}", diagnostic.group, diagnostic.message);
        }
        self.groups = groups;
        self.diagnostics = diagnostics;

        let now = Instant::now();
        self.schedules.clear();
        for group in self.groups.iter().filter(|g| g.enabled) {
            let delay_ticks = (group.wait.max(0) as u64)
                .saturating_mul(TICKS_PER_SECOND)
                .max(1);
            let period_ticks = (group.interval.max(0) as u64)
                .saturating_mul(TICKS_PER_SECOND)
                .max(1);
            self.schedules.push(Schedule {
                group: group.clone(),
                next_fire: now + ticks_duration(delay_ticks),
                period: ticks_duration(period_ticks),
            });
        }
        self.schedules.len()
    }

    /// Cancels all schedules and loads the document again.
    pub fn reload(&mut self) -> usize {
        self.schedules.clear();
        self.load()
    }

    pub fn groups(&self) -> &[GroupConfig] {
        &self.groups
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    fn read_document(&self) -> Value {
        let path = &CONFIG.messages_file;
        if !Path::new(path).exists() {
            info!("Creating default messages document at {}", path);
            if let Err(err) = fs::write(path, DEFAULT_MESSAGES) {
                warn!("Could not write {}: {}", path, err);
            }
        }
        match fs::read_to_string(path) {
            Ok(text) => match serde_yaml_ng::from_str(&text) {
                Ok(doc) => doc,
                Err(err) => {
                    warn!("Could not parse {}: {}", path, err);
                    Value::Null
                }
            },
            Err(err) => {
                warn!("Could not read {}: {}", path, err);
                Value::Null
            }
        }
    }

    /// Fires every schedule whose deadline has passed. Deadlines missed
    /// while asleep collapse into a single firing.
    fn run_due(&mut self, now: Instant) {
        for schedule in &mut self.schedules {
            if schedule.next_fire > now {
                continue;
            }
            while schedule.next_fire <= now {
                schedule.next_fire += schedule.period;
            }
            broadcast(self.platform.as_mut(), &schedule.group);
        }
    }

    fn handle_console_line(&mut self, line: &str, running: &AtomicBool) {
        let mut parts = line.split_whitespace();
        let Some(label) = parts.next() else { return };
        let label = label.trim_start_matches('/');
        let args: Vec<&str> = parts.collect();

        if label.eq_ignore_ascii_case("stop") && args.is_empty() {
            running.store(false, Ordering::SeqCst);
            return;
        }
        // console shorthand for the full command
        let (label, args) = if label.eq_ignore_ascii_case("reload") && args.is_empty() {
            (commands::COMMAND_LABEL, vec!["reload"])
        } else {
            (label, args)
        };

        let mut sender = CommandSender::Console;
        match commands::dispatch(&mut sender, label, &args) {
            Dispatch::Perform(Action::Reload) => {
                let active = self.reload();
                sender.reply(&format!(
                    "&aConfiguration reloaded. Active groups: {}",
                    active
                ));
            }
            Dispatch::Replied => {}
            Dispatch::Unhandled => info!("Unknown command: {}", line.trim()),
        }
    }

    fn print_banner(&self) {
        info!("=====================================");
        info!(" herald {}", env!("CARGO_PKG_VERSION"));
        info!(" scheduled chat broadcaster");
        info!("=====================================");
    }

    fn validation_report(&self) {
        let total = self.groups.len();
        let enabled = self.groups.iter().filter(|g| g.enabled).count();
        let issues = self.diagnostics.len();
        let hex = markup::hex_color_supported(&self.platform.server_version());
        info!(
            "Config groups: total={}, enabled={}, issues={}",
            total, enabled, issues
        );
        info!(
            "Hex colors: {}",
            if hex {
                "enabled (1.16+)"
            } else {
                "disabled (<1.16)"
            }
        );
    }

    fn startup_summary(&self) {
        let (online, max_players) = self.platform.player_counts();
        info!(
            "Platform version {} | Online: {}/{}",
            self.platform.server_version(),
            online,
            max_players
        );
        for group in &self.groups {
            let recipients = if group.permission.is_empty() {
                "all"
            } else {
                group.permission.as_str()
            };
            let sound = if group.sound.enabled {
                group.sound.name.as_str()
            } else {
                "disabled"
            };
            info!("- Group: {}", group.name);
            info!(
                "  status    : {}",
                if group.enabled { "enabled" } else { "disabled" }
            );
            info!(
                "  timing    : interval={}s, wait={}s",
                group.interval, group.wait
            );
            info!("  recipients: {}", recipients);
            info!("  sound     : {}", sound);
            info!("  messages  : {} line(s)", group.messages.len());
        }
    }
}

/// Compiles and delivers one group's messages to its current audience, in
/// declared order. A recipient whose rich delivery fails gets a plain legacy
/// rendition instead; the rest of the audience is unaffected. Returns the
/// recipient count.
pub fn broadcast(platform: &mut dyn Platform, group: &GroupConfig) -> usize {
    let flags = FeatureFlags::detect(&platform.server_version());
    let (online, max_players) = platform.player_counts();
    let mut recipients = platform.recipients(&group.permission);

    for line in &group.messages {
        let runs = markup::compile(line, flags, |s| placeholders::apply(s, online, max_players));
        let components: Vec<TextComponent> =
            runs.iter().flat_map(|run| run.into_components()).collect();
        for recipient in recipients.iter_mut() {
            if let Err(err) = recipient.send_rich(&components) {
                debug!(
                    "Rich delivery to {} failed ({:#}); sending plain text",
                    recipient.name(),
                    err
                );
                recipient.send_plain(&markup::plain_fallback(line, flags, |s| {
                    placeholders::apply(s, online, max_players)
                }));
            }
            if group.sound.enabled {
                recipient.play_sound(&group.sound);
            }
        }
    }

    info!(
        "Sent group '{}' to {} recipient(s)",
        group.name,
        recipients.len()
    );
    recipients.len()
}

fn spawn_console_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

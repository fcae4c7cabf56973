//! Loader for the broadcast group document.
//!
//! Loading never fails: every problem becomes a [`Diagnostic`] and the rest
//! of the document is still processed. A group without usable messages is
//! dropped; everything else degrades field by field.

use crate::sound::SoundSpec;
use serde_yaml_ng::Value;

/// Well-known root key of the messages document.
pub const ROOT_KEY: &str = "announcements";

/// One named broadcast group, immutable once loaded. Replaced wholesale on
/// reload.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupConfig {
    pub name: String,
    pub enabled: bool,
    /// Repeat interval in seconds. Positive after loading; the scheduler
    /// still clamps to at least one tick.
    pub interval: i64,
    /// Initial delay in seconds.
    pub wait: i64,
    /// Permission node a recipient must hold. Empty means everyone.
    pub permission: String,
    pub messages: Vec<String>,
    pub sound: SoundSpec,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub group: String,
    pub message: String,
}

impl Diagnostic {
    fn new(group: impl Into<String>, message: impl Into<String>) -> Diagnostic {
        Diagnostic {
            group: group.into(),
            message: message.into(),
        }
    }
}

/// Parses the group document into group descriptors plus diagnostics, in
/// declaration order. Disabled groups are kept in the output; groups without
/// messages are dropped. `sound_exists` is the platform's catalog lookup.
pub fn load_groups(
    doc: &Value,
    default_interval: i64,
    sound_exists: impl Fn(&str) -> bool,
) -> (Vec<GroupConfig>, Vec<Diagnostic>) {
    let mut groups = Vec::new();
    let mut diagnostics = Vec::new();

    let Some(root) = doc.get(ROOT_KEY).and_then(Value::as_mapping) else {
        diagnostics.push(Diagnostic::new(
            ROOT_KEY,
            format!("document is missing the '{ROOT_KEY}' section"),
        ));
        return (groups, diagnostics);
    };

    for (key, body) in root {
        let Some(name) = key.as_str() else {
            diagnostics.push(Diagnostic::new(
                ROOT_KEY,
                "group key is not a string; skipping",
            ));
            continue;
        };
        if body.as_mapping().is_none() {
            diagnostics.push(Diagnostic::new(name, "group body is not a section; skipping"));
            continue;
        }

        let enabled = body.get("enabled").and_then(Value::as_bool).unwrap_or(true);

        let interval = match body.get("interval") {
            None => default_interval,
            Some(v) => {
                let seconds = as_seconds(v, -1);
                if seconds <= 0 {
                    diagnostics.push(Diagnostic::new(name, "invalid interval (seconds)"));
                    default_interval
                } else {
                    seconds
                }
            }
        };

        let mut wait = match body.get("wait") {
            None => 0,
            Some(v) => as_seconds(v, 0),
        };
        if wait < 0 {
            diagnostics.push(Diagnostic::new(name, "negative wait"));
            wait = 0;
        }

        let permission = body
            .get("permission")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();

        let mut messages = Vec::new();
        if let Some(entries) = body.get("messages").and_then(Value::as_sequence) {
            for entry in entries {
                match scalar_to_string(entry) {
                    Some(line) => messages.push(line),
                    None => diagnostics
                        .push(Diagnostic::new(name, "messages entry is not a scalar; dropped")),
                }
            }
        }
        if messages.is_empty() {
            diagnostics.push(Diagnostic::new(name, "no messages; skipping group"));
            continue;
        }

        let mut sound = SoundSpec::default();
        if let Some(snd) = body.get("sound") {
            sound.enabled = snd.get("enabled").and_then(Value::as_bool).unwrap_or(false);
            sound.name = snd
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string();
            sound.volume = as_float(snd.get("volume"), 1.0).max(0.0);
            sound.pitch = as_float(snd.get("pitch"), 1.0).max(0.0);
            if sound.enabled {
                if sound.name.is_empty() {
                    diagnostics.push(Diagnostic::new(name, "sound enabled but name missing"));
                    sound.enabled = false;
                } else if !sound_exists(&sound.name) {
                    diagnostics.push(Diagnostic::new(
                        name,
                        format!("unknown sound '{}'; disabling sound", sound.name),
                    ));
                    sound.enabled = false;
                }
            }
        }

        groups.push(GroupConfig {
            name: name.to_string(),
            enabled,
            interval,
            wait,
            permission,
            messages,
            sound,
        });
    }

    (groups, diagnostics)
}

/// Seconds fields accept integers, floats, or numeric strings. Anything else
/// coerces to `default`.
fn as_seconds(value: &Value, default: i64) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(default),
        Value::String(s) => s.trim().parse().unwrap_or(default),
        _ => default,
    }
}

fn as_float(value: Option<&Value>, default: f32) -> f32 {
    match value {
        Some(Value::Number(n)) => n.as_f64().map(|f| f as f32).unwrap_or(default),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
        _ => default,
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

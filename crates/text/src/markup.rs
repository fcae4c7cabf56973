//! Broadcast line markup: a restricted markdown-like syntax compiled into
//! clickable text runs.
//!
//! A line may contain legacy `&` style markers, `&#rrggbb` hex color tokens,
//! `[text](target)` links, and `` `target` `` command spans. Targets starting
//! with `/` run a command on click, anything else opens as a URL.

use crate::{ClickAction, ClickEvent, SECTION, TextComponent};
use once_cell::sync::Lazy;
use regex::Regex;

static HEX_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new("&#([0-9a-fA-F]{6})").unwrap());

/// Text features available on the current platform version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureFlags {
    pub hex_colors: bool,
}

impl FeatureFlags {
    pub fn detect(version: &str) -> FeatureFlags {
        FeatureFlags {
            hex_colors: hex_color_supported(version),
        }
    }
}

/// Hex colors shipped in 1.16. Pre-release and build suffixes after `-` are
/// ignored; an unparseable version reports false and the line degrades to
/// legacy-only formatting.
pub fn hex_color_supported(version: &str) -> bool {
    let base = version.split('-').next().unwrap_or(version);
    let mut parts = base.split('.');
    let Some(major) = parts.next().and_then(|s| s.parse::<u32>().ok()) else {
        return false;
    };
    let minor = match parts.next() {
        Some(s) => match s.parse::<u32>() {
            Ok(minor) => minor,
            Err(_) => return false,
        },
        None => 0,
    };
    major > 1 || (major == 1 && minor >= 16)
}

/// One contiguous segment of compiled output, optionally clickable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub click_event: Option<ClickEvent>,
}

impl TextRun {
    /// Renders the run into styled components, attaching the run's click
    /// event to every component the style splitter produces.
    pub fn into_components(&self) -> Vec<TextComponent> {
        let mut components = TextComponent::from_formatted_text(&self.text);
        if let Some(event) = &self.click_event {
            for component in &mut components {
                component.click_event = Some(event.clone());
            }
        }
        components
    }
}

/// Compiles one broadcast line into an ordered sequence of text runs.
///
/// The placeholder function is applied to the whole raw line first and its
/// output is not re-scanned for further placeholders. Hex tokens are then
/// expanded (or deleted, without hex support), and finally the line is
/// scanned left to right for links and command spans. Malformed markup
/// degrades to verbatim text.
pub fn compile<F>(line: &str, flags: FeatureFlags, placeholders: F) -> Vec<TextRun>
where
    F: Fn(&str) -> String,
{
    let line = expand_hex(&placeholders(line), flags);

    let mut runs = Vec::new();
    let mut idx = 0;
    while idx < line.len() {
        let next_link = find_link_start(&line, idx);
        let next_tick = find_from(&line, idx, '`');
        let Some(next) = min_pos(next_link, next_tick) else {
            push_plain(&mut runs, &line[idx..]);
            break;
        };
        push_plain(&mut runs, &line[idx..next]);
        if Some(next) == next_link {
            // Committed to a link; the closing paren is only sought now.
            let bounds = find_from(&line, next, ']').and_then(|close_text| {
                find_from(&line, close_text, '(').and_then(|open_paren| {
                    find_from(&line, open_paren, ')')
                        .map(|close_paren| (close_text, open_paren, close_paren))
                })
            });
            let Some((close_text, open_paren, close_paren)) = bounds else {
                push_plain(&mut runs, &line[next..]);
                break;
            };
            push_clickable(
                &mut runs,
                &line[next + 1..close_text],
                &line[open_paren + 1..close_paren],
            );
            idx = close_paren + 1;
        } else {
            let Some(end) = find_from(&line, next + 1, '`') else {
                push_plain(&mut runs, &line[next..]);
                break;
            };
            let target = line[next + 1..end].trim();
            push_clickable(&mut runs, target, target);
            idx = end + 1;
        }
    }
    runs
}

/// The unstructured rendition of a line, for recipients whose rich delivery
/// path failed: placeholders, hex expansion, and legacy translation only.
pub fn plain_fallback<F>(line: &str, flags: FeatureFlags, placeholders: F) -> String
where
    F: Fn(&str) -> String,
{
    translate_legacy(&expand_hex(&placeholders(line), flags))
}

/// Rewrites every `&` into the platform escape character. Which codes mean
/// what is the renderer's business, not ours.
pub fn translate_legacy(text: &str) -> String {
    text.chars()
        .map(|c| if c == '&' { SECTION } else { c })
        .collect()
}

fn expand_hex(line: &str, flags: FeatureFlags) -> String {
    HEX_TOKEN
        .replace_all(line, |caps: &regex::Captures<'_>| {
            if !flags.hex_colors {
                return String::new();
            }
            let mut expanded = String::with_capacity(14);
            expanded.push(SECTION);
            expanded.push('x');
            for digit in caps[1].chars() {
                expanded.push(SECTION);
                expanded.push(digit);
            }
            expanded
        })
        .into_owned()
}

fn find_from(s: &str, from: usize, needle: char) -> Option<usize> {
    s[from..].find(needle).map(|i| i + from)
}

/// A link starts at a `[` that has a later `]` and a later `(` in that order.
/// The closing `)` is not required here; `compile` falls back to plain text
/// if it turns out to be missing.
fn find_link_start(s: &str, from: usize) -> Option<usize> {
    let open = find_from(s, from, '[')?;
    let close = find_from(s, open + 1, ']')?;
    find_from(s, close + 1, '(')?;
    Some(open)
}

fn min_pos(a: Option<usize>, b: Option<usize>) -> Option<usize> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (Some(a), None) => Some(a),
        (None, b) => b,
    }
}

fn push_plain(runs: &mut Vec<TextRun>, text: &str) {
    if text.is_empty() {
        return;
    }
    runs.push(TextRun {
        text: translate_legacy(text),
        click_event: None,
    });
}

fn push_clickable(runs: &mut Vec<TextRun>, text: &str, target: &str) {
    if target.is_empty() {
        push_plain(runs, text);
        return;
    }
    let action = if target.starts_with('/') {
        ClickAction::RunCommand
    } else {
        ClickAction::OpenUrl
    };
    runs.push(TextRun {
        text: translate_legacy(text),
        click_event: Some(ClickEvent {
            action,
            value: target.to_string(),
        }),
    });
}

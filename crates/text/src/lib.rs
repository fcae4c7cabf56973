pub mod markup;

pub use markup::{compile, plain_fallback, FeatureFlags, TextRun};

use serde::Serialize;

/// The platform's native style-escape character. Legacy `&` markers are
/// rewritten to this before a string reaches the renderer.
pub const SECTION: char = '\u{00a7}';

fn is_valid_hex(ch: char) -> bool {
    ch.is_ascii_hexdigit()
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ColorCode {
    Black,
    DarkBlue,
    DarkGreen,
    DarkAqua,
    DarkRed,
    DarkPurple,
    Gold,
    Gray,
    DarkGray,
    Blue,
    Green,
    Aqua,
    Red,
    LightPurple,
    Yellow,
    White,
    Obfuscated,
    Bold,
    Strikethrough,
    Underline,
    Italic,
    Reset,
}

impl ColorCode {
    fn parse(code: char) -> Option<ColorCode> {
        Some(match code {
            '0' => ColorCode::Black,
            '1' => ColorCode::DarkBlue,
            '2' => ColorCode::DarkGreen,
            '3' => ColorCode::DarkAqua,
            '4' => ColorCode::DarkRed,
            '5' => ColorCode::DarkPurple,
            '6' => ColorCode::Gold,
            '7' => ColorCode::Gray,
            '8' => ColorCode::DarkGray,
            '9' => ColorCode::Blue,
            'a' => ColorCode::Green,
            'b' => ColorCode::Aqua,
            'c' => ColorCode::Red,
            'd' => ColorCode::LightPurple,
            'e' => ColorCode::Yellow,
            'f' => ColorCode::White,
            'k' => ColorCode::Obfuscated,
            'l' => ColorCode::Bold,
            'm' => ColorCode::Strikethrough,
            'n' => ColorCode::Underline,
            'o' => ColorCode::Italic,
            'r' => ColorCode::Reset,
            _ => return None,
        })
    }

    fn is_formatting(self) -> bool {
        use ColorCode::*;
        matches!(
            self,
            Obfuscated | Bold | Strikethrough | Underline | Italic | Reset
        )
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum TextColor {
    Hex(String),
    ColorCode(ColorCode),
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClickAction {
    OpenUrl,
    RunCommand,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub action: ClickAction,
    pub value: String,
}

/// This is only used for `TextComponent` serialize
#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(field: &bool) -> bool {
    !*field
}

#[derive(Serialize, Default, Debug, Clone, PartialEq)]
pub struct TextComponent {
    pub text: String,
    #[serde(skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub underlined: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub strikethrough: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub obfuscated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<TextColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "clickEvent")]
    pub click_event: Option<ClickEvent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<TextComponent>,
}

/// Reads the six `escape + digit` pairs of an extended hex color sequence.
/// Returns the color as `#rrggbb` when the full sequence is present.
fn parse_hex_escape(tail: &[char]) -> Option<String> {
    if tail.len() < 12 {
        return None;
    }
    let mut hex = String::from('#');
    for pair in tail[..12].chunks(2) {
        if pair[0] != SECTION || !is_valid_hex(pair[1]) {
            return None;
        }
        hex.push(pair[1]);
    }
    Some(hex)
}

impl TextComponent {
    /// Splits a section-sign-styled string into styled components. Understands
    /// the single-character style codes and the 14-character extended hex form
    /// (escape, 'x', then six escape+digit pairs). Unknown codes are kept as
    /// literal text.
    pub fn from_formatted_text(message: &str) -> Vec<TextComponent> {
        let chars: Vec<char> = message.chars().collect();
        let mut components = Vec::new();
        let mut cur_component: TextComponent = Default::default();

        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            if c == SECTION && i + 1 < chars.len() {
                let code = chars[i + 1];
                if code == 'x' || code == 'X' {
                    if let Some(hex) = parse_hex_escape(&chars[i + 2..]) {
                        components.push(cur_component);
                        cur_component = TextComponent {
                            color: Some(TextColor::Hex(hex)),
                            ..Default::default()
                        };
                        i += 14;
                        continue;
                    }
                } else if let Some(color) = ColorCode::parse(code) {
                    let make_new = !cur_component.text.is_empty();
                    if color.is_formatting() && make_new {
                        components.push(cur_component.clone());
                        cur_component.text.clear();
                    }
                    match color {
                        ColorCode::Bold => cur_component.bold = true,
                        ColorCode::Italic => cur_component.italic = true,
                        ColorCode::Underline => cur_component.underlined = true,
                        ColorCode::Strikethrough => cur_component.strikethrough = true,
                        ColorCode::Obfuscated => cur_component.obfuscated = true,
                        _ => {
                            components.push(cur_component);
                            cur_component = Default::default();
                            cur_component.color = Some(TextColor::ColorCode(color));
                        }
                    }
                    i += 2;
                    continue;
                }
                cur_component.text.push(c);
                cur_component.text.push(code);
                i += 2;
                continue;
            }
            cur_component.text.push(c);
            i += 1;
        }
        components.push(cur_component);

        components.retain(|component| !component.text.is_empty());
        components
    }

    pub fn encode_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }
}

impl<S> From<S> for TextComponent
where
    S: Into<String>,
{
    fn from(value: S) -> Self {
        let mut tc: TextComponent = Default::default();
        tc.text = value.into();
        tc
    }
}

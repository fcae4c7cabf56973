/// Replaces the online-count placeholder tokens in a broadcast line.
/// Substitution is literal and single-pass; the substituted text is never
/// re-scanned.
pub fn apply(line: &str, online: u32, max_players: u32) -> String {
    let online = online.to_string();
    line.replace("%online%", &online)
        .replace("%maxplayers%", &max_players.to_string())
        .replace("{online}", &online)
        .replace("{onlinePlayers}", &online)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_all_tokens() {
        assert_eq!(
            apply("%online%/%maxplayers% ({online}, {onlinePlayers})", 7, 100),
            "7/100 (7, 7)"
        );
    }

    #[test]
    fn leaves_unknown_tokens_alone() {
        assert_eq!(apply("hello %world%", 1, 2), "hello %world%");
    }
}

use scraper::{Html, Selector};

// ── Text ──────────────────────────────────────────────────────────────────────

/// Collapse runs of whitespace (including newlines from the markup) to one space.
pub fn normalise_text(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Rank cells sometimes carry decorations around the number ("1", "1st", "=3").
pub fn parse_rank(s: &str) -> Option<u32> {
    let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

// ── Elapsed time ──────────────────────────────────────────────────────────────

/// Parse leaderboard time text into seconds.
///
/// Accepted shapes:
/// - `58<abbr class='unit' title='second'>s</abbr>` → 58
/// - `1:04` (M:SS) → 64
/// - `1:02:03` (H:MM:SS) → 3723
///
/// Returns `None` for anything else.
pub fn parse_elapsed(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let fragment = Html::parse_fragment(raw);

    if has_seconds_unit(&fragment) {
        let number = raw.split('<').next()?.trim();
        return number.parse().ok();
    }

    let text: String = fragment.root_element().text().collect();
    parse_clock(text.trim())
}

fn has_seconds_unit(fragment: &Html) -> bool {
    let Ok(sel) = Selector::parse(r#"abbr[title="second"]"#) else {
        return false;
    };
    fragment.select(&sel).next().is_some()
}

fn parse_clock(s: &str) -> Option<u32> {
    let parts: Vec<u32> = s
        .split(':')
        .map(|p| {
            if p.is_empty() || !p.chars().all(|c| c.is_ascii_digit()) {
                None
            } else {
                p.parse().ok()
            }
        })
        .collect::<Option<_>>()?;

    match parts.as_slice() {
        [m, s] if *s < 60 => m.checked_mul(60)?.checked_add(*s),
        [h, m, s] if *m < 60 && *s < 60 => h
            .checked_mul(3600)?
            .checked_add(m * 60)?
            .checked_add(*s),
        _ => None,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_elapsed_minutes_seconds() {
        assert_eq!(parse_elapsed("1:04"), Some(64));
        assert_eq!(parse_elapsed("0:45"), Some(45));
        assert_eq!(parse_elapsed("12:00"), Some(720));
        assert_eq!(parse_elapsed("  1:12\n"), Some(72));
    }

    #[test]
    fn test_parse_elapsed_hours() {
        assert_eq!(parse_elapsed("1:02:03"), Some(3723));
    }

    #[test]
    fn test_parse_elapsed_seconds_unit() {
        assert_eq!(
            parse_elapsed("58<abbr class='unit' title='second'>s</abbr>"),
            Some(58)
        );
        // html5ever re-serialises attributes with double quotes
        assert_eq!(
            parse_elapsed(r#"9<abbr class="unit" title="second">s</abbr>"#),
            Some(9)
        );
    }

    #[test]
    fn test_parse_elapsed_malformed() {
        assert_eq!(parse_elapsed(""), None);
        assert_eq!(parse_elapsed("58"), None);
        assert_eq!(parse_elapsed("abc"), None);
        assert_eq!(parse_elapsed("1:xx"), None);
        assert_eq!(parse_elapsed("1:75"), None);
        assert_eq!(parse_elapsed(":30"), None);
        assert_eq!(parse_elapsed("-1:30"), None);
        assert_eq!(parse_elapsed("4294967295:00"), None);
        assert_eq!(
            parse_elapsed("<abbr class='unit' title='second'>s</abbr>"),
            None
        );
    }

    #[test]
    fn test_parse_elapsed_ignores_other_units() {
        assert_eq!(
            parse_elapsed("3<abbr class='unit' title='minute'>m</abbr>"),
            None
        );
    }

    #[test]
    fn test_normalise_text() {
        assert_eq!(normalise_text("\n  Jane   Doe \t"), "Jane Doe");
        assert_eq!(normalise_text(""), "");
    }

    #[test]
    fn test_parse_rank() {
        assert_eq!(parse_rank("1"), Some(1));
        assert_eq!(parse_rank(" 12 "), Some(12));
        assert_eq!(parse_rank("=3"), Some(3));
        assert_eq!(parse_rank(""), None);
    }
}

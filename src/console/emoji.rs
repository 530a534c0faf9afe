//! `:shortcode:` emoji replacement.

use std::borrow::Cow;

/// Known shortcodes, sorted by name for binary search.
const EMOJI: &[(&str, &str)] = &[
    ("bug", "\u{1f41b}"),
    ("check_mark", "\u{2714}"),
    ("construction", "\u{1f6a7}"),
    ("cross_mark", "\u{274c}"),
    ("fire", "\u{1f525}"),
    ("heart", "\u{2764}"),
    ("hourglass", "\u{231b}"),
    ("information", "\u{2139}"),
    ("memo", "\u{1f4dd}"),
    ("package", "\u{1f4e6}"),
    ("rocket", "\u{1f680}"),
    ("smile", "\u{1f604}"),
    ("sparkles", "\u{2728}"),
    ("star", "\u{2b50}"),
    ("tada", "\u{1f389}"),
    ("thumbs_up", "\u{1f44d}"),
    ("warning", "\u{26a0}"),
    ("white_check_mark", "\u{2705}"),
    ("x", "\u{274c}"),
    ("zap", "\u{26a1}"),
];

/// Look up a shortcode name (without colons).
pub fn lookup(name: &str) -> Option<&'static str> {
    EMOJI
        .binary_search_by(|(key, _)| (*key).cmp(name))
        .ok()
        .map(|idx| EMOJI[idx].1)
}

/// Replace every known `:name:` with its emoji. Unknown names are kept.
pub fn replace(text: &str) -> Cow<'_, str> {
    if !text.contains(':') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find(':') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let candidate = after
            .find(':')
            .map(|close| (&after[..close], close))
            .filter(|(name, _)| is_shortcode(name))
            .and_then(|(name, close)| lookup(name).map(|emoji| (emoji, close)));

        match candidate {
            Some((emoji, close)) => {
                out.push_str(emoji);
                rest = &after[close + 1..];
            }
            None => {
                out.push(':');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn is_shortcode(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_sorted() {
        assert!(EMOJI.windows(2).all(|pair| pair[0].0 < pair[1].0));
    }

    #[test]
    fn test_replace_known() {
        assert_eq!(replace("ship it :rocket:!"), "ship it \u{1f680}!");
        assert_eq!(replace(":x::x:"), "\u{274c}\u{274c}");
    }

    #[test]
    fn test_unknown_kept() {
        assert_eq!(replace("time 12:30:45"), "time 12:30:45");
        assert_eq!(replace(":nope: :smile:"), ":nope: \u{1f604}");
    }

    #[test]
    fn test_no_colon_borrows() {
        assert!(matches!(replace("plain"), Cow::Borrowed("plain")));
    }
}

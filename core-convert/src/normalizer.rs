//! Title and artist-hint normalization
//!
//! Turns noisy video titles into search-friendly fragments. Each step is
//! idempotent on the output of the previous one, so the whole transform is
//! too: `normalize_title(normalize_title(x)) == normalize_title(x)`.

use once_cell::sync::Lazy;
use regex::Regex;

/// Bracketed or parenthesized segments carrying a video/release marker:
/// "(Official Music Video)", "[HD]", "(Live at Wembley)", "(2011 Remaster)"
static NOISE_SEGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)[\(\[][^\)\]]*\b(?:official|music|video|audio|lyrics?|visuali[sz]er|hd|hq|4k|\d{3,4}p|live|session|explicit|remaster(?:ed)?|album|ep|single|radio edit|remix)\b[^\)\]]*[\)\]]",
    )
    .unwrap()
});

/// Separator surrounded by whitespace: "Artist - Title", "Title | Label"
static SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+[-–|/]\s+").unwrap());

/// "feat. X", "ft X", "(feat. X)" through the end of the title
static FEATURING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:^|[\s\(\[])(?:feat|ft)\.?\s.*$").unwrap());

/// One or more trailing "(1999)" groups
static TRAILING_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:\s*\(\d{4}\))+\s*$").unwrap());

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static TOPIC_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s*-\s*topic\s*$").unwrap());

static VEVO_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)vevo\s*$").unwrap());

/// Normalize a raw title into a query fragment.
///
/// An empty result means the track is unmatchable and must not be searched.
pub fn normalize_title(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let without_noise = NOISE_SEGMENT.replace_all(&lowered, " ");

    let truncated = match SEPARATOR.find(&without_noise) {
        Some(separator) => &without_noise[..separator.start()],
        None => &without_noise[..],
    };

    let without_featuring = FEATURING.replace(truncated, "");
    let without_year = TRAILING_YEAR.replace(&without_featuring, "");

    WHITESPACE.replace_all(&without_year, " ").trim().to_string()
}

/// Normalize an uploader/channel name into an artist hint.
///
/// Drops the auto-generated " - Topic" and "VEVO" suffixes. A blank result
/// means there is no usable hint.
pub fn normalize_artist_hint(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    let without_topic = TOPIC_SUFFIX.replace(raw, "");
    let without_vevo = VEVO_SUFFIX.replace(&without_topic, "");
    let hint = without_vevo.trim();

    if hint.is_empty() {
        None
    } else {
        Some(hint.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "Rick Astley - Never Gonna Give You Up (Official Music Video)",
        "Daft Punk - Get Lucky (Official Audio) ft. Pharrell Williams, Nile Rodgers",
        "The Weeknd - Blinding Lights (Official Video)",
        "Bohemian Rhapsody (Remastered 2011)",
        "Song Title [HD] [Lyrics]",
        "Clair de Lune | Piano",
        "Track (feat. Someone) (1999)",
        "Old Song (1987) (2003)",
        "(Official Video)",
        "   ",
        "",
        "Hello (Live at the Royal Albert Hall) - Remastered",
        "Nested ((Official) Video) Test",
        "Something feat. Other - Extra",
        "AC/DC",
        "Up / Down – Mix",
        "Bad Guy (1080p)",
        "Title (Radio Edit) (2019)",
        "ft. Nobody",
        "Left Turn",
    ];

    #[test]
    fn test_strips_video_markers_and_artist_prefix() {
        assert_eq!(
            normalize_title("Rick Astley - Never Gonna Give You Up (Official Music Video)"),
            "rick astley"
        );
        assert_eq!(normalize_title("Blinding Lights (Official Video)"), "blinding lights");
        assert_eq!(normalize_title("Song Title [HD] [Lyrics]"), "song title");
        assert_eq!(normalize_title("Bad Guy (1080p)"), "bad guy");
    }

    #[test]
    fn test_keeps_text_before_first_separator() {
        assert_eq!(normalize_title("Clair de Lune | Piano"), "clair de lune");
        assert_eq!(normalize_title("Up / Down – Mix"), "up");
        assert_eq!(normalize_title("Intro – Outro"), "intro");
        // No surrounding whitespace, not a separator
        assert_eq!(normalize_title("AC/DC"), "ac/dc");
    }

    #[test]
    fn test_strips_featuring_clause() {
        assert_eq!(normalize_title("Get Lucky ft. Pharrell Williams"), "get lucky");
        assert_eq!(normalize_title("Track (feat. Someone)"), "track");
        assert_eq!(normalize_title("Track [ft Someone]"), "track");
        assert_eq!(normalize_title("Left Turn"), "left turn");
    }

    #[test]
    fn test_strips_trailing_years() {
        assert_eq!(normalize_title("Old Song (1987)"), "old song");
        assert_eq!(normalize_title("Old Song (1987) (2003)"), "old song");
        assert_eq!(normalize_title("1999 (Prince)"), "1999 (prince)");
    }

    #[test]
    fn test_noise_only_titles_become_empty() {
        assert_eq!(normalize_title("(Official Video)"), "");
        assert_eq!(normalize_title("   "), "");
        assert_eq!(normalize_title(""), "");
        assert_eq!(normalize_title("ft. Nobody"), "");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        for sample in SAMPLES {
            let once = normalize_title(sample);
            let twice = normalize_title(&once);
            assert_eq!(once, twice, "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn test_artist_hint_suffixes() {
        assert_eq!(
            normalize_artist_hint(Some("Daft Punk - Topic")),
            Some("Daft Punk".to_string())
        );
        assert_eq!(
            normalize_artist_hint(Some("RickAstleyVEVO")),
            Some("RickAstley".to_string())
        );
        assert_eq!(
            normalize_artist_hint(Some("  Adele vevo ")),
            Some("Adele".to_string())
        );
        assert_eq!(normalize_artist_hint(Some(" - Topic")), None);
        assert_eq!(normalize_artist_hint(Some("VEVO")), None);
        assert_eq!(normalize_artist_hint(Some("   ")), None);
        assert_eq!(normalize_artist_hint(None), None);
    }
}

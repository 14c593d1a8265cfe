//! Exercise records and the metadata shown around the board.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::PgnError;

static TAG_PAIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\[(\w+)\s+"([^"]*)"\]"#).unwrap());

static FILENAME_STRIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9\-_ ]").unwrap());

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

const UNKNOWN_TAG: &str = "?";
const UNKNOWN_DATE: &str = "????.??.??";
const DEFAULT_FILENAME: &str = "chess_game";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Exercise {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub pgn_content: Option<String>,
    pub event_name: Option<String>,
    pub eco: Option<String>,
}

impl Exercise {
    /// An exercise built from a bare PGN file.
    pub fn from_pgn(title: Option<String>, pgn: &str) -> Self {
        let headers = parse_headers(pgn);
        Self {
            id: None,
            title,
            pgn_content: Some(pgn.to_string()),
            event_name: headers.get("Event").cloned(),
            eco: headers.get("ECO").cloned(),
        }
    }

    pub fn pgn(&self) -> &str {
        self.pgn_content.as_deref().unwrap_or("")
    }

    /// Case-insensitive substring match on title, event name and ECO.
    /// `term` is expected lowercased and trimmed.
    pub fn matches(&self, term: &str) -> bool {
        [&self.title, &self.event_name, &self.eco]
            .into_iter()
            .any(|field| {
                field
                    .as_deref()
                    .is_some_and(|value| value.to_lowercase().contains(term))
            })
    }

    pub fn heading(&self) -> Heading {
        Heading::new(&parse_headers(self.pgn()), self.title.as_deref())
    }

    /// `<title>.pgn` with unsafe characters removed, `None` without PGN.
    pub fn download(&self) -> Option<(String, &str)> {
        let pgn = self.pgn_content.as_deref()?;
        Some((download_filename(self.title.as_deref()), pgn))
    }
}

/// Tag pairs of a PGN, later duplicates winning.
pub fn parse_headers(pgn: &str) -> HashMap<String, String> {
    TAG_PAIR_RE
        .captures_iter(pgn)
        .map(|cap| (cap[1].to_string(), cap[2].to_string()))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// `White - Black Result`.
    pub title: String,
    /// Event, ECO and date joined by ` • `, or the exercise title.
    pub subtitle: String,
}

impl Heading {
    pub fn new(headers: &HashMap<String, String>, exercise_title: Option<&str>) -> Self {
        let tag = |name: &str| headers.get(name).map(String::as_str).unwrap_or("");

        let result = headers.get("Result").map(String::as_str).unwrap_or("*");
        let title = format!("{} - {} {}", tag("White"), tag("Black"), result);

        let parts: Vec<&str> = [
            known(tag("Event"), UNKNOWN_TAG),
            known(tag("ECO"), UNKNOWN_TAG),
            known(tag("Date"), UNKNOWN_DATE),
        ]
        .into_iter()
        .flatten()
        .collect();

        let subtitle = if parts.is_empty() {
            exercise_title.unwrap_or("").to_string()
        } else {
            parts.join(" • ")
        };

        Self { title, subtitle }
    }
}

fn known<'a>(value: &'a str, placeholder: &str) -> Option<&'a str> {
    (!value.is_empty() && value != placeholder).then_some(value)
}

pub fn download_filename(title: Option<&str>) -> String {
    let title = title.filter(|t| !t.is_empty()).unwrap_or(DEFAULT_FILENAME);
    let stripped = FILENAME_STRIP_RE.replace_all(title, "");
    let name = WHITESPACE_RE.replace_all(&stripped, "_");
    format!("{name}.pgn")
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogPayload {
    Plain(Vec<Exercise>),
    Envelope { data: CatalogData },
}

#[derive(Deserialize)]
struct CatalogData {
    #[serde(default)]
    exercises: Vec<Exercise>,
}

/// The list of exercises a user can pick from.
#[derive(Debug, Clone, Default)]
pub struct ExerciseCatalog {
    exercises: Vec<Exercise>,
}

impl ExerciseCatalog {
    pub fn new(exercises: Vec<Exercise>) -> Self {
        Self { exercises }
    }

    /// Accepts a bare array or the API envelope `{"data": {"exercises": [...]}}`.
    pub fn from_json(json: &str) -> Result<Self, PgnError> {
        let exercises = match serde_json::from_str::<CatalogPayload>(json)? {
            CatalogPayload::Plain(list) => list,
            CatalogPayload::Envelope { data } => data.exercises,
        };
        Ok(Self { exercises })
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Exercise> {
        self.exercises.get(index)
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    /// Indices of the exercises matching `term`; all of them for a blank term.
    pub fn filter(&self, term: &str) -> Vec<usize> {
        let term = term.trim().to_lowercase();
        self.exercises
            .iter()
            .enumerate()
            .filter(|(_, ex)| term.is_empty() || ex.matches(&term))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Dropdown entries for a filtered list: `(catalogue index, "N. Title")`,
    /// numbered by position in the filtered list.
    pub fn labels(&self, indices: &[usize]) -> Vec<(usize, String)> {
        indices
            .iter()
            .enumerate()
            .filter_map(|(pos, &idx)| {
                let ex = self.exercises.get(idx)?;
                Some((idx, label(pos, ex)))
            })
            .collect()
    }
}

pub fn label(position: usize, exercise: &Exercise) -> String {
    let title = exercise
        .title
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or("Untitled");
    format!("{}. {}", position + 1, title)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PGN: &str = r#"[Event "Paris Opera"]
[White "Morphy"]
[Black "Duke and Count"]
[Result "1-0"]
[Date "1858.??.??"]
[ECO "C41"]

1. e4 e5 2. Nf3 d6 1-0"#;

    fn exercise(title: Option<&str>, event: Option<&str>, eco: Option<&str>) -> Exercise {
        Exercise {
            id: Some(1),
            title: title.map(String::from),
            pgn_content: Some("1. e4".into()),
            event_name: event.map(String::from),
            eco: eco.map(String::from),
        }
    }

    #[test]
    fn test_parse_headers() {
        let headers = parse_headers(PGN);
        assert_eq!(headers.get("White").map(String::as_str), Some("Morphy"));
        assert_eq!(headers.get("Date").map(String::as_str), Some("1858.??.??"));
        assert_eq!(headers.len(), 6);
    }

    #[test]
    fn test_heading_with_full_headers() {
        let heading = Heading::new(&parse_headers(PGN), Some("Opera"));
        assert_eq!(heading.title, "Morphy - Duke and Count 1-0");
        assert_eq!(heading.subtitle, "Paris Opera • C41 • 1858.??.??");
    }

    #[test]
    fn test_heading_skips_placeholders_and_falls_back_to_title() {
        let pgn = r#"[Event "?"] [ECO "?"] [Date "????.??.??"] [White "A"]"#;
        let heading = Heading::new(&parse_headers(pgn), Some("Mate in two"));
        assert_eq!(heading.title, "A -  *");
        assert_eq!(heading.subtitle, "Mate in two");

        let bare = Heading::new(&HashMap::new(), None);
        assert_eq!(bare.subtitle, "");
    }

    #[test]
    fn test_filter_matches_title_event_and_eco() {
        let catalog = ExerciseCatalog::new(vec![
            exercise(Some("Rook endgame"), None, None),
            exercise(None, Some("Club Open"), Some("B90")),
            exercise(Some("Sicilian trap"), None, Some("B20")),
        ]);
        assert_eq!(catalog.filter("  ROOK "), vec![0]);
        assert_eq!(catalog.filter("club"), vec![1]);
        assert_eq!(catalog.filter("b"), vec![1, 2]);
        assert_eq!(catalog.filter(""), vec![0, 1, 2]);
        assert!(catalog.filter("najdorf").is_empty());
    }

    #[test]
    fn test_labels_number_filtered_list() {
        let catalog = ExerciseCatalog::new(vec![
            exercise(Some("First"), None, None),
            exercise(None, None, Some("A00")),
            exercise(Some(""), None, Some("A00")),
        ]);
        let labels = catalog.labels(&catalog.filter("a00"));
        assert_eq!(
            labels,
            vec![(1, "1. Untitled".to_string()), (2, "2. Untitled".to_string())]
        );
    }

    #[test]
    fn test_download_filename() {
        assert_eq!(download_filename(Some("Morphy's  Opera game!")), "Morphys_Opera_game.pgn");
        assert_eq!(download_filename(Some("a-b_c")), "a-b_c.pgn");
        assert_eq!(download_filename(None), "chess_game.pgn");
        assert_eq!(download_filename(Some("")), "chess_game.pgn");

        let mut ex = exercise(Some("x y"), None, None);
        assert_eq!(ex.download(), Some(("x_y.pgn".to_string(), "1. e4")));
        ex.pgn_content = None;
        assert_eq!(ex.download(), None);
    }

    #[test]
    fn test_catalog_from_plain_array_and_envelope() {
        let plain = r#"[{"id": 3, "title": "T", "pgn_content": "1. e4"}, {"title": null}]"#;
        let catalog = ExerciseCatalog::from_json(plain).expect("plain array");
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(0).and_then(|e| e.id), Some(3));
        assert_eq!(catalog.get(1).map(Exercise::pgn), Some(""));

        let envelope = r#"{"success": true, "data": {"exercises": [{"id": 7, "eco": "C41"}], "userTier": "free"}}"#;
        let catalog = ExerciseCatalog::from_json(envelope).expect("envelope");
        assert_eq!(catalog.get(0).and_then(|e| e.eco.clone()), Some("C41".into()));

        assert!(matches!(
            ExerciseCatalog::from_json("not json"),
            Err(PgnError::Catalogue(_))
        ));
    }

    #[test]
    fn test_exercise_from_pgn() {
        let ex = Exercise::from_pgn(Some("Opera".into()), PGN);
        assert_eq!(ex.event_name.as_deref(), Some("Paris Opera"));
        assert_eq!(ex.eco.as_deref(), Some("C41"));
        assert_eq!(ex.heading().title, "Morphy - Duke and Count 1-0");
    }
}

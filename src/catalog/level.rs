use serde::{Deserialize, Serialize};

/// A single curriculum unit of the game.
///
/// Levels are static: they are loaded once at startup and never mutated.
/// The wire format keeps the original camelCase field names so existing
/// clients keep working unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub task: String,
    pub hint: String,
    /// Canonical solution query text. Used only as a fuzzy text-match
    /// target by the answer checker, never executed for comparison.
    pub solution: String,
    /// Audio token unlocked by the presentation layer on success.
    pub reward: String,
    pub table_hints: Vec<String>,
    pub difficulty: String,
    pub concepts_introduced: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_field_names() {
        let level = Level {
            id: 1,
            title: "The Rookie Manager".to_string(),
            description: "desc".to_string(),
            task: "task".to_string(),
            hint: "hint".to_string(),
            solution: "SELECT name FROM Artists;".to_string(),
            reward: "guitar-riff.mp3".to_string(),
            table_hints: vec!["Artists".to_string()],
            difficulty: "Easy".to_string(),
            concepts_introduced: vec!["SELECT statement".to_string()],
        };

        let json = serde_json::to_value(&level).unwrap();
        assert_eq!(json["tableHints"][0], "Artists");
        assert_eq!(json["conceptsIntroduced"][0], "SELECT statement");
        assert!(json.get("table_hints").is_none());
    }
}

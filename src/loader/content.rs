//! Content file loader (.pairs format)
//!
//! ```text
//! [metadata]
//! Id=thought_reality
//! Title=Thought vs Reality
//! Left=thought
//! Right=reality
//! LeftLabel=Thought
//! RightLabel=Reality
//! Intro=...
//! Reflection=...
//!
//! [Pairs]
//! 1|I'm too old to start over|Dancers retrain successfully at every age
//! ```

use crate::core::{GameContent, Pair};
use crate::{MatchError, Result};
use std::fs;
use std::path::Path;

/// Loader for .pairs content files
pub struct ContentLoader;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Metadata,
    Pairs,
}

impl ContentLoader {
    /// Load a game from a .pairs file
    pub fn load_from_file(path: &Path) -> Result<GameContent> {
        let content = fs::read_to_string(path).map_err(MatchError::IoError)?;
        Self::parse(&content).map_err(|e| match e {
            MatchError::InvalidContentFormat(msg) => {
                MatchError::InvalidContentFormat(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    /// Parse a game from its text content
    pub fn parse(content: &str) -> Result<GameContent> {
        let mut section = Section::None;
        let mut saw_pairs = false;

        let mut id = None;
        let mut title = None;
        let mut left_tag = String::from("left");
        let mut right_tag = String::from("right");
        let mut left_label = None;
        let mut right_label = None;
        let mut intro = None;
        let mut reflection = None;
        let mut rows: Vec<(usize, u32, String, String)> = Vec::new();

        for (idx, raw) in content.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                section = match line[1..line.len() - 1].trim().to_lowercase().as_str() {
                    "metadata" => Section::Metadata,
                    "pairs" => {
                        saw_pairs = true;
                        Section::Pairs
                    }
                    other => {
                        return Err(MatchError::InvalidContentFormat(format!(
                            "line {line_no}: unknown section [{other}]"
                        )))
                    }
                };
                continue;
            }

            match section {
                Section::Metadata => {
                    let (key, value) = line.split_once('=').ok_or_else(|| {
                        MatchError::InvalidContentFormat(format!(
                            "line {line_no}: expected Key=Value"
                        ))
                    })?;
                    let value = value.trim().to_string();
                    match key.trim() {
                        "Id" => id = Some(value),
                        "Title" => title = Some(value),
                        "Left" => left_tag = value,
                        "Right" => right_tag = value,
                        "LeftLabel" => left_label = Some(value),
                        "RightLabel" => right_label = Some(value),
                        "Intro" => intro = Some(value),
                        "Reflection" => reflection = Some(value),
                        _ => {} // Ignore unknown keys
                    }
                }
                Section::Pairs => {
                    let mut parts = line.splitn(3, '|');
                    let (Some(id_str), Some(left), Some(right)) =
                        (parts.next(), parts.next(), parts.next())
                    else {
                        return Err(MatchError::InvalidContentFormat(format!(
                            "line {line_no}: expected id|left|right"
                        )));
                    };
                    let pair_id = id_str.trim().parse::<u32>().map_err(|_| {
                        MatchError::InvalidContentFormat(format!(
                            "line {line_no}: invalid pair id '{}'",
                            id_str.trim()
                        ))
                    })?;
                    let (left, right) = (left.trim(), right.trim());
                    if left.is_empty() || right.is_empty() {
                        return Err(MatchError::InvalidContentFormat(format!(
                            "line {line_no}: pair {pair_id} has an empty side"
                        )));
                    }
                    rows.push((line_no, pair_id, left.to_string(), right.to_string()));
                }
                Section::None => {
                    return Err(MatchError::InvalidContentFormat(format!(
                        "line {line_no}: content outside of a section"
                    )))
                }
            }
        }

        if !saw_pairs {
            return Err(MatchError::InvalidContentFormat(
                "missing [Pairs] section".to_string(),
            ));
        }
        if left_tag == right_tag {
            return Err(MatchError::InvalidContentFormat(format!(
                "Left and Right tags must differ (both '{left_tag}')"
            )));
        }

        let title = title.or_else(|| id.clone()).unwrap_or_else(|| "untitled".to_string());
        let game_id = id.unwrap_or_else(|| slugify(&title));

        let pairs = rows
            .into_iter()
            .map(|(_, pair_id, left, right)| {
                Pair::new(pair_id, left, left_tag.as_str(), right, right_tag.as_str())
            })
            .collect();

        let mut game = GameContent::new(game_id, pairs)?
            .with_title(title)
            .with_labels(
                left_label.unwrap_or_else(|| capitalize(&left_tag)),
                right_label.unwrap_or_else(|| capitalize(&right_tag)),
            );
        game.intro = intro;
        game.reflection = reflection;
        Ok(game)
    }
}

/// Derive a game id from a title: "Pensée & Réalité" -> "pensee_realite"
pub fn slugify(title: &str) -> String {
    let ascii = deunicode::deunicode(title).to_lowercase();
    let mut slug = String::with_capacity(ascii.len());
    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.ends_with('_') && !slug.is_empty() {
            slug.push('_');
        }
    }
    while slug.ends_with('_') {
        slug.pop();
    }
    slug
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PairId;

    #[test]
    fn test_parse_simple_content() {
        let content = r#"
# Thought reframing exercise
[metadata]
Id=thought_reality
Title=Thought vs Reality
Left=thought
Right=reality
Intro=Match each worry with what is actually true.

[Pairs]
1|I'm too old to start over|Career changers succeed at every age
2|Dance is all I know|Discipline and teamwork transfer everywhere
"#;

        let game = ContentLoader::parse(content).unwrap();
        assert_eq!(game.game_id, "thought_reality");
        assert_eq!(game.title, "Thought vs Reality");
        assert_eq!(game.left_label, "Thought");
        assert_eq!(game.right_label, "Reality");
        assert_eq!(game.len(), 2);
        assert_eq!(game.pairs()[0].left_tag, "thought");
        assert_eq!(game.pairs()[1].id, PairId::new(2));
        assert_eq!(game.pairs()[1].right_text, "Discipline and teamwork transfer everywhere");
        assert_eq!(
            game.intro.as_deref(),
            Some("Match each worry with what is actually true.")
        );
        assert!(game.reflection.is_none());
    }

    #[test]
    fn test_missing_id_derives_slug() {
        let content = "[metadata]\nTitle=Pensée & Réalité\nLeft=a\nRight=b\n[Pairs]\n1|x|y\n";
        let game = ContentLoader::parse(content).unwrap();
        assert_eq!(game.game_id, "pensee_realite");
    }

    #[test]
    fn test_empty_pairs_section_is_valid() {
        let game = ContentLoader::parse("[Pairs]\n").unwrap();
        assert!(game.is_empty());
        assert_eq!(game.game_id, "untitled");
    }

    #[test]
    fn test_missing_pairs_section() {
        let err = ContentLoader::parse("[metadata]\nTitle=Nothing\n").unwrap_err();
        assert!(err.to_string().contains("missing [Pairs]"));
    }

    #[test]
    fn test_malformed_pair_line() {
        let err = ContentLoader::parse("[Pairs]\n1|only left\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_bad_pair_id() {
        assert!(ContentLoader::parse("[Pairs]\nx|a|b\n").is_err());
    }

    #[test]
    fn test_duplicate_pair_id() {
        let err = ContentLoader::parse("[Pairs]\n1|a|b\n1|c|d\n").unwrap_err();
        assert!(matches!(err, MatchError::DuplicatePairId(1)));
    }

    #[test]
    fn test_same_tags_rejected() {
        assert!(ContentLoader::parse("[metadata]\nLeft=x\nRight=x\n[Pairs]\n1|a|b\n").is_err());
    }

    #[test]
    fn test_right_text_may_contain_pipe() {
        let game = ContentLoader::parse("[Pairs]\n1|a|b | c\n").unwrap();
        assert_eq!(game.pairs()[0].right_text, "b | c");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("  Term -- Definition!  "), "term_definition");
        assert_eq!(slugify("Résumé Builder"), "resume_builder");
    }
}

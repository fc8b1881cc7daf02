use crate::{Error, Result};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// A skill tag from the about-me content, later rendered as a bouncing circle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillTag {
    pub name: String,
    pub color: Option<String>,
}

impl SkillTag {
    /// URL-safe slug of the tag name (`"Rust / WASM"` -> `"rust-wasm"`).
    pub fn slug(&self) -> String {
        let mut out = String::with_capacity(self.name.len());
        for ch in self.name.chars() {
            if ch.is_alphanumeric() {
                out.extend(ch.to_lowercase());
            } else if ch == '+' {
                out.push_str("plus");
            } else if ch == '#' {
                out.push_str("sharp");
            } else if !out.ends_with('-') && !out.is_empty() {
                out.push('-');
            }
        }
        while out.ends_with('-') {
            out.pop();
        }
        out
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireTag {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        color: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SkillFeed {
    Bare(Vec<WireTag>),
    Skills { skills: Vec<WireTag> },
}

/// Parses a skill feed (bare array or `{ "skills": [...] }`) of strings or `{name, color}`
/// objects. Blank names and case-insensitive duplicates are dropped, first occurrence wins.
pub fn parse_skill_feed(json: &str) -> Result<Vec<SkillTag>> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let feed: SkillFeed = serde_json::from_value(value).map_err(|e| Error::InvalidFeed {
        message: format!("unrecognized skill feed shape: {e}"),
    })?;
    let wire = match feed {
        SkillFeed::Bare(tags) | SkillFeed::Skills { skills: tags } => tags,
    };

    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut out = Vec::with_capacity(wire.len());
    for tag in wire {
        let (name, color) = match tag {
            WireTag::Name(name) => (name, None),
            WireTag::Full { name, color } => (name, color),
        };
        let name = name.trim().to_string();
        if name.is_empty() || !seen.insert(name.to_lowercase()) {
            continue;
        }
        let color = color.map(|c| c.trim().to_string()).filter(|c| !c.is_empty());
        out.push(SkillTag { name, color });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_strings_and_objects() {
        let tags = parse_skill_feed(
            r##"{"skills":["Rust", {"name":"TypeScript","color":"#3178c6"}, " rust ", ""]}"##,
        )
        .unwrap();
        assert_eq!(
            tags,
            vec![
                SkillTag {
                    name: "Rust".to_string(),
                    color: None
                },
                SkillTag {
                    name: "TypeScript".to_string(),
                    color: Some("#3178c6".to_string())
                },
            ]
        );
    }

    #[test]
    fn slugs_are_url_safe() {
        let tag = |name: &str| SkillTag {
            name: name.to_string(),
            color: None,
        };
        assert_eq!(tag("Rust / WASM").slug(), "rust-wasm");
        assert_eq!(tag("C++").slug(), "cplusplus");
        assert_eq!(tag("C#").slug(), "csharp");
        assert_eq!(tag("  Node.js ").slug(), "node-js");
    }
}

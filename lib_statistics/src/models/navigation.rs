//! # Navigation Links
//!
//! The catalog is navigated through a tree of links: a link either leads to
//! a nested navigation level or to a table. The hierarchy is implicit in the
//! id strings themselves — there is no parent pointer on the wire — and the
//! [`classification_path`] resolver reconstructs the ancestor chain from the
//! id's length using the fixed truncation rules of the national
//! classification-code scheme.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

use serde::Deserialize;

/// # Navigation Link
///
/// One node of the catalog tree. The wire shape is
/// `{"type": "l"|"t", "id", "text", "updated"?}`; an unrecognized `type` is
/// a hard decode error, never silently defaulted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type")]
pub enum NavigationLink {
    /// A nested navigation level.
    #[serde(rename = "l")]
    Level {
        /// The classification code identifying the level.
        id: String,
        /// A label to display for the link.
        text: String,
    },
    /// A reference to a table.
    #[serde(rename = "t")]
    Table {
        /// The table id.
        id: String,
        /// A label to display for the link.
        text: String,
        /// When the table was last updated.
        updated: String,
    },
}

impl NavigationLink {
    /// The link to the root of the catalog.
    pub fn root() -> Self {
        NavigationLink::Level {
            id: String::new(),
            text: String::new(),
        }
    }

    /// The id of the nested level or table.
    pub fn id(&self) -> &str {
        match self {
            NavigationLink::Level { id, .. } => id,
            NavigationLink::Table { id, .. } => id,
        }
    }

    /// A label to display for the link.
    pub fn label(&self) -> &str {
        match self {
            NavigationLink::Level { text, .. } => text,
            NavigationLink::Table { text, .. } => text,
        }
    }

    /// When the table was last updated. Level links return `None`.
    pub fn updated(&self) -> Option<&str> {
        match self {
            NavigationLink::Level { .. } => None,
            NavigationLink::Table { updated, .. } => Some(updated),
        }
    }

    /// The ancestor chain of this link's id, root first, the id itself last.
    /// See [`classification_path`].
    pub fn classification_path(&self) -> Vec<String> {
        classification_path(self.id())
    }
}

/// Derives the ordered root-to-leaf chain of ancestor codes for a
/// classification code, used for breadcrumbs and iconography.
///
/// Parent derivation is keyed on code length alone:
/// a 6-character code's parent is its first 2 characters, a 7-character
/// code's parent is its first 6, and a 9-character code's parent is its
/// first 6 concatenated with its last character. Any other length has no
/// derivable parent and resolution stops there.
///
/// This is a heuristic over one specific national classification scheme,
/// not a general rule; the length thresholds are load-bearing.
pub fn classification_path(code: &str) -> Vec<String> {
    let mut chain = vec![code.to_string()];
    let mut current = code.to_string();

    loop {
        let parent = parent_code(&current);
        if parent.is_empty() {
            break;
        }
        chain.push(parent.clone());
        current = parent;
    }

    chain.reverse();
    chain
}

/// The parent of a classification code, or an empty string when none is
/// derivable. Lengths are counted in characters, not bytes.
fn parent_code(code: &str) -> String {
    let chars: Vec<char> = code.chars().collect();
    match chars.len() {
        6 => chars[..2].iter().collect(),
        7 => chars[..6].iter().collect(),
        9 => {
            let mut parent: String = chars[..6].iter().collect();
            parent.push(chars[8]);
            parent
        }
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_for_six_character_code() {
        // A 6-character code's parent is its first 2 characters
        assert_eq!(classification_path("BE0101"), vec!["BE", "BE0101"]);
    }

    #[test]
    fn test_path_for_seven_character_code() {
        // 7 chars -> first 6 -> first 2
        assert_eq!(
            classification_path("BE0101A"),
            vec!["BE", "BE0101", "BE0101A"]
        );
    }

    #[test]
    fn test_path_for_nine_character_code() {
        // 9 chars -> first 6 + last char (7 chars) -> first 6 -> first 2
        assert_eq!(
            classification_path("AM0208B01"),
            vec!["AM", "AM0208", "AM02081", "AM0208B01"]
        );
    }

    #[test]
    fn test_path_stops_for_other_lengths() {
        // 8 characters is not in the {6, 7, 9} scheme: no derivable parent
        assert_eq!(classification_path("BE0101N1"), vec!["BE0101N1"]);
        assert_eq!(classification_path("BE"), vec!["BE"]);
        assert_eq!(classification_path(""), vec![""]);
    }

    #[test]
    fn test_decode_level_and_table_links() {
        let payload = r#"[
            {"type": "l", "id": "BE", "text": "Befolkning"},
            {"type": "t", "id": "BefolkningNy", "text": "Folkmängd", "updated": "2021-02-22T09:30:00"}
        ]"#;
        let links: Vec<NavigationLink> = serde_json::from_str(payload).unwrap();

        assert_eq!(links.len(), 2);
        assert_eq!(links[0].id(), "BE");
        assert_eq!(links[0].label(), "Befolkning");
        assert_eq!(links[0].updated(), None);
        assert_eq!(links[1].updated(), Some("2021-02-22T09:30:00"));
    }

    #[test]
    fn test_unrecognized_link_type_is_a_hard_error() {
        let payload = r#"[{"type": "x", "id": "BE", "text": "Befolkning"}]"#;
        assert!(serde_json::from_str::<Vec<NavigationLink>>(payload).is_err());
    }

    #[test]
    fn test_root_link() {
        let root = NavigationLink::root();
        assert_eq!(root.id(), "");
        assert_eq!(root.label(), "");
    }
}

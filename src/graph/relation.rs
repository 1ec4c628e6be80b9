//! Relation vocabulary with stable string tokens.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Named direct relation: what the first person IS to the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    Father,
    Mother,
    Spouse,
    Brother,
    Sister,
    Child,
    Grandchild,
    PaternalGrandfather,
    PaternalGrandmother,
    MaternalGrandfather,
    MaternalGrandmother,
    FatherInLaw,
    MotherInLaw,
    SonInLaw,
    DaughterInLaw,
}

impl RelationKind {
    pub const ALL: [RelationKind; 15] = [
        RelationKind::Father,
        RelationKind::Mother,
        RelationKind::Spouse,
        RelationKind::Brother,
        RelationKind::Sister,
        RelationKind::Child,
        RelationKind::Grandchild,
        RelationKind::PaternalGrandfather,
        RelationKind::PaternalGrandmother,
        RelationKind::MaternalGrandfather,
        RelationKind::MaternalGrandmother,
        RelationKind::FatherInLaw,
        RelationKind::MotherInLaw,
        RelationKind::SonInLaw,
        RelationKind::DaughterInLaw,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            RelationKind::Father => "father",
            RelationKind::Mother => "mother",
            RelationKind::Spouse => "spouse",
            RelationKind::Brother => "brother",
            RelationKind::Sister => "sister",
            RelationKind::Child => "child",
            RelationKind::Grandchild => "grandchild",
            RelationKind::PaternalGrandfather => "paternal_grandfather",
            RelationKind::PaternalGrandmother => "paternal_grandmother",
            RelationKind::MaternalGrandfather => "maternal_grandfather",
            RelationKind::MaternalGrandmother => "maternal_grandmother",
            RelationKind::FatherInLaw => "father_in_law",
            RelationKind::MotherInLaw => "mother_in_law",
            RelationKind::SonInLaw => "son_in_law",
            RelationKind::DaughterInLaw => "daughter_in_law",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.token() == token)
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Coarse category of one hop along a connecting path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Parent,
    Child,
    Spouse,
    Sibling,
    Kin,
}

impl EdgeKind {
    pub fn token(&self) -> &'static str {
        match self {
            EdgeKind::Parent => "parent",
            EdgeKind::Child => "child",
            EdgeKind::Spouse => "spouse",
            EdgeKind::Sibling => "sibling",
            EdgeKind::Kin => "kin",
        }
    }
}

/// Label for one hop `from -> to`: what `from` is to `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeLabel {
    Father,
    Mother,
    Child,
    Spouse,
    Brother,
    Sister,
    Kin,
}

impl EdgeLabel {
    pub fn token(&self) -> &'static str {
        match self {
            EdgeLabel::Father => "father",
            EdgeLabel::Mother => "mother",
            EdgeLabel::Child => "child",
            EdgeLabel::Spouse => "spouse",
            EdgeLabel::Brother => "brother",
            EdgeLabel::Sister => "sister",
            EdgeLabel::Kin => "kin",
        }
    }

    pub fn kind(&self) -> EdgeKind {
        match self {
            EdgeLabel::Father | EdgeLabel::Mother => EdgeKind::Parent,
            EdgeLabel::Child => EdgeKind::Child,
            EdgeLabel::Spouse => EdgeKind::Spouse,
            EdgeLabel::Brother | EdgeLabel::Sister => EdgeKind::Sibling,
            EdgeLabel::Kin => EdgeKind::Kin,
        }
    }
}

impl fmt::Display for EdgeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_match_serde_names() {
        for kind in RelationKind::ALL {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, kind.token());
            assert_eq!(RelationKind::from_token(kind.token()), Some(kind));
        }
    }

    #[test]
    fn test_edge_label_categories() {
        assert_eq!(EdgeLabel::Father.kind().token(), "parent");
        assert_eq!(EdgeLabel::Sister.kind().token(), "sibling");
        assert_eq!(EdgeLabel::Kin.kind(), EdgeKind::Kin);
        assert_eq!(EdgeLabel::Child.to_string(), "child");
    }
}

//! Display labels for relation tokens and resolver messages.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::KinmcpError;
use crate::graph::{EdgeLabel, RelationKind};

/// Output language. Persian matches the stored family data and is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Fa,
    En,
}

/// Message keys for resolver failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    MissingNames,
    SelfComparison,
    PersonNotFound,
    NoRelation,
}

impl Locale {
    pub fn code(&self) -> &'static str {
        match self {
            Locale::Fa => "fa",
            Locale::En => "en",
        }
    }

    pub fn relation(&self, kind: RelationKind) -> &'static str {
        match self {
            Locale::Fa => match kind {
                RelationKind::Father => "پدر",
                RelationKind::Mother => "مادر",
                RelationKind::Spouse => "همسر",
                RelationKind::Brother => "برادر",
                RelationKind::Sister => "خواهر",
                RelationKind::Child => "فرزند",
                RelationKind::Grandchild => "نوه",
                RelationKind::PaternalGrandfather => "پدربزرگ پدری",
                RelationKind::PaternalGrandmother => "مادربزرگ پدری",
                RelationKind::MaternalGrandfather => "پدربزرگ مادری",
                RelationKind::MaternalGrandmother => "مادربزرگ مادری",
                RelationKind::FatherInLaw => "پدرشوهر",
                RelationKind::MotherInLaw => "مادرشوهر",
                RelationKind::SonInLaw => "داماد",
                RelationKind::DaughterInLaw => "عروس",
            },
            Locale::En => match kind {
                RelationKind::Father => "father",
                RelationKind::Mother => "mother",
                RelationKind::Spouse => "spouse",
                RelationKind::Brother => "brother",
                RelationKind::Sister => "sister",
                RelationKind::Child => "child",
                RelationKind::Grandchild => "grandchild",
                RelationKind::PaternalGrandfather => "paternal grandfather",
                RelationKind::PaternalGrandmother => "paternal grandmother",
                RelationKind::MaternalGrandfather => "maternal grandfather",
                RelationKind::MaternalGrandmother => "maternal grandmother",
                RelationKind::FatherInLaw => "father-in-law",
                RelationKind::MotherInLaw => "mother-in-law",
                RelationKind::SonInLaw => "son-in-law",
                RelationKind::DaughterInLaw => "daughter-in-law",
            },
        }
    }

    pub fn edge(&self, label: EdgeLabel) -> &'static str {
        match label {
            EdgeLabel::Father => self.relation(RelationKind::Father),
            EdgeLabel::Mother => self.relation(RelationKind::Mother),
            EdgeLabel::Child => self.relation(RelationKind::Child),
            EdgeLabel::Spouse => self.relation(RelationKind::Spouse),
            EdgeLabel::Brother => self.relation(RelationKind::Brother),
            EdgeLabel::Sister => self.relation(RelationKind::Sister),
            EdgeLabel::Kin => match self {
                Locale::Fa => "خویشاوند",
                Locale::En => "relative",
            },
        }
    }

    /// Placeholder for a path node whose record cannot be found.
    pub fn unknown_name(&self) -> &'static str {
        match self {
            Locale::Fa => "نامشخص",
            Locale::En => "unknown",
        }
    }

    pub fn message(&self, message: Message) -> &'static str {
        match (self, message) {
            (Locale::Fa, Message::MissingNames) => "لطفاً هر دو نفر را انتخاب کنید",
            (Locale::Fa, Message::SelfComparison) => "نمی‌توان یک نفر را با خودش مقایسه کرد",
            (Locale::Fa, Message::PersonNotFound) => "یکی از افراد پیدا نشد",
            (Locale::Fa, Message::NoRelation) => "هیچ رابطه خویشاوندی بین این دو شخص وجود ندارد",
            (Locale::En, Message::MissingNames) => "Please select both people",
            (Locale::En, Message::SelfComparison) => "Cannot compare a person to themself",
            (Locale::En, Message::PersonNotFound) => "One of the people was not found",
            (Locale::En, Message::NoRelation) => "There is no kinship connection between these two people",
        }
    }
}

impl FromStr for Locale {
    type Err = KinmcpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fa" | "persian" => Ok(Locale::Fa),
            "en" | "english" => Ok(Locale::En),
            other => Err(KinmcpError::Config(format!(
                "Unsupported locale '{}' (expected 'fa' or 'en')",
                other
            ))),
        }
    }
}

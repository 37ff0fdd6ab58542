use std::fmt;
use std::sync::Arc;

/// Coarse category assigned to a blocked domain at import time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DomainCategory {
    #[default]
    General,
    Adult,
    Gambling,
    SocialMedia,
}

const ADULT_KEYWORDS: &[&str] = &["porn", "adult", "sex", "xxx"];
const GAMBLING_KEYWORDS: &[&str] = &["bet", "casino", "gamble", "lottery", "poker"];
const SOCIAL_KEYWORDS: &[&str] = &[
    "facebook",
    "instagram",
    "twitter",
    "tiktok",
    "reddit",
    "social",
];

impl DomainCategory {
    /// Keyword classification of a normalised domain. First match wins, in
    /// the order Adult, Gambling, Social Media.
    pub fn classify(domain: &str) -> Self {
        let contains_any = |keywords: &[&str]| keywords.iter().any(|k| domain.contains(k));

        if contains_any(ADULT_KEYWORDS) {
            DomainCategory::Adult
        } else if contains_any(GAMBLING_KEYWORDS) {
            DomainCategory::Gambling
        } else if contains_any(SOCIAL_KEYWORDS) {
            DomainCategory::SocialMedia
        } else {
            DomainCategory::General
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DomainCategory::General => "General",
            DomainCategory::Adult => "Adult",
            DomainCategory::Gambling => "Gambling",
            DomainCategory::SocialMedia => "Social Media",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "General" => Some(DomainCategory::General),
            "Adult" => Some(DomainCategory::Adult),
            "Gambling" => Some(DomainCategory::Gambling),
            "Social Media" => Some(DomainCategory::SocialMedia),
            _ => None,
        }
    }
}

impl fmt::Display for DomainCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the authoritative blocked-domain store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockedDomain {
    pub domain: Arc<str>,
    pub category: DomainCategory,
}

impl BlockedDomain {
    /// Builds a record for an already normalised domain, classifying it.
    pub fn classified(domain: &str) -> Self {
        Self {
            domain: Arc::from(domain),
            category: DomainCategory::classify(domain),
        }
    }
}

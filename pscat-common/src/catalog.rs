//! Catalog vocabulary
//!
//! Closed value sets used by problem statements. Every enum serializes as
//! its display string, which is also the exact text accepted when parsing
//! user input (CSV cells, JSON request fields, query parameters).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Prefix used for domains without an entry in the prefix table
pub const FALLBACK_PREFIX: &str = "GEN";

/// Domain classification of a problem statement
///
/// Each domain maps to the three-letter prefix of its custom identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Domain {
    #[serde(rename = "AI & Machine Learning")]
    AiMachineLearning,
    #[serde(rename = "Web Development")]
    WebDevelopment,
    #[serde(rename = "Mobile Development")]
    MobileDevelopment,
    #[serde(rename = "IoT & Embedded Systems")]
    IotEmbeddedSystems,
    #[serde(rename = "Cybersecurity")]
    Cybersecurity,
    #[serde(rename = "Data Science & Analytics")]
    DataScienceAnalytics,
    #[serde(rename = "Cloud Computing")]
    CloudComputing,
    #[serde(rename = "Blockchain")]
    Blockchain,
}

impl Domain {
    /// All domains in display order
    pub const ALL: [Domain; 8] = [
        Domain::AiMachineLearning,
        Domain::WebDevelopment,
        Domain::MobileDevelopment,
        Domain::IotEmbeddedSystems,
        Domain::Cybersecurity,
        Domain::DataScienceAnalytics,
        Domain::CloudComputing,
        Domain::Blockchain,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::AiMachineLearning => "AI & Machine Learning",
            Domain::WebDevelopment => "Web Development",
            Domain::MobileDevelopment => "Mobile Development",
            Domain::IotEmbeddedSystems => "IoT & Embedded Systems",
            Domain::Cybersecurity => "Cybersecurity",
            Domain::DataScienceAnalytics => "Data Science & Analytics",
            Domain::CloudComputing => "Cloud Computing",
            Domain::Blockchain => "Blockchain",
        }
    }

    /// Three-letter custom identifier prefix
    pub fn prefix(&self) -> &'static str {
        match self {
            Domain::AiMachineLearning => "AIM",
            Domain::WebDevelopment => "WEB",
            Domain::MobileDevelopment => "MOB",
            Domain::IotEmbeddedSystems => "IOT",
            Domain::Cybersecurity => "CYB",
            Domain::DataScienceAnalytics => "DSA",
            Domain::CloudComputing => "CLD",
            Domain::Blockchain => "BLK",
        }
    }

    /// Comma separated list of every allowed display string
    pub fn allowed_values() -> String {
        Domain::ALL
            .iter()
            .map(|d| d.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Prefix for a stored domain string
///
/// Stored rows keep the domain as text, so legacy values outside the enum
/// still need a prefix.
pub fn prefix_for_domain(domain: &str) -> &'static str {
    domain
        .parse::<Domain>()
        .map(|d| d.prefix())
        .unwrap_or(FALLBACK_PREFIX)
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Domain::ALL
            .iter()
            .copied()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown domain: {}", s)))
    }
}

/// Project category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Major,
    Minor,
    Capstone,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Major, Category::Minor, Category::Capstone];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Major => "Major",
            Category::Minor => "Minor",
            Category::Capstone => "Capstone",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown category: {}", s)))
    }
}

/// Expected difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .iter()
            .copied()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown difficulty: {}", s)))
    }
}

/// Publication status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Status {
    Active,
    #[default]
    Draft,
    Archived,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Active, Status::Draft, Status::Archived];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Active => "Active",
            Status::Draft => "Draft",
            Status::Archived => "Archived",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .iter()
            .copied()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown status: {}", s)))
    }
}

//! Skill selection: the toggleable skill set and the static skill catalog.

use serde::{Deserialize, Serialize};

/// A skill category shown during selection.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SkillCategory {
    pub name: &'static str,
    pub skills: &'static [&'static str],
}

/// Skills offered for selection, grouped by category.
pub const SKILL_CATALOG: &[SkillCategory] = &[
    SkillCategory {
        name: "IT & Development",
        skills: &[
            "Python",
            "JavaScript",
            "React",
            "Node.js",
            "SQL",
            "NoSQL",
            "Cloud Computing (AWS/Azure/GCP)",
            "DevOps",
            "Cybersecurity",
            "Machine Learning",
            "Data Structures & Algorithms",
        ],
    },
    SkillCategory {
        name: "Marketing",
        skills: &[
            "SEO/SEM",
            "Content Marketing",
            "Social Media Marketing",
            "Email Marketing",
            "Marketing Analytics",
            "PPC Advertising",
            "Brand Management",
            "Copywriting",
            "UX/UI Design Principles",
        ],
    },
    SkillCategory {
        name: "Finance",
        skills: &[
            "Financial Modeling",
            "Data Analysis for Finance",
            "Investment Management",
            "Corporate Finance",
            "Risk Management",
            "Blockchain & Cryptocurrencies",
            "Algorithmic Trading",
            "Accounting Principles",
            "Valuation",
        ],
    },
];

pub fn skill_catalog() -> &'static [SkillCategory] {
    SKILL_CATALOG
}

pub fn is_known_skill(skill: &str) -> bool {
    SKILL_CATALOG
        .iter()
        .any(|category| category.skills.contains(&skill))
}

/// Catalog skills flattened in display order, for numbered selection.
pub fn numbered_skills() -> Vec<&'static str> {
    SKILL_CATALOG
        .iter()
        .flat_map(|category| category.skills.iter().copied())
        .collect()
}

/// Insertion-ordered set of skill tags.
///
/// Removing and re-adding a skill moves it to the end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillSet(Vec<String>);

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `skill`. Returns true if it is now selected.
    pub fn toggle(&mut self, skill: &str) -> bool {
        if let Some(pos) = self.0.iter().position(|s| s == skill) {
            self.0.remove(pos);
            false
        } else {
            self.0.push(skill.to_string());
            true
        }
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.0.iter().any(|s| s == skill)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn join(&self, sep: &str) -> String {
        self.0.join(sep)
    }
}

impl<S: Into<String>> FromIterator<S> for SkillSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = SkillSet::new();
        for skill in iter {
            let skill = skill.into();
            if !set.contains(&skill) {
                set.0.push(skill);
            }
        }
        set
    }
}

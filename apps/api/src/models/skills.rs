//! Skill lists. The `jobs.skills` column stores comma-separated text; everything
//! above the storage edge works with `Skills`.

use std::collections::BTreeSet;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

/// Ordered list of trimmed, non-empty skills as the recruiter typed them.
/// Commas inside an item split it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Skills(Vec<String>);

impl Skills {
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Skills(
            items
                .into_iter()
                .flat_map(|s| {
                    s.as_ref()
                        .split(',')
                        .map(|part| part.trim().to_string())
                        .collect::<Vec<_>>()
                })
                .filter(|s| !s.is_empty())
                .collect(),
        )
    }

    /// Decodes the stored comma-separated form.
    pub fn from_csv(csv: &str) -> Self {
        Self::new(csv.split(','))
    }

    /// Encodes for storage. Items never contain commas, so this round-trips.
    pub fn to_csv(&self) -> String {
        self.0.join(", ")
    }

    /// Lowercased skill set used for matching.
    pub fn tokens(&self) -> BTreeSet<String> {
        self.0.iter().map(|s| s.to_lowercase()).collect()
    }
}

impl Deref for Skills {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for Skills {
    fn from(items: Vec<String>) -> Self {
        Skills::new(items)
    }
}

impl From<Skills> for Vec<String> {
    fn from(skills: Skills) -> Self {
        skills.0
    }
}

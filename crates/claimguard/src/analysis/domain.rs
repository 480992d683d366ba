use serde::{Deserialize, Serialize};

use super::AnalysisError;

const MAX_AGE: u32 = 120;

/// Raw text handed over by the text-extraction collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDocument {
    text: String,
    page_count: u32,
    filename: String,
}

impl PolicyDocument {
    pub fn new(text: impl Into<String>, page_count: u32, filename: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            page_count,
            filename: filename.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Length in characters, as reported on the persisted policy.
    pub fn text_length(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether the extraction collaborator produced anything worth analyzing.
    pub fn is_usable(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// Policyholder attributes supplied alongside the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub age: u32,
    pub pre_existing_condition: Option<String>,
    pub declared_type: String,
}

impl UserProfile {
    pub fn new(
        age: u32,
        pre_existing_condition: Option<String>,
        declared_type: impl Into<String>,
    ) -> Result<Self, AnalysisError> {
        if age > MAX_AGE {
            return Err(AnalysisError::InvalidInput(format!(
                "age {age} is outside 0-{MAX_AGE}"
            )));
        }

        Ok(Self {
            age,
            pre_existing_condition: pre_existing_condition
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()),
            declared_type: declared_type.into(),
        })
    }

    /// Parses a free-text age field.
    pub fn parse_age(raw: &str) -> Result<u32, AnalysisError> {
        let age = raw
            .trim()
            .parse::<u32>()
            .map_err(|_| AnalysisError::InvalidInput(format!("age '{raw}' is not a whole number")))?;
        if age > MAX_AGE {
            return Err(AnalysisError::InvalidInput(format!(
                "age {age} is outside 0-{MAX_AGE}"
            )));
        }
        Ok(age)
    }

    /// The declared condition, unless blank or the literal "none".
    pub fn declared_condition(&self) -> Option<&str> {
        self.pre_existing_condition
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty() && !value.eq_ignore_ascii_case("none"))
    }

    pub fn has_declared_condition(&self) -> bool {
        self.declared_condition().is_some()
    }

    pub fn declared_category(&self) -> Option<PolicyCategory> {
        PolicyCategory::from_label(&self.declared_type)
    }
}

/// Policy categories known to the classifier and the risk scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyCategory {
    Health,
    Car,
    Life,
    Travel,
    Home,
    Bike,
}

impl PolicyCategory {
    pub const ALL: [PolicyCategory; 6] = [
        PolicyCategory::Health,
        PolicyCategory::Car,
        PolicyCategory::Life,
        PolicyCategory::Travel,
        PolicyCategory::Home,
        PolicyCategory::Bike,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            PolicyCategory::Health => "Health Insurance",
            PolicyCategory::Car => "Car Insurance",
            PolicyCategory::Life => "Life Insurance",
            PolicyCategory::Travel => "Travel Insurance",
            PolicyCategory::Home => "Home Insurance",
            PolicyCategory::Bike => "Bike Insurance",
        }
    }

    /// Case-insensitive lookup; the trailing "Insurance" is optional.
    pub fn from_label(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        let stem = normalized
            .strip_suffix("insurance")
            .map(str::trim_end)
            .unwrap_or(&normalized);

        Self::ALL.into_iter().find(|category| {
            category
                .label()
                .to_ascii_lowercase()
                .strip_suffix(" insurance")
                .is_some_and(|candidate| candidate == stem)
        })
    }
}

//! UserData - Who is taking the assessment
//!
//! Set once at intake and immutable afterwards. Validation happens here so
//! an invalid form can never produce a `UserData`.

use serde::{Deserialize, Serialize};

/// Highest completed education level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Education {
    HighSchool,
    Bachelors,
    Masters,
    Phd,
    Other,
}

impl Education {
    pub fn all() -> &'static [Education] {
        &[
            Education::HighSchool,
            Education::Bachelors,
            Education::Masters,
            Education::Phd,
            Education::Other,
        ]
    }

    /// Tag used in persisted state
    pub fn as_str(&self) -> &'static str {
        match self {
            Education::HighSchool => "high_school",
            Education::Bachelors => "bachelors",
            Education::Masters => "masters",
            Education::Phd => "phd",
            Education::Other => "other",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Education::HighSchool => "High School",
            Education::Bachelors => "Bachelor's Degree",
            Education::Masters => "Master's Degree",
            Education::Phd => "Ph.D.",
            Education::Other => "Other",
        }
    }

    pub fn parse(tag: &str) -> Option<Education> {
        Education::all().iter().copied().find(|e| e.as_str() == tag)
    }
}

impl core::fmt::Display for Education {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Intake data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    name: String,
    age: u32,
    education: Education,
}

impl UserData {
    /// Validate and build intake data
    pub fn new(name: impl Into<String>, age: u32, education: Education) -> Result<Self, IntakeError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(IntakeError::EmptyName);
        }
        if age == 0 {
            return Err(IntakeError::InvalidAge {
                input: age.to_string(),
            });
        }
        Ok(Self {
            name,
            age,
            education,
        })
    }

    /// Build from raw form fields, the way the intake form submits them
    pub fn from_form(name: &str, age: &str, education: &str) -> Result<Self, IntakeError> {
        let age = parse_age(age)?;
        let education = Education::parse(education.trim()).ok_or_else(|| {
            IntakeError::UnknownEducation {
                input: education.to_string(),
            }
        })?;
        Self::new(name, age, education)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn education(&self) -> Education {
        self.education
    }

    /// Re-check the invariants; used after deserializing untrusted data
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty() && self.age > 0
    }
}

/// Parse an age field: a positive integer
pub fn parse_age(input: &str) -> Result<u32, IntakeError> {
    match input.trim().parse::<u32>() {
        Ok(age) if age > 0 => Ok(age),
        _ => Err(IntakeError::InvalidAge {
            input: input.to_string(),
        }),
    }
}

/// Why an intake form was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeError {
    EmptyName,
    InvalidAge { input: String },
    UnknownEducation { input: String },
}

impl core::fmt::Display for IntakeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            IntakeError::EmptyName => write!(f, "Name must not be empty"),
            IntakeError::InvalidAge { input } => {
                write!(f, "Age must be a positive whole number, got '{}'", input)
            }
            IntakeError::UnknownEducation { input } => {
                write!(f, "Unknown education level: '{}'", input)
            }
        }
    }
}

impl std::error::Error for IntakeError {}

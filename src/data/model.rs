use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// EducationLevel – ordinal minimum-education requirement
// ---------------------------------------------------------------------------

/// Minimum education required by a posting, ordered from least to most.
/// Unknown labels are preserved in `Other` and sort after the known levels.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EducationLevel {
    Unspecified,
    NoDegree,
    HighSchool,
    Associate,
    Bachelor,
    Master,
    Doctorate,
    Other(String),
}

impl EducationLevel {
    /// Parse the level from a source-data label such as
    /// `"Bachelor's degree"` or `"High school or GED"`.
    pub fn parse(label: &str) -> Self {
        let trimmed = label.trim();
        if trimmed.is_empty() || trimmed == "[None]" {
            return EducationLevel::Unspecified;
        }
        let lower = trimmed.to_ascii_lowercase();
        if lower.contains("no education") || lower.contains("no degree") {
            EducationLevel::NoDegree
        } else if lower.contains("high school") || lower.contains("ged") {
            EducationLevel::HighSchool
        } else if lower.contains("associate") {
            EducationLevel::Associate
        } else if lower.contains("bachelor") {
            EducationLevel::Bachelor
        } else if lower.contains("master") {
            EducationLevel::Master
        } else if lower.contains("ph.d") || lower.contains("phd") || lower.contains("doctor") {
            EducationLevel::Doctorate
        } else {
            EducationLevel::Other(trimmed.to_string())
        }
    }
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EducationLevel::Unspecified => write!(f, "Unspecified"),
            EducationLevel::NoDegree => write!(f, "No Degree"),
            EducationLevel::HighSchool => write!(f, "High School or GED"),
            EducationLevel::Associate => write!(f, "Associate Degree"),
            EducationLevel::Bachelor => write!(f, "Bachelor's Degree"),
            EducationLevel::Master => write!(f, "Master's Degree"),
            EducationLevel::Doctorate => write!(f, "Ph.D. or Professional Degree"),
            EducationLevel::Other(s) => write!(f, "{s}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Posting – one row of the base table
// ---------------------------------------------------------------------------

/// A single job posting (one row of the source dataset).
#[derive(Debug, Clone)]
pub struct Posting {
    pub title: String,
    /// Metropolitan Statistical Area the posting belongs to.
    pub msa: String,
    pub employment_type: String,
    /// On-site / hybrid / remote; `"Unspecified"` when the source had none.
    pub remote_type: String,
    pub min_experience: Option<f64>,
    pub max_experience: Option<f64>,
    pub salary_from: Option<f64>,
    pub salary_to: Option<f64>,
    /// NAICS2 industry name.
    pub industry: String,
    /// SOC5 occupation name.
    pub occupation: String,
    pub company: String,
    pub education: EducationLevel,
    /// Specialized skill tags; a posting can carry several.
    pub skills: Vec<String>,
    /// Certification tags; a posting can carry several.
    pub certifications: Vec<String>,
}

impl Posting {
    /// Midpoint of the advertised salary range, if both ends are known.
    pub fn salary_midpoint(&self) -> Option<f64> {
        match (self.salary_from, self.salary_to) {
            (Some(lo), Some(hi)) => Some((lo + hi) / 2.0),
            _ => None,
        }
    }
}

/// Column order of the base table; CSV export writes columns in exactly
/// this order.
pub const COLUMNS: [&str; 14] = [
    "TITLE_NAME",
    "MSA_NAME",
    "EMPLOYMENT_TYPE_NAME",
    "REMOTE_TYPE_NAME",
    "MIN_YEARS_EXPERIENCE",
    "MAX_YEARS_EXPERIENCE",
    "SALARY_FROM",
    "SALARY_TO",
    "NAICS2_NAME",
    "SOC_2021_5_NAME",
    "COMPANY_NAME",
    "MIN_EDULEVELS_NAME",
    "SPECIALIZED_SKILLS_NAME",
    "CERTIFICATIONS_NAME",
];

// ---------------------------------------------------------------------------
// JobDataset – the complete loaded base table
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed filter domains.
///
/// Immutable after construction: filtering and aggregation only ever read
/// from it, so every derived table is a pure function of (dataset, spec).
#[derive(Debug, Clone)]
pub struct JobDataset {
    /// All postings (rows).
    pub postings: Vec<Posting>,
    /// Sorted unique MSA names.
    pub msas: BTreeSet<String>,
    /// Sorted unique employment-type names.
    pub employment_types: BTreeSet<String>,
    /// Sorted unique remote-type names.
    pub remote_types: BTreeSet<String>,
    /// Largest `salary_to` in the table; upper bound for the salary slider
    /// and the histogram domain.
    pub max_salary: f64,
    /// Largest `max_experience` in the table; upper bound for the
    /// experience slider.
    pub max_experience: f64,
}

impl JobDataset {
    /// Build filter domains from the loaded postings.
    pub fn from_postings(postings: Vec<Posting>) -> Self {
        let mut msas = BTreeSet::new();
        let mut employment_types = BTreeSet::new();
        let mut remote_types = BTreeSet::new();
        let mut max_salary = 0.0f64;
        let mut max_experience = 0.0f64;

        for p in &postings {
            if !p.msa.is_empty() {
                msas.insert(p.msa.clone());
            }
            if !p.employment_type.is_empty() {
                employment_types.insert(p.employment_type.clone());
            }
            if !p.remote_type.is_empty() {
                remote_types.insert(p.remote_type.clone());
            }
            if let Some(hi) = p.salary_to {
                max_salary = max_salary.max(hi);
            }
            if let Some(hi) = p.max_experience {
                max_experience = max_experience.max(hi);
            }
        }

        JobDataset {
            postings,
            msas,
            employment_types,
            remote_types,
            max_salary,
            max_experience,
        }
    }

    /// Number of postings.
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }
}

use std::collections::BTreeSet;

use super::model::{JobDataset, Posting};

// ---------------------------------------------------------------------------
// FilterSpec – the user's current predicate selection
// ---------------------------------------------------------------------------

/// Inclusive numeric range `[lo, hi]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeFilter {
    pub lo: f64,
    pub hi: f64,
}

impl RangeFilter {
    pub fn new(lo: f64, hi: f64) -> Self {
        RangeFilter { lo, hi }
    }

    fn contains(&self, value: f64) -> bool {
        value >= self.lo && value <= self.hi
    }
}

/// Independent predicates combined with AND.
///
/// An empty categorical set means "no restriction on that field", and an
/// absent range means the same; the default value therefore matches every
/// posting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    /// Selected MSA names.
    pub msas: BTreeSet<String>,
    /// Selected employment types.
    pub employment_types: BTreeSet<String>,
    /// Selected remote types.
    pub remote_types: BTreeSet<String>,
    /// Posting's experience range must lie inside this range.
    pub experience: Option<RangeFilter>,
    /// Posting's salary range must lie inside this range.
    pub salary: Option<RangeFilter>,
}

impl FilterSpec {
    /// Whether a single posting satisfies every active predicate.
    ///
    /// A posting with a missing numeric field fails an active range
    /// filter.
    pub fn matches(&self, p: &Posting) -> bool {
        if !self.msas.is_empty() && !self.msas.contains(&p.msa) {
            return false;
        }
        if !self.employment_types.is_empty() && !self.employment_types.contains(&p.employment_type)
        {
            return false;
        }
        if !self.remote_types.is_empty() && !self.remote_types.contains(&p.remote_type) {
            return false;
        }
        if let Some(range) = &self.experience {
            let inside = matches!(
                (p.min_experience, p.max_experience),
                (Some(lo), Some(hi)) if range.contains(lo) && range.contains(hi)
            );
            if !inside {
                return false;
            }
        }
        if let Some(range) = &self.salary {
            let inside = matches!(
                (p.salary_from, p.salary_to),
                (Some(lo), Some(hi)) if range.contains(lo) && range.contains(hi)
            );
            if !inside {
                return false;
            }
        }
        true
    }
}

/// Return indices of postings that pass all active filters.
///
/// Always recomputed from the base table; the result is a strictly
/// increasing subset of `0..dataset.len()`, and the empty result is valid.
pub fn filtered_indices(dataset: &JobDataset, spec: &FilterSpec) -> Vec<usize> {
    dataset
        .postings
        .iter()
        .enumerate()
        .filter(|(_, p)| spec.matches(p))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::EducationLevel;

    fn posting(employment: &str, salary: Option<(f64, f64)>) -> Posting {
        Posting {
            title: "t".into(),
            msa: "Austin".into(),
            employment_type: employment.into(),
            remote_type: "On-Site".into(),
            min_experience: Some(1.0),
            max_experience: Some(3.0),
            salary_from: salary.map(|(lo, _)| lo),
            salary_to: salary.map(|(_, hi)| hi),
            industry: "Information".into(),
            occupation: "Engineers".into(),
            company: "Acme".into(),
            education: EducationLevel::Bachelor,
            skills: vec![],
            certifications: vec![],
        }
    }

    fn dataset_with_employment_mix() -> JobDataset {
        let mut postings = Vec::new();
        for i in 0..100 {
            let kind = if i < 40 { "Full-Time" } else { "Part-Time" };
            postings.push(posting(kind, Some((50_000.0, 60_000.0))));
        }
        JobDataset::from_postings(postings)
    }

    #[test]
    fn empty_spec_keeps_every_row() {
        let ds = dataset_with_employment_mix();
        let indices = filtered_indices(&ds, &FilterSpec::default());
        assert_eq!(indices.len(), 100);
    }

    #[test]
    fn employment_filter_keeps_exactly_matching_rows() {
        let ds = dataset_with_employment_mix();
        let mut spec = FilterSpec::default();
        spec.employment_types.insert("Full-Time".into());

        let indices = filtered_indices(&ds, &spec);
        assert_eq!(indices.len(), 40);
        for &i in &indices {
            assert_eq!(ds.postings[i].employment_type, "Full-Time");
        }
    }

    #[test]
    fn salary_range_is_inclusive() {
        let salaries = [40_000.0, 55_000.0, 65_000.0, 80_000.0];
        let postings = salaries
            .iter()
            .map(|&s| posting("Full-Time", Some((s, s))))
            .collect();
        let ds = JobDataset::from_postings(postings);

        let spec = FilterSpec {
            salary: Some(RangeFilter::new(50_000.0, 70_000.0)),
            ..Default::default()
        };
        let indices = filtered_indices(&ds, &spec);
        assert_eq!(indices, vec![1, 2]);
    }

    #[test]
    fn active_salary_filter_drops_rows_with_missing_salary() {
        let postings = vec![
            posting("Full-Time", Some((55_000.0, 55_000.0))),
            posting("Full-Time", None),
        ];
        let ds = JobDataset::from_postings(postings);

        let spec = FilterSpec {
            salary: Some(RangeFilter::new(0.0, 200_000.0)),
            ..Default::default()
        };
        assert_eq!(filtered_indices(&ds, &spec), vec![0]);
        // Without the predicate the missing-salary row stays
        assert_eq!(filtered_indices(&ds, &FilterSpec::default()).len(), 2);
    }

    #[test]
    fn predicates_compose_with_and() {
        let postings = vec![
            posting("Full-Time", Some((55_000.0, 55_000.0))),
            posting("Full-Time", Some((90_000.0, 90_000.0))),
            posting("Part-Time", Some((55_000.0, 55_000.0))),
        ];
        let ds = JobDataset::from_postings(postings);

        let mut spec = FilterSpec {
            salary: Some(RangeFilter::new(50_000.0, 60_000.0)),
            ..Default::default()
        };
        spec.employment_types.insert("Full-Time".into());

        assert_eq!(filtered_indices(&ds, &spec), vec![0]);
    }

    #[test]
    fn filtering_is_idempotent_and_a_subset() {
        let ds = dataset_with_employment_mix();
        let mut spec = FilterSpec::default();
        spec.employment_types.insert("Part-Time".into());
        spec.salary = Some(RangeFilter::new(0.0, 100_000.0));

        let first = filtered_indices(&ds, &spec);
        let second = filtered_indices(&ds, &spec);
        assert_eq!(first, second);
        assert!(first.windows(2).all(|w| w[0] < w[1]));
        assert!(first.iter().all(|&i| i < ds.len()));
    }

    #[test]
    fn no_matching_rows_is_a_valid_result() {
        let ds = dataset_with_employment_mix();
        let mut spec = FilterSpec::default();
        spec.msas.insert("Nowhere".into());
        assert!(filtered_indices(&ds, &spec).is_empty());
    }
}

use std::collections::BTreeMap;

use super::model::{EducationLevel, JobDataset, Posting};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Cosmetic aggregation knobs; changing them never affects filter results.
#[derive(Debug, Clone, Copy)]
pub struct AggregateConfig {
    /// How many entries the top-N charts show.
    pub top_n: usize,
    /// Width of one salary histogram bucket.
    pub salary_bin_width: f64,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        AggregateConfig {
            top_n: 10,
            salary_bin_width: 10_000.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Counting primitives
// ---------------------------------------------------------------------------

/// Count label occurrences and keep the `n` most frequent.
///
/// Ties at the cut are broken by ascending label, so the result is
/// deterministic regardless of input order.
pub fn top_counts<I>(labels: I, n: usize) -> Vec<(String, u64)>
where
    I: IntoIterator<Item = String>,
{
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }
    let mut entries: Vec<(String, u64)> = counts.into_iter().collect();
    // BTreeMap iteration is already label-ascending, so a stable sort by
    // descending count leaves ties alphabetical.
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.truncate(n);
    entries
}

/// The source data marks unusable group labels as "Unclassified …"; those
/// rows stay in the table but are dropped from the grouped charts.
fn is_classified(label: &str) -> bool {
    !label.is_empty() && !label.starts_with("Unclassified")
}

fn rows<'a>(
    dataset: &'a JobDataset,
    indices: &'a [usize],
) -> impl Iterator<Item = &'a Posting> + 'a {
    indices.iter().map(move |&i| &dataset.postings[i])
}

// ---------------------------------------------------------------------------
// Top-N summaries
// ---------------------------------------------------------------------------

pub fn top_industries(dataset: &JobDataset, indices: &[usize], n: usize) -> Vec<(String, u64)> {
    top_counts(
        rows(dataset, indices)
            .map(|p| p.industry.clone())
            .filter(|l| is_classified(l)),
        n,
    )
}

pub fn top_occupations(dataset: &JobDataset, indices: &[usize], n: usize) -> Vec<(String, u64)> {
    top_counts(
        rows(dataset, indices)
            .map(|p| p.occupation.clone())
            .filter(|l| is_classified(l)),
        n,
    )
}

pub fn top_companies(dataset: &JobDataset, indices: &[usize], n: usize) -> Vec<(String, u64)> {
    top_counts(
        rows(dataset, indices)
            .map(|p| p.company.clone())
            .filter(|l| is_classified(l)),
        n,
    )
}

/// Skills are multi-valued: each tag on a posting counts once, so tag
/// counts can sum past the filtered row count.
pub fn top_skills(dataset: &JobDataset, indices: &[usize], n: usize) -> Vec<(String, u64)> {
    top_counts(
        rows(dataset, indices).flat_map(|p| p.skills.iter().cloned()),
        n,
    )
}

pub fn top_certifications(dataset: &JobDataset, indices: &[usize], n: usize) -> Vec<(String, u64)> {
    top_counts(
        rows(dataset, indices).flat_map(|p| p.certifications.iter().cloned()),
        n,
    )
}

// ---------------------------------------------------------------------------
// Salary histogram
// ---------------------------------------------------------------------------

/// One fixed-width salary bucket `[lo, hi)`; the last bucket also takes
/// values equal to its upper edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub lo: f64,
    pub hi: f64,
    pub count: u64,
}

/// Bucket salary midpoints of the filtered rows.
///
/// The bin skeleton spans `[0, dataset.max_salary]` of the *base* table,
/// so an empty filter result renders the same bins with every count at
/// zero instead of collapsing the axis.
pub fn salary_histogram(dataset: &JobDataset, indices: &[usize], bin_width: f64) -> Vec<HistogramBin> {
    if bin_width <= 0.0 || dataset.max_salary <= 0.0 {
        return Vec::new();
    }
    let n_bins = (dataset.max_salary / bin_width).ceil() as usize;
    let mut bins: Vec<HistogramBin> = (0..n_bins)
        .map(|i| HistogramBin {
            lo: i as f64 * bin_width,
            hi: (i + 1) as f64 * bin_width,
            count: 0,
        })
        .collect();

    for p in rows(dataset, indices) {
        if let Some(mid) = p.salary_midpoint() {
            if mid < 0.0 {
                continue;
            }
            let idx = ((mid / bin_width) as usize).min(n_bins - 1);
            bins[idx].count += 1;
        }
    }
    bins
}

// ---------------------------------------------------------------------------
// Education proportions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct EducationShare {
    pub level: EducationLevel,
    pub count: u64,
    /// Fraction of the filtered row count; shares sum to 1.0 when the
    /// filtered table is non-empty.
    pub fraction: f64,
}

/// Group the filtered rows by minimum education level, ordered from least
/// to most education. Empty input yields an empty table.
pub fn education_shares(dataset: &JobDataset, indices: &[usize]) -> Vec<EducationShare> {
    let mut counts: BTreeMap<EducationLevel, u64> = BTreeMap::new();
    for p in rows(dataset, indices) {
        *counts.entry(p.education.clone()).or_insert(0) += 1;
    }
    let total: u64 = counts.values().sum();
    if total == 0 {
        return Vec::new();
    }
    counts
        .into_iter()
        .map(|(level, count)| EducationShare {
            level,
            count,
            fraction: count as f64 / total as f64,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Industry → tag treemap
// ---------------------------------------------------------------------------

/// One treemap branch: an industry with its per-tag counts.
#[derive(Debug, Clone, PartialEq)]
pub struct TreemapBranch {
    pub industry: String,
    pub total: u64,
    /// Tag counts, largest first; ties alphabetical.
    pub leaves: Vec<(String, u64)>,
}

/// Explode a tag field and nest its counts under the posting's industry.
/// Unclassified industries are dropped, like in the flat industry chart.
pub fn tags_by_industry<F>(dataset: &JobDataset, indices: &[usize], tags: F) -> Vec<TreemapBranch>
where
    F: Fn(&Posting) -> &[String],
{
    let mut groups: BTreeMap<String, BTreeMap<String, u64>> = BTreeMap::new();
    for p in rows(dataset, indices) {
        if !is_classified(&p.industry) {
            continue;
        }
        for tag in tags(p) {
            *groups
                .entry(p.industry.clone())
                .or_default()
                .entry(tag.clone())
                .or_insert(0) += 1;
        }
    }

    let mut branches: Vec<TreemapBranch> = groups
        .into_iter()
        .map(|(industry, tag_counts)| {
            let total = tag_counts.values().sum();
            let mut leaves: Vec<(String, u64)> = tag_counts.into_iter().collect();
            leaves.sort_by(|a, b| b.1.cmp(&a.1));
            TreemapBranch {
                industry,
                total,
                leaves,
            }
        })
        .collect();
    branches.sort_by(|a, b| b.total.cmp(&a.total));
    branches
}

// ---------------------------------------------------------------------------
// Summaries – everything the charts bind to
// ---------------------------------------------------------------------------

/// All derived tables for the current filter state, recomputed in one
/// pass per filter change.
#[derive(Debug, Clone, Default)]
pub struct Summaries {
    pub top_industries: Vec<(String, u64)>,
    pub top_occupations: Vec<(String, u64)>,
    pub top_companies: Vec<(String, u64)>,
    pub top_skills: Vec<(String, u64)>,
    pub top_certifications: Vec<(String, u64)>,
    pub salary_histogram: Vec<HistogramBin>,
    pub education: Vec<EducationShare>,
    pub skills_by_industry: Vec<TreemapBranch>,
    pub certifications_by_industry: Vec<TreemapBranch>,
}

impl Summaries {
    pub fn compute(dataset: &JobDataset, indices: &[usize], config: &AggregateConfig) -> Self {
        Summaries {
            top_industries: top_industries(dataset, indices, config.top_n),
            top_occupations: top_occupations(dataset, indices, config.top_n),
            top_companies: top_companies(dataset, indices, config.top_n),
            top_skills: top_skills(dataset, indices, config.top_n),
            top_certifications: top_certifications(dataset, indices, config.top_n),
            salary_histogram: salary_histogram(dataset, indices, config.salary_bin_width),
            education: education_shares(dataset, indices),
            skills_by_industry: tags_by_industry(dataset, indices, |p| &p.skills),
            certifications_by_industry: tags_by_industry(dataset, indices, |p| &p.certifications),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posting(
        industry: &str,
        company: &str,
        education: EducationLevel,
        salary: Option<(f64, f64)>,
        skills: &[&str],
    ) -> Posting {
        Posting {
            title: "t".into(),
            msa: "Austin".into(),
            employment_type: "Full-Time".into(),
            remote_type: "On-Site".into(),
            min_experience: Some(1.0),
            max_experience: Some(3.0),
            salary_from: salary.map(|(lo, _)| lo),
            salary_to: salary.map(|(_, hi)| hi),
            industry: industry.into(),
            occupation: "Engineers".into(),
            company: company.into(),
            education,
            skills: skills.iter().map(|s| s.to_string()).collect(),
            certifications: vec![],
        }
    }

    fn sample_dataset() -> JobDataset {
        JobDataset::from_postings(vec![
            posting(
                "Information",
                "Acme",
                EducationLevel::Bachelor,
                Some((50_000.0, 60_000.0)),
                &["Python", "SQL"],
            ),
            posting(
                "Information",
                "Acme",
                EducationLevel::Master,
                Some((80_000.0, 100_000.0)),
                &["Python"],
            ),
            posting(
                "Health Care",
                "Mercy",
                EducationLevel::Bachelor,
                Some((60_000.0, 70_000.0)),
                &["Patient Care"],
            ),
            posting(
                "Unclassified Industry",
                "Unclassified",
                EducationLevel::Unspecified,
                None,
                &["SQL"],
            ),
        ])
    }

    fn all_indices(ds: &JobDataset) -> Vec<usize> {
        (0..ds.len()).collect()
    }

    #[test]
    fn top_counts_breaks_ties_alphabetically() {
        let labels = vec!["b", "a", "c", "a", "c", "b"];
        let top = top_counts(labels.into_iter().map(String::from), 2);
        assert_eq!(top, vec![("a".to_string(), 2), ("b".to_string(), 2)]);
    }

    #[test]
    fn unclassified_groups_are_dropped() {
        let ds = sample_dataset();
        let idx = all_indices(&ds);

        let industries = top_industries(&ds, &idx, 10);
        assert_eq!(
            industries,
            vec![
                ("Information".to_string(), 2),
                ("Health Care".to_string(), 1)
            ]
        );

        let companies = top_companies(&ds, &idx, 10);
        assert!(companies.iter().all(|(label, _)| label != "Unclassified"));
    }

    #[test]
    fn single_valued_counts_sum_to_at_most_row_count() {
        let ds = sample_dataset();
        let idx = all_indices(&ds);
        let total: u64 = top_industries(&ds, &idx, 10).iter().map(|(_, c)| c).sum();
        assert!(total <= idx.len() as u64);
    }

    #[test]
    fn multi_tag_posting_counts_once_per_tag() {
        let ds = sample_dataset();
        let idx = all_indices(&ds);
        let skills = top_skills(&ds, &idx, 10);

        let count_of = |label: &str| {
            skills
                .iter()
                .find(|(l, _)| l == label)
                .map(|(_, c)| *c)
                .unwrap_or(0)
        };
        assert_eq!(count_of("Python"), 2);
        assert_eq!(count_of("SQL"), 2);

        // Exploded counts exceed the three classified rows
        let total: u64 = skills.iter().map(|(_, c)| c).sum();
        assert!(total > 3);
    }

    #[test]
    fn histogram_buckets_salary_midpoints() {
        let ds = sample_dataset();
        let idx = all_indices(&ds);
        let bins = salary_histogram(&ds, &idx, 10_000.0);

        // Base-table max salary is 100k → ten bins
        assert_eq!(bins.len(), 10);
        // Midpoints: 55k, 90k, 65k
        assert_eq!(bins[5].count, 1);
        assert_eq!(bins[6].count, 1);
        assert_eq!(bins[9].count, 1);
        assert_eq!(bins.iter().map(|b| b.count).sum::<u64>(), 3);
    }

    #[test]
    fn histogram_keeps_bins_for_empty_result() {
        let ds = sample_dataset();
        let bins = salary_histogram(&ds, &[], 10_000.0);
        assert_eq!(bins.len(), 10);
        assert!(bins.iter().all(|b| b.count == 0));
    }

    #[test]
    fn education_fractions_sum_to_one() {
        let ds = sample_dataset();
        let idx = all_indices(&ds);
        let shares = education_shares(&ds, &idx);

        let sum: f64 = shares.iter().map(|s| s.fraction).sum();
        assert!((sum - 1.0).abs() < 1e-9);
        // Ordinal ordering: Unspecified before Bachelor before Master
        assert_eq!(shares[0].level, EducationLevel::Unspecified);
        assert_eq!(shares.last().unwrap().level, EducationLevel::Master);
    }

    #[test]
    fn education_shares_empty_for_empty_input() {
        let ds = sample_dataset();
        assert!(education_shares(&ds, &[]).is_empty());
    }

    #[test]
    fn treemap_nests_tags_under_industry() {
        let ds = sample_dataset();
        let idx = all_indices(&ds);
        let branches = tags_by_industry(&ds, &idx, |p| &p.skills);

        assert_eq!(branches.len(), 2);
        let info = &branches[0];
        assert_eq!(info.industry, "Information");
        assert_eq!(info.total, 3);
        assert_eq!(info.leaves[0], ("Python".to_string(), 2));
        assert_eq!(info.leaves[1], ("SQL".to_string(), 1));
    }

    #[test]
    fn empty_result_set_degrades_without_error() {
        let ds = sample_dataset();
        let summaries = Summaries::compute(&ds, &[], &AggregateConfig::default());

        assert!(summaries.top_industries.is_empty());
        assert!(summaries.top_skills.is_empty());
        assert!(summaries.education.is_empty());
        assert!(summaries.skills_by_industry.is_empty());
        assert!(summaries.salary_histogram.iter().all(|b| b.count == 0));
    }
}

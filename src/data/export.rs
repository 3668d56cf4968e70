use std::io::Write;

use anyhow::{Context, Result};

use super::model::{JobDataset, Posting, COLUMNS};

// ---------------------------------------------------------------------------
// CSV export of the filtered table
// ---------------------------------------------------------------------------

/// Serialize the filtered rows as CSV in base-table column order
/// ([`COLUMNS`]). No aggregation: one record per posting. Multi-valued
/// tag cells are semicolon-joined, numeric cells are empty when missing.
pub fn write_csv<W: Write>(dataset: &JobDataset, indices: &[usize], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(COLUMNS).context("writing CSV header")?;

    for &i in indices {
        let record = posting_record(&dataset.postings[i]);
        csv.write_record(&record)
            .with_context(|| format!("writing CSV row for posting {i}"))?;
    }
    csv.flush().context("flushing CSV output")?;
    Ok(())
}

/// Render the filtered table to an in-memory CSV string for the download
/// dialog.
pub fn to_csv_string(dataset: &JobDataset, indices: &[usize]) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(dataset, indices, &mut buf)?;
    String::from_utf8(buf).context("CSV output was not UTF-8")
}

fn posting_record(p: &Posting) -> Vec<String> {
    vec![
        p.title.clone(),
        p.msa.clone(),
        p.employment_type.clone(),
        p.remote_type.clone(),
        number_cell(p.min_experience),
        number_cell(p.max_experience),
        number_cell(p.salary_from),
        number_cell(p.salary_to),
        p.industry.clone(),
        p.occupation.clone(),
        p.company.clone(),
        p.education.to_string(),
        p.skills.join(";"),
        p.certifications.join(";"),
    ]
}

fn number_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::EducationLevel;

    fn sample_dataset() -> JobDataset {
        JobDataset::from_postings(vec![
            Posting {
                title: "Data Engineer".into(),
                msa: "Austin".into(),
                employment_type: "Full-Time".into(),
                remote_type: "Remote".into(),
                min_experience: Some(2.0),
                max_experience: Some(5.0),
                salary_from: Some(90_000.0),
                salary_to: Some(120_000.0),
                industry: "Information".into(),
                occupation: "Data Engineers".into(),
                company: "Acme".into(),
                education: EducationLevel::Bachelor,
                skills: vec!["Python".into(), "SQL".into()],
                certifications: vec![],
            },
            Posting {
                title: "Nurse".into(),
                msa: "Dallas".into(),
                employment_type: "Part-Time".into(),
                remote_type: "On-Site".into(),
                min_experience: None,
                max_experience: None,
                salary_from: Some(60_000.0),
                salary_to: Some(75_000.0),
                industry: "Health Care".into(),
                occupation: "Registered Nurses".into(),
                company: "Mercy".into(),
                education: EducationLevel::Associate,
                skills: vec![],
                certifications: vec!["RN".into()],
            },
        ])
    }

    #[test]
    fn header_matches_base_table_column_order() {
        let ds = sample_dataset();
        let csv = to_csv_string(&ds, &[0, 1]).unwrap();
        let header = csv.lines().next().unwrap();
        assert_eq!(header, COLUMNS.join(","));
    }

    #[test]
    fn exports_only_the_filtered_rows_unaggregated() {
        let ds = sample_dataset();
        let csv = to_csv_string(&ds, &[1]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("Nurse,Dallas,Part-Time,On-Site"));
        assert!(lines[1].contains(",,"));
        assert!(lines[1].ends_with("RN"));
    }

    #[test]
    fn tag_cells_are_semicolon_joined() {
        let ds = sample_dataset();
        let csv = to_csv_string(&ds, &[0]).unwrap();
        assert!(csv.contains("Python;SQL"));
    }

    #[test]
    fn empty_selection_exports_header_only() {
        let ds = sample_dataset();
        let csv = to_csv_string(&ds, &[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }
}

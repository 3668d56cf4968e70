use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, Float32Array, Float64Array, Int32Array, Int64Array, LargeListArray, LargeStringArray,
    ListArray, StringArray,
};
use arrow::datatypes::{DataType, Schema};
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use thiserror::Error;

use super::model::{EducationLevel, JobDataset, Posting};

/// Default dataset location; overridden by the `JOBSCOPE_DATA_URL`
/// environment variable.
pub const DEFAULT_DATA_URL: &str =
    "https://www.dropbox.com/scl/fi/2ajbqq5yqt637kjjez1pk/combined_data_screen7.parquet?dl=1";

/// Resolve the dataset source from the environment, falling back to the
/// embedded default.
pub fn data_source() -> String {
    std::env::var("JOBSCOPE_DATA_URL").unwrap_or_else(|_| DEFAULT_DATA_URL.to_string())
}

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Loading failures are fatal to session start and surfaced in the UI;
/// there is no automatic retry.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The remote fetch (or local read) failed before any bytes parsed.
    #[error("data source unavailable: {0}")]
    SourceUnavailable(String),
    /// The bytes were retrieved but are not a valid postings table.
    #[error("could not parse dataset: {0}")]
    ParseError(String),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the postings dataset from a source location.
///
/// `http(s)` URLs are fetched with a blocking client; anything else is
/// treated as a local file path (used by the sample generator and tests).
/// The whole file is held in memory, matching the one-fetch-per-session
/// model.
pub fn load_dataset(source: &str) -> Result<JobDataset, LoadError> {
    let bytes =
        fetch_bytes(source).map_err(|e| LoadError::SourceUnavailable(format!("{e:#}")))?;
    log::info!("fetched {} bytes from {source}", bytes.len());
    parse_postings(bytes).map_err(|e| LoadError::ParseError(format!("{e:#}")))
}

fn fetch_bytes(source: &str) -> Result<Bytes> {
    if source.starts_with("http://") || source.starts_with("https://") {
        let resp = reqwest::blocking::Client::new()
            .get(source)
            .send()
            .context("sending request")?
            .error_for_status()
            .context("server response")?;
        resp.bytes().context("reading response body")
    } else {
        let data = std::fs::read(source).with_context(|| format!("reading file {source}"))?;
        Ok(Bytes::from(data))
    }
}

// ---------------------------------------------------------------------------
// Parquet parsing
// ---------------------------------------------------------------------------

/// Parse Parquet bytes into the base table.
///
/// Expected columns (all required, extra columns are ignored):
/// strings for the categorical fields, Float64/Int64 for the numeric
/// ranges, and either `List<Utf8>` or a bracketed-list Utf8 cell for the
/// tag columns.
pub fn parse_postings(bytes: Bytes) -> Result<JobDataset> {
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(bytes).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut postings = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let title = col_idx(&schema, "TITLE_NAME")?;
        let msa = col_idx(&schema, "MSA_NAME")?;
        let employment = col_idx(&schema, "EMPLOYMENT_TYPE_NAME")?;
        let remote = col_idx(&schema, "REMOTE_TYPE_NAME")?;
        let min_exp = col_idx(&schema, "MIN_YEARS_EXPERIENCE")?;
        let max_exp = col_idx(&schema, "MAX_YEARS_EXPERIENCE")?;
        let salary_from = col_idx(&schema, "SALARY_FROM")?;
        let salary_to = col_idx(&schema, "SALARY_TO")?;
        let industry = col_idx(&schema, "NAICS2_NAME")?;
        let occupation = col_idx(&schema, "SOC_2021_5_NAME")?;
        let company = col_idx(&schema, "COMPANY_NAME")?;
        let education = col_idx(&schema, "MIN_EDULEVELS_NAME")?;
        let skills = col_idx(&schema, "SPECIALIZED_SKILLS_NAME")?;
        let certifications = col_idx(&schema, "CERTIFICATIONS_NAME")?;

        for row in 0..batch.num_rows() {
            postings.push(Posting {
                title: string_at(&batch, title, row).unwrap_or_default(),
                msa: string_at(&batch, msa, row).unwrap_or_default(),
                employment_type: string_at(&batch, employment, row).unwrap_or_default(),
                remote_type: normalize_remote_type(string_at(&batch, remote, row)),
                min_experience: f64_at(&batch, min_exp, row)
                    .with_context(|| format!("row {row}: MIN_YEARS_EXPERIENCE"))?,
                max_experience: f64_at(&batch, max_exp, row)
                    .with_context(|| format!("row {row}: MAX_YEARS_EXPERIENCE"))?,
                salary_from: f64_at(&batch, salary_from, row)
                    .with_context(|| format!("row {row}: SALARY_FROM"))?,
                salary_to: f64_at(&batch, salary_to, row)
                    .with_context(|| format!("row {row}: SALARY_TO"))?,
                industry: string_at(&batch, industry, row).unwrap_or_default(),
                occupation: string_at(&batch, occupation, row).unwrap_or_default(),
                company: string_at(&batch, company, row).unwrap_or_default(),
                education: EducationLevel::parse(
                    &string_at(&batch, education, row).unwrap_or_default(),
                ),
                skills: tags_at(&batch, skills, row)
                    .with_context(|| format!("row {row}: SPECIALIZED_SKILLS_NAME"))?,
                certifications: tags_at(&batch, certifications, row)
                    .with_context(|| format!("row {row}: CERTIFICATIONS_NAME"))?,
            });
        }
    }

    Ok(JobDataset::from_postings(postings))
}

fn col_idx(schema: &Arc<Schema>, name: &str) -> Result<usize> {
    schema
        .index_of(name)
        .map_err(|_| anyhow::anyhow!("dataset missing '{name}' column"))
}

/// The source writes `"[None]"` or null where the remote type is unknown.
fn normalize_remote_type(value: Option<String>) -> String {
    match value {
        Some(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() || trimmed == "[None]" {
                "Unspecified".to_string()
            } else {
                trimmed.to_string()
            }
        }
        None => "Unspecified".to_string(),
    }
}

// -- Arrow cell extraction helpers --

fn string_at(batch: &RecordBatch, col: usize, row: usize) -> Option<String> {
    let array = batch.column(col);
    if array.is_null(row) {
        return None;
    }
    match array.data_type() {
        DataType::Utf8 => array
            .as_any()
            .downcast_ref::<StringArray>()
            .map(|a| a.value(row).to_string()),
        DataType::LargeUtf8 => array
            .as_any()
            .downcast_ref::<LargeStringArray>()
            .map(|a| a.value(row).to_string()),
        _ => None,
    }
}

fn f64_at(batch: &RecordBatch, col: usize, row: usize) -> Result<Option<f64>> {
    let array = batch.column(col);
    if array.is_null(row) {
        return Ok(None);
    }
    let value = match array.data_type() {
        DataType::Float64 => array
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| a.value(row)),
        DataType::Float32 => array
            .as_any()
            .downcast_ref::<Float32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int64 => array
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int32 => array
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| a.value(row) as f64),
        other => bail!("expected numeric column, got {other:?}"),
    };
    // NaN means missing in the source files
    Ok(value.filter(|v| !v.is_nan()))
}

/// Tag columns come in two shapes depending on how the file was written:
/// a genuine `List<Utf8>` array, or a Utf8 cell holding a bracketed list
/// literal such as `["Python", "SQL"]`.
fn tags_at(batch: &RecordBatch, col: usize, row: usize) -> Result<Vec<String>> {
    let array = batch.column(col);
    if array.is_null(row) {
        return Ok(Vec::new());
    }
    match array.data_type() {
        DataType::List(_) => {
            let list = array
                .as_any()
                .downcast_ref::<ListArray>()
                .context("expected ListArray")?;
            string_list_values(&list.value(row))
        }
        DataType::LargeList(_) => {
            let list = array
                .as_any()
                .downcast_ref::<LargeListArray>()
                .context("expected LargeListArray")?;
            string_list_values(&list.value(row))
        }
        DataType::Utf8 | DataType::LargeUtf8 => {
            Ok(parse_tag_cell(&string_at(batch, col, row).unwrap_or_default()))
        }
        other => bail!("expected list or string column, got {other:?}"),
    }
}

fn string_list_values(values: &Arc<dyn Array>) -> Result<Vec<String>> {
    let strings = values
        .as_any()
        .downcast_ref::<StringArray>()
        .context("expected Utf8 list items")?;
    Ok(strings
        .iter()
        .flatten()
        .map(|s| s.to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

/// Parse a bracketed-list cell. Tries strict JSON first; falls back to
/// splitting on commas and trimming quote characters, which copes with
/// the single-quoted Python-repr lists the source files contain.
fn parse_tag_cell(cell: &str) -> Vec<String> {
    let trimmed = cell.trim();
    if trimmed.is_empty() || trimmed == "[]" || trimmed == "[None]" {
        return Vec::new();
    }
    if let Ok(tags) = serde_json::from_str::<Vec<String>>(trimmed) {
        return tags.into_iter().filter(|t| !t.is_empty()).collect();
    }
    if let Some(inner) = trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        return inner
            .split(',')
            .map(|t| t.trim().trim_matches(|c| c == '\'' || c == '"').to_string())
            .filter(|t| !t.is_empty())
            .collect();
    }
    // A bare string is a single tag
    vec![trimmed.to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{ArrayRef, Float64Array, ListBuilder, StringArray, StringBuilder};
    use parquet::arrow::ArrowWriter;

    fn tag_list(rows: &[&[&str]]) -> ArrayRef {
        let mut builder = ListBuilder::new(StringBuilder::new());
        for row in rows {
            for tag in *row {
                builder.values().append_value(tag);
            }
            builder.append(true);
        }
        Arc::new(builder.finish())
    }

    fn strings(values: &[&str]) -> ArrayRef {
        Arc::new(StringArray::from(values.to_vec()))
    }

    fn floats(values: &[Option<f64>]) -> ArrayRef {
        Arc::new(Float64Array::from(values.to_vec()))
    }

    /// Write a two-row postings table to in-memory Parquet bytes.
    fn sample_parquet() -> Bytes {
        let batch = RecordBatch::try_from_iter(vec![
            ("TITLE_NAME", strings(&["Data Engineer", "Nurse"])),
            ("MSA_NAME", strings(&["Austin", "Dallas"])),
            ("EMPLOYMENT_TYPE_NAME", strings(&["Full-Time", "Part-Time"])),
            ("REMOTE_TYPE_NAME", strings(&["Remote", "[None]"])),
            ("MIN_YEARS_EXPERIENCE", floats(&[Some(2.0), None])),
            ("MAX_YEARS_EXPERIENCE", floats(&[Some(5.0), None])),
            ("SALARY_FROM", floats(&[Some(90_000.0), Some(60_000.0)])),
            ("SALARY_TO", floats(&[Some(120_000.0), Some(75_000.0)])),
            ("NAICS2_NAME", strings(&["Information", "Health Care"])),
            (
                "SOC_2021_5_NAME",
                strings(&["Data Engineers", "Registered Nurses"]),
            ),
            ("COMPANY_NAME", strings(&["Acme", "Mercy"])),
            (
                "MIN_EDULEVELS_NAME",
                strings(&["Bachelor's degree", "Associate degree"]),
            ),
            (
                "SPECIALIZED_SKILLS_NAME",
                tag_list(&[&["Python", "SQL"], &[]]),
            ),
            ("CERTIFICATIONS_NAME", tag_list(&[&[], &["RN"]])),
        ])
        .unwrap();

        let mut buf = Vec::new();
        let mut writer = ArrowWriter::try_new(&mut buf, batch.schema(), None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
        Bytes::from(buf)
    }

    #[test]
    fn parses_postings_from_parquet_bytes() {
        let ds = parse_postings(sample_parquet()).unwrap();
        assert_eq!(ds.len(), 2);

        let first = &ds.postings[0];
        assert_eq!(first.title, "Data Engineer");
        assert_eq!(first.msa, "Austin");
        assert_eq!(first.salary_from, Some(90_000.0));
        assert_eq!(first.education, EducationLevel::Bachelor);
        assert_eq!(first.skills, vec!["Python", "SQL"]);

        let second = &ds.postings[1];
        assert_eq!(second.remote_type, "Unspecified");
        assert_eq!(second.min_experience, None);
        assert_eq!(second.certifications, vec!["RN"]);
    }

    #[test]
    fn missing_column_is_a_parse_error() {
        let batch = RecordBatch::try_from_iter(vec![("TITLE_NAME", strings(&["x"]))]).unwrap();
        let mut buf = Vec::new();
        let mut writer = ArrowWriter::try_new(&mut buf, batch.schema(), None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let err = parse_postings(Bytes::from(buf)).unwrap_err();
        assert!(err.to_string().contains("MSA_NAME"));
    }

    #[test]
    fn garbage_bytes_are_a_parse_error() {
        assert!(parse_postings(Bytes::from_static(b"not parquet")).is_err());
    }

    #[test]
    fn unreadable_path_is_source_unavailable() {
        let err = load_dataset("/definitely/not/here.parquet").unwrap_err();
        assert!(matches!(err, LoadError::SourceUnavailable(_)));
    }

    #[test]
    fn tag_cells_parse_json_and_python_repr() {
        assert_eq!(
            parse_tag_cell(r#"["Python", "SQL"]"#),
            vec!["Python", "SQL"]
        );
        assert_eq!(
            parse_tag_cell("['Data Analysis', 'Tableau']"),
            vec!["Data Analysis", "Tableau"]
        );
        assert_eq!(parse_tag_cell("[]"), Vec::<String>::new());
        assert_eq!(parse_tag_cell("[None]"), Vec::<String>::new());
        assert_eq!(parse_tag_cell("  "), Vec::<String>::new());
        assert_eq!(parse_tag_cell("Forklift Operation"), vec!["Forklift Operation"]);
    }
}

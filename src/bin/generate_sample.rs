use std::sync::Arc;

use arrow::array::{Float64Array, ListBuilder, StringArray, StringBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

struct Archetype {
    title: &'static str,
    occupation: &'static str,
    industry: &'static str,
    education: &'static str,
    salary_base: f64,
    skills: &'static [&'static str],
    certifications: &'static [&'static str],
}

const ARCHETYPES: &[Archetype] = &[
    Archetype {
        title: "Data Engineer",
        occupation: "Data Engineers",
        industry: "Information",
        education: "Bachelor's degree",
        salary_base: 110_000.0,
        skills: &["Python", "SQL", "Apache Spark", "Data Pipelines"],
        certifications: &["AWS Certified Solutions Architect"],
    },
    Archetype {
        title: "Registered Nurse",
        occupation: "Registered Nurses",
        industry: "Health Care and Social Assistance",
        education: "Associate degree",
        salary_base: 78_000.0,
        skills: &["Patient Care", "Care Planning", "Triage"],
        certifications: &["Registered Nurse (RN)", "Basic Life Support (BLS)"],
    },
    Archetype {
        title: "Financial Analyst",
        occupation: "Financial and Investment Analysts",
        industry: "Finance and Insurance",
        education: "Bachelor's degree",
        salary_base: 92_000.0,
        skills: &["Financial Modeling", "Microsoft Excel", "Forecasting"],
        certifications: &["Certified Public Accountant (CPA)"],
    },
    Archetype {
        title: "Truck Driver",
        occupation: "Heavy and Tractor-Trailer Truck Drivers",
        industry: "Transportation and Warehousing",
        education: "No Education Listed",
        salary_base: 58_000.0,
        skills: &["Commercial Driving", "Route Planning"],
        certifications: &["Commercial Driver's License (CDL)"],
    },
    Archetype {
        title: "Software Developer",
        occupation: "Software Developers",
        industry: "Information",
        education: "Bachelor's degree",
        salary_base: 125_000.0,
        skills: &["Rust", "Python", "Distributed Systems", "SQL"],
        certifications: &[],
    },
    Archetype {
        title: "Retail Sales Supervisor",
        occupation: "First-Line Supervisors of Retail Sales Workers",
        industry: "Retail Trade",
        education: "High school or GED",
        salary_base: 46_000.0,
        skills: &["Merchandising", "Inventory Management"],
        certifications: &[],
    },
];

const MSAS: &[&str] = &[
    "Austin-Round Rock-San Marcos, TX",
    "Dallas-Fort Worth-Arlington, TX",
    "Houston-Pasadena-The Woodlands, TX",
];
const EMPLOYMENT_TYPES: &[&str] = &["Full-time (> 32 hours)", "Part-time (≤ 32 hours)"];
const REMOTE_TYPES: &[&str] = &["On-Site", "Hybrid Remote", "Remote", "[None]"];
const COMPANIES: &[&str] = &[
    "Acme Analytics",
    "Lone Star Health",
    "Bluebonnet Logistics",
    "Pecan Software",
    "Unclassified",
];

fn main() {
    let mut rng = SimpleRng::new(42);
    let n_rows = 500;

    let mut titles = Vec::with_capacity(n_rows);
    let mut msas = Vec::with_capacity(n_rows);
    let mut employment = Vec::with_capacity(n_rows);
    let mut remote = Vec::with_capacity(n_rows);
    let mut min_exp = Vec::with_capacity(n_rows);
    let mut max_exp = Vec::with_capacity(n_rows);
    let mut salary_from = Vec::with_capacity(n_rows);
    let mut salary_to = Vec::with_capacity(n_rows);
    let mut industries = Vec::with_capacity(n_rows);
    let mut occupations = Vec::with_capacity(n_rows);
    let mut companies = Vec::with_capacity(n_rows);
    let mut education = Vec::with_capacity(n_rows);
    let mut skills_builder = ListBuilder::new(StringBuilder::new());
    let mut certs_builder = ListBuilder::new(StringBuilder::new());

    for _ in 0..n_rows {
        let arch = rng.pick(ARCHETYPES);

        titles.push(arch.title.to_string());
        msas.push(rng.pick(MSAS).to_string());
        employment.push(rng.pick(EMPLOYMENT_TYPES).to_string());
        remote.push(rng.pick(REMOTE_TYPES).to_string());

        let lo_exp = (rng.next_f64() * 6.0).floor();
        min_exp.push(Some(lo_exp));
        max_exp.push(Some(lo_exp + 1.0 + (rng.next_f64() * 6.0).floor()));

        // Roughly 1 in 10 postings hides the salary
        if rng.next_u64() % 10 == 0 {
            salary_from.push(None);
            salary_to.push(None);
        } else {
            let jitter = 0.8 + rng.next_f64() * 0.4;
            let lo = (arch.salary_base * jitter * 0.9).round();
            let hi = (arch.salary_base * jitter * 1.1).round();
            salary_from.push(Some(lo));
            salary_to.push(Some(hi));
        }

        industries.push(arch.industry.to_string());
        occupations.push(arch.occupation.to_string());
        companies.push(rng.pick(COMPANIES).to_string());
        education.push(arch.education.to_string());

        // Each posting gets a random subset of the archetype's tags
        for skill in arch.skills {
            if rng.next_f64() < 0.7 {
                skills_builder.values().append_value(*skill);
            }
        }
        skills_builder.append(true);
        for cert in arch.certifications {
            if rng.next_f64() < 0.6 {
                certs_builder.values().append_value(*cert);
            }
        }
        certs_builder.append(true);
    }

    let utf8 = |values: Vec<String>| {
        Arc::new(StringArray::from(values)) as arrow::array::ArrayRef
    };
    let f64s = |values: Vec<Option<f64>>| {
        Arc::new(Float64Array::from(values)) as arrow::array::ArrayRef
    };
    let tag_field = |name: &str| {
        Field::new(
            name,
            DataType::List(Arc::new(Field::new("item", DataType::Utf8, true))),
            true,
        )
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("TITLE_NAME", DataType::Utf8, false),
        Field::new("MSA_NAME", DataType::Utf8, false),
        Field::new("EMPLOYMENT_TYPE_NAME", DataType::Utf8, false),
        Field::new("REMOTE_TYPE_NAME", DataType::Utf8, false),
        Field::new("MIN_YEARS_EXPERIENCE", DataType::Float64, true),
        Field::new("MAX_YEARS_EXPERIENCE", DataType::Float64, true),
        Field::new("SALARY_FROM", DataType::Float64, true),
        Field::new("SALARY_TO", DataType::Float64, true),
        Field::new("NAICS2_NAME", DataType::Utf8, false),
        Field::new("SOC_2021_5_NAME", DataType::Utf8, false),
        Field::new("COMPANY_NAME", DataType::Utf8, false),
        Field::new("MIN_EDULEVELS_NAME", DataType::Utf8, false),
        tag_field("SPECIALIZED_SKILLS_NAME"),
        tag_field("CERTIFICATIONS_NAME"),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            utf8(titles),
            utf8(msas),
            utf8(employment),
            utf8(remote),
            f64s(min_exp),
            f64s(max_exp),
            f64s(salary_from),
            f64s(salary_to),
            utf8(industries),
            utf8(occupations),
            utf8(companies),
            utf8(education),
            Arc::new(skills_builder.finish()),
            Arc::new(certs_builder.finish()),
        ],
    )
    .expect("Failed to create RecordBatch");

    // Write Parquet
    let output_path = "sample_postings.parquet";
    let file = std::fs::File::create(output_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!("Wrote {n_rows} postings to {output_path}");
}

use salaryviz_common::data::table::SalaryTable;
use salaryviz_core::data::record::SalaryRecord;
use salaryviz_runtime::data::normalize::normalize_table;
use std::fs;
use std::path::{Path, PathBuf};

pub const HEADER: &str =
    "work_year,experience_level,employment_type,job_title,salary_in_usd,company_size";

/// The two records used throughout the documentation examples
pub const TWO_RECORDS: &str = "\
work_year,experience_level,employment_type,job_title,salary_in_usd,company_size
2021,EN,FT,Data Analyst,100000,M
2022,SE,FT,Data Scientist,300000,L
";

pub fn crate_dir() -> String {
    std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .display()
        .to_string()
}

/// Directory holding the bundled `data/ds_salaries.csv`
pub fn workspace_dir() -> PathBuf {
    Path::new(&crate_dir())
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".."))
}

pub fn sample_csv() -> String {
    fs::read_to_string(workspace_dir().join("data/ds_salaries.csv")).unwrap()
}

/// CSV text with `HEADER` and one line per row
pub fn csv_with_rows(rows: &[&str]) -> String {
    let mut text = format!("{HEADER}\n");
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    text
}

pub fn csv_table(text: &str) -> SalaryTable {
    SalaryTable::from_csv_bytes(text.as_bytes()).unwrap()
}

pub fn csv_records(text: &str) -> Vec<SalaryRecord> {
    normalize_table(&csv_table(text), &Default::default())
        .unwrap()
        .records
}

pub fn write_csv(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

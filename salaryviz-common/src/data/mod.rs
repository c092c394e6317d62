pub mod table;

/// Columns read from the salaries dataset
pub const SALARY_COL: &str = "salary_in_usd";
pub const YEAR_COL: &str = "work_year";
pub const EXPERIENCE_LEVEL_COL: &str = "experience_level";
pub const COMPANY_SIZE_COL: &str = "company_size";
pub const EMPLOYMENT_TYPE_COL: &str = "employment_type";

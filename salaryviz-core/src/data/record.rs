/*
 * SalaryViz
 * Copyright (C) 2024 SalaryViz Contributors
 *
 * This program is distributed under multiple licenses.
 * Please consult the license documentation provided alongside
 * this program the details of the active license.
 */
use salaryviz_common::data::{
    COMPANY_SIZE_COL, EMPLOYMENT_TYPE_COL, EXPERIENCE_LEVEL_COL, SALARY_COL, YEAR_COL,
};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Stable identity of a record: the 0-based data row index in the source file.
///
/// Two normalizations of the same file always assign the same id to the same row, so marks
/// keyed by `RecordId` survive a reload without being re-created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(pub u32);

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "row-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryRecord {
    pub id: RecordId,
    pub salary: f64,
    pub year: i32,
    pub experience_level: String,
    pub company_size: String,
    pub employment_type: String,
}

impl SalaryRecord {
    pub fn category(&self, field: CategoryField) -> &str {
        match field {
            CategoryField::ExperienceLevel => &self.experience_level,
            CategoryField::CompanySize => &self.company_size,
            CategoryField::EmploymentType => &self.employment_type,
        }
    }

    pub fn numeric(&self, field: NumericField) -> f64 {
        match field {
            NumericField::Salary => self.salary,
            NumericField::Year => self.year as f64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryField {
    ExperienceLevel,
    CompanySize,
    EmploymentType,
}

impl CategoryField {
    pub fn column(&self) -> &'static str {
        match self {
            CategoryField::ExperienceLevel => EXPERIENCE_LEVEL_COL,
            CategoryField::CompanySize => COMPANY_SIZE_COL,
            CategoryField::EmploymentType => EMPLOYMENT_TYPE_COL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericField {
    Salary,
    Year,
}

impl NumericField {
    pub fn column(&self) -> &'static str {
        match self {
            NumericField::Salary => SALARY_COL,
            NumericField::Year => YEAR_COL,
        }
    }
}

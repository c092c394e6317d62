mod util;

use crate::util::datasets::{csv_records, sample_csv, TWO_RECORDS};
use rstest::rstest;
use salaryviz_core::data::record::CategoryField;
use salaryviz_core::transform::aggregate::{group_counts, CategoryGroup};

#[cfg(test)]
mod test_group_counts {
    use crate::*;

    #[test]
    fn test_two_records() {
        let grouping = group_counts(
            &csv_records(TWO_RECORDS),
            CategoryField::ExperienceLevel,
            CategoryField::EmploymentType,
        );
        assert_eq!(grouping.b_levels, vec!["FT"]);
        assert_eq!(
            grouping.groups,
            vec![
                CategoryGroup {
                    a: "EN".to_string(),
                    b: "FT".to_string(),
                    count: 1
                },
                CategoryGroup {
                    a: "SE".to_string(),
                    b: "FT".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_sample_experience_by_employment() {
        let grouping = group_counts(
            &csv_records(&sample_csv()),
            CategoryField::ExperienceLevel,
            CategoryField::EmploymentType,
        );
        assert_eq!(grouping.a_levels, vec!["SE", "MI", "EN", "EX"]);
        assert_eq!(grouping.b_levels, vec!["FT", "CT", "PT", "FL"]);

        let flat: Vec<(&str, &str, usize)> = grouping
            .groups
            .iter()
            .map(|g| (g.a.as_str(), g.b.as_str(), g.count))
            .collect();
        assert_eq!(
            flat,
            vec![
                ("SE", "FT", 11),
                ("MI", "CT", 2),
                ("MI", "FT", 4),
                ("EN", "FT", 3),
                ("EN", "PT", 1),
                ("EN", "FL", 1),
                ("EX", "FT", 2),
            ]
        );
        assert_eq!(grouping.count("EX", "CT"), 0);

        let matrix = grouping.to_matrix();
        assert_eq!(matrix.row_sums(), vec![11, 6, 5, 2]);
        assert_eq!(matrix.column_sums(), vec![20, 2, 1, 1]);
    }

    #[rstest(
        a_field,
        b_field,
        case(CategoryField::ExperienceLevel, CategoryField::EmploymentType),
        case(CategoryField::ExperienceLevel, CategoryField::CompanySize),
        case(CategoryField::CompanySize, CategoryField::EmploymentType)
    )]
    fn test_counts_sum_to_records(a_field: CategoryField, b_field: CategoryField) {
        let records = csv_records(&sample_csv());
        let grouping = group_counts(&records, a_field, b_field);
        assert_eq!(grouping.total(), records.len());
        assert!(grouping.groups.iter().all(|g| g.count > 0));

        let chord = grouping.to_matrix().to_chord_matrix();
        assert!(chord.is_square());
        assert_eq!(chord.sources, grouping.a_levels.len());
        assert_eq!(
            chord.len(),
            grouping.a_levels.len() + grouping.b_levels.len()
        );
        for i in 0..chord.len() {
            for j in 0..chord.len() {
                assert_eq!(chord.values[i][j], chord.values[j][i]);
            }
        }
        let total: f64 = chord.values.iter().flatten().sum();
        assert_eq!(total, 2.0 * records.len() as f64);
    }

    #[test]
    fn test_empty_records() {
        let grouping = group_counts(
            &[],
            CategoryField::ExperienceLevel,
            CategoryField::CompanySize,
        );
        assert!(grouping.groups.is_empty());
        assert!(grouping.to_matrix().to_chord_matrix().is_empty());
    }
}

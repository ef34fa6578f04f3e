use super::division;
use super::time_slot::TimeSlot;
use serde::{Deserialize, Serialize};

/// Text the portal shows in place of a missing value.
const PLACEHOLDER: &str = "-";

/// Cell texts of one grid row, already normalized by the cell extractor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowColumns {
    pub year: String,
    pub division: String,
    pub code: String,
    pub name: String,
    pub credit: String,
    pub professor: String,
    pub lecture_time: String,
    pub classroom: String,
    pub room_number: String,
}

/// A course offering as listed in the portal's course-plan grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRecord {
    pub year: String,
    pub semester: String,
    pub division: String,
    pub code: String,
    pub name: String,
    pub is_required: bool,
    pub is_design: bool,
    pub credit: String,
    pub professor: String,
    pub lecture_time: String,
    pub classroom: String,
    pub room_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

fn is_blank(value: &str) -> bool {
    value.is_empty() || value == PLACEHOLDER
}

impl CourseRecord {
    /// Build a record from a row, or `None` when the row has no usable name or code.
    ///
    /// The semester is the label the search was run with; the grid itself
    /// does not carry it.
    pub fn from_columns(columns: RowColumns, semester: &str) -> Option<Self> {
        if is_blank(&columns.name) || is_blank(&columns.code) {
            return None;
        }

        Some(Self {
            is_required: division::is_required(&columns.division),
            is_design: division::is_design(&columns.division),
            year: columns.year,
            semester: semester.to_string(),
            division: columns.division,
            code: columns.code,
            name: columns.name,
            credit: columns.credit,
            professor: columns.professor,
            lecture_time: columns.lecture_time,
            classroom: columns.classroom,
            room_number: columns.room_number,
            rating: None,
        })
    }

    /// Weekly meeting times parsed from the lecture time text.
    pub fn time_slots(&self) -> Vec<TimeSlot> {
        TimeSlot::parse_all(&self.lecture_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> RowColumns {
        RowColumns {
            year: "2025".into(),
            division: "전공필수".into(),
            code: "COMP0204".into(),
            name: "자료구조".into(),
            credit: "3".into(),
            professor: "김교수".into(),
            lecture_time: "화 09:00 ~ 10:15\n목 09:00 ~ 10:15".into(),
            classroom: "IT대학5호관".into(),
            room_number: "345".into(),
        }
    }

    #[test]
    fn builds_record_with_flags() {
        let record = CourseRecord::from_columns(columns(), "1학기").unwrap();
        assert_eq!(record.semester, "1학기");
        assert!(record.is_required);
        assert!(!record.is_design);
        assert_eq!(record.rating, None);
        assert_eq!(record.time_slots().len(), 2);
    }

    #[test]
    fn rejects_placeholder_name() {
        let row = RowColumns {
            name: "-".into(),
            ..columns()
        };
        assert_eq!(CourseRecord::from_columns(row, "1학기"), None);
    }

    #[test]
    fn rejects_empty_code() {
        let row = RowColumns {
            code: String::new(),
            ..columns()
        };
        assert_eq!(CourseRecord::from_columns(row, "1학기"), None);
    }

    #[test]
    fn rejects_placeholder_code() {
        let row = RowColumns {
            code: "-".into(),
            ..columns()
        };
        assert_eq!(CourseRecord::from_columns(row, "1학기"), None);
    }

    #[test]
    fn serializes_camel_case_without_unset_rating() {
        let record = CourseRecord::from_columns(columns(), "1학기").unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["isRequired"], true);
        assert_eq!(json["lectureTime"], "화 09:00 ~ 10:15\n목 09:00 ~ 10:15");
        assert!(json.get("rating").is_none());
    }
}

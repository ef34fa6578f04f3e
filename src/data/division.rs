//! Flags derived from the portal's division ("이수구분") column.

/// Division markers for courses that are required for graduation.
const REQUIRED_MARKERS: &[&str] = &["전공필수", "교양필수"];

/// Division marker for engineering design courses.
const DESIGN_MARKER: &str = "설계";

/// Major-required or general-education-required.
///
/// ```
/// use knu_courses::data::division::is_required;
///
/// assert!(is_required("전공필수"));
/// assert!(is_required("교양필수(설계)"));
/// assert!(!is_required("전공선택"));
/// ```
pub fn is_required(division: &str) -> bool {
    REQUIRED_MARKERS.iter().any(|marker| division.contains(marker))
}

pub fn is_design(division: &str) -> bool {
    division.contains(DESIGN_MARKER)
}

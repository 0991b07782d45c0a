//! The grade-point table and related conversions.

/// Letter grades in descending order, paired with their grade points.
pub const GRADE_POINTS: [(&str, f64); 13] = [
    ("A+", 4.0),
    ("A", 4.0),
    ("A-", 3.7),
    ("B+", 3.3),
    ("B", 3.0),
    ("B-", 2.7),
    ("C+", 2.3),
    ("C", 2.0),
    ("C-", 1.7),
    ("D+", 1.3),
    ("D", 1.0),
    ("D-", 0.7),
    ("F", 0.0),
];

/// Lowest and highest GPA on the 4.0 scale.
pub const MIN_GPA: f64 = 0.0;
pub const MAX_GPA: f64 = 4.0;

/// CWA is GPA mapped onto a 100-point scale.
pub const CWA_SCALE: f64 = 25.0;

/// Grade points for a letter grade, or `None` if it is not in the table.
pub fn lookup(grade: &str) -> Option<f64> {
    GRADE_POINTS
        .iter()
        .find(|(letter, _)| *letter == grade)
        .map(|(_, points)| *points)
}

/// Grade points for a letter grade. Unknown grades score `0.0`.
pub fn grade_points(grade: &str) -> f64 {
    match lookup(grade) {
        Some(points) => points,
        None => {
            tracing::warn!(grade, "unknown letter grade, counting as 0 points");
            0.0
        }
    }
}

pub fn is_known_grade(grade: &str) -> bool {
    lookup(grade).is_some()
}

/// Convert a percentage score to a letter grade.
///
/// `NaN` and values outside `[0, 100]` map to `F`. `D-` is never produced.
pub fn percentage_to_letter(percentage: f64) -> &'static str {
    if percentage.is_nan() || !(0.0..=100.0).contains(&percentage) {
        tracing::warn!(percentage, "invalid percentage, converting to F");
        return "F";
    }
    match percentage {
        p if p >= 93.0 => "A+",
        p if p >= 90.0 => "A",
        p if p >= 87.0 => "A-",
        p if p >= 83.0 => "B+",
        p if p >= 80.0 => "B",
        p if p >= 77.0 => "B-",
        p if p >= 73.0 => "C+",
        p if p >= 70.0 => "C",
        p if p >= 67.0 => "C-",
        p if p >= 63.0 => "D+",
        p if p >= 60.0 => "D",
        _ => "F",
    }
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

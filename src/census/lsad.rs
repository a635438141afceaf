//! LSAD (Legal/Statistical Area Description) class codes used by census
//! boundary files to say what kind of boundary a record is.

/// Class codes that mark a state boundary
pub const STATE_CODES: &[&str] = &["01"];

/// Class codes that mark a congressional district (or its territorial analogues)
pub const CONGRESSIONAL_DISTRICT_CODES: &[&str] = &["C1", "C2", "C3", "C4"];

/// Which entity variant a record with a given class code becomes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryClass {
    State,
    CongressionalDistrict,
    Other,
}

impl BoundaryClass {
    pub fn from_lsad(code: &str) -> Self {
        if STATE_CODES.contains(&code) {
            BoundaryClass::State
        } else if CONGRESSIONAL_DISTRICT_CODES.contains(&code) {
            BoundaryClass::CongressionalDistrict
        } else {
            BoundaryClass::Other
        }
    }
}

/// Human-readable description of a known class code.
///
/// Used when a record carries no `LSAD_TRANS` translation of its own.
pub fn describe(code: &str) -> Option<&'static str> {
    match code {
        "01" => Some("State"),
        "C1" => Some("Congressional District (at Large)"),
        "C2" => Some("Congressional District"),
        "C3" => Some("Resident Commissioner District (at Large)"),
        "C4" => Some("Delegate District (at Large)"),
        _ => None,
    }
}

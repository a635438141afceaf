//! State FIPS code to postal abbreviation table.
//! See: https://www.census.gov/library/reference/code-lists/ansi.html

/// Every state FIPS code with its postal abbreviation (50 states, DC, PR).
pub const FIPS_TO_STATE: &[(&str, &str)] = &[
    ("01", "AL"),
    ("02", "AK"),
    ("04", "AZ"),
    ("05", "AR"),
    ("06", "CA"),
    ("08", "CO"),
    ("09", "CT"),
    ("10", "DE"),
    ("11", "DC"),
    ("12", "FL"),
    ("13", "GA"),
    ("15", "HI"),
    ("16", "ID"),
    ("17", "IL"),
    ("18", "IN"),
    ("19", "IA"),
    ("20", "KS"),
    ("21", "KY"),
    ("22", "LA"),
    ("23", "ME"),
    ("24", "MD"),
    ("25", "MA"),
    ("26", "MI"),
    ("27", "MN"),
    ("28", "MS"),
    ("29", "MO"),
    ("30", "MT"),
    ("31", "NE"),
    ("32", "NV"),
    ("33", "NH"),
    ("34", "NJ"),
    ("35", "NM"),
    ("36", "NY"),
    ("37", "NC"),
    ("38", "ND"),
    ("39", "OH"),
    ("40", "OK"),
    ("41", "OR"),
    ("42", "PA"),
    ("44", "RI"),
    ("45", "SC"),
    ("46", "SD"),
    ("47", "TN"),
    ("48", "TX"),
    ("49", "UT"),
    ("50", "VT"),
    ("51", "VA"),
    ("53", "WA"),
    ("54", "WV"),
    ("55", "WI"),
    ("56", "WY"),
    ("72", "PR"),
];

/// Look up the postal abbreviation for a two-digit state FIPS code
pub fn state_for_fips(fips: &str) -> Option<&'static str> {
    FIPS_TO_STATE
        .iter()
        .find(|(code, _)| *code == fips)
        .map(|(_, state)| *state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_covers_states_dc_and_pr() {
        assert_eq!(FIPS_TO_STATE.len(), 52);
        assert_eq!(state_for_fips("11"), Some("DC"));
        assert_eq!(state_for_fips("72"), Some("PR"));
    }

    #[test]
    fn test_gaps_in_code_space_are_unmapped() {
        // 03, 07, 14, 43 and 52 were reserved and never assigned
        for code in ["03", "07", "14", "43", "52", "1", ""] {
            assert_eq!(state_for_fips(code), None);
        }
    }
}

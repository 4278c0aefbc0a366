//! U.S. state and territory postal abbreviations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("Unknown state name: {0}")]
    UnknownState(String),
}

/// Full name to USPS code, 50 states plus DC and five territories.
pub const STATE_CODES: [(&str, &str); 56] = [
    ("Alabama", "AL"),
    ("Alaska", "AK"),
    ("American Samoa", "AS"),
    ("Arizona", "AZ"),
    ("Arkansas", "AR"),
    ("California", "CA"),
    ("Colorado", "CO"),
    ("Connecticut", "CT"),
    ("Delaware", "DE"),
    ("District of Columbia", "DC"),
    ("Florida", "FL"),
    ("Georgia", "GA"),
    ("Guam", "GU"),
    ("Hawaii", "HI"),
    ("Idaho", "ID"),
    ("Illinois", "IL"),
    ("Indiana", "IN"),
    ("Iowa", "IA"),
    ("Kansas", "KS"),
    ("Kentucky", "KY"),
    ("Louisiana", "LA"),
    ("Maine", "ME"),
    ("Maryland", "MD"),
    ("Massachusetts", "MA"),
    ("Michigan", "MI"),
    ("Minnesota", "MN"),
    ("Mississippi", "MS"),
    ("Missouri", "MO"),
    ("Montana", "MT"),
    ("Nebraska", "NE"),
    ("Nevada", "NV"),
    ("New Hampshire", "NH"),
    ("New Jersey", "NJ"),
    ("New Mexico", "NM"),
    ("New York", "NY"),
    ("North Carolina", "NC"),
    ("North Dakota", "ND"),
    ("Northern Mariana Islands", "MP"),
    ("Ohio", "OH"),
    ("Oklahoma", "OK"),
    ("Oregon", "OR"),
    ("Pennsylvania", "PA"),
    ("Puerto Rico", "PR"),
    ("Rhode Island", "RI"),
    ("South Carolina", "SC"),
    ("South Dakota", "SD"),
    ("Tennessee", "TN"),
    ("Texas", "TX"),
    ("Utah", "UT"),
    ("Vermont", "VT"),
    ("Virgin Islands", "VI"),
    ("Virginia", "VA"),
    ("Washington", "WA"),
    ("West Virginia", "WV"),
    ("Wisconsin", "WI"),
    ("Wyoming", "WY"),
];

/// Look up the two-letter code for a full state name. Matching is exact.
pub fn state_abbreviation(state_name: &str) -> Result<&'static str, LookupError> {
    STATE_CODES
        .iter()
        .find(|(name, _)| *name == state_name)
        .map(|(_, code)| *code)
        .ok_or_else(|| LookupError::UnknownState(state_name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_known_states() {
        assert_eq!(state_abbreviation("California"), Ok("CA"));
        assert_eq!(state_abbreviation("District of Columbia"), Ok("DC"));
        assert_eq!(state_abbreviation("Wyoming"), Ok("WY"));
    }

    #[test]
    fn test_unknown_state_fails() {
        assert_eq!(
            state_abbreviation("Atlantis"),
            Err(LookupError::UnknownState("Atlantis".to_string()))
        );
        assert!(state_abbreviation("california").is_err());
    }

    #[test]
    fn test_table_has_unique_entries() {
        let names: HashSet<_> = STATE_CODES.iter().map(|(n, _)| n).collect();
        let codes: HashSet<_> = STATE_CODES.iter().map(|(_, c)| c).collect();
        assert_eq!(names.len(), 56);
        assert_eq!(codes.len(), 56);
    }
}

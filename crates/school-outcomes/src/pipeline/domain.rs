use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which school-count table a joined dataset was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchoolKind {
    #[default]
    HighSchool,
    University,
}

impl SchoolKind {
    pub const fn ordered() -> [Self; 2] {
        [Self::HighSchool, Self::University]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::HighSchool => "High schools",
            Self::University => "Universities",
        }
    }

    pub const fn slug(self) -> &'static str {
        match self {
            Self::HighSchool => "high_school",
            Self::University => "university",
        }
    }
}

impl fmt::Display for SchoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for SchoolKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "high_school" | "highschool" | "high" => Ok(Self::HighSchool),
            "university" | "uni" => Ok(Self::University),
            other => Err(format!(
                "unknown dataset '{other}'; expected high_school or university"
            )),
        }
    }
}

/// Institution type of an outcome sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeVariant {
    National,
    Public,
    Private,
}

impl OutcomeVariant {
    pub const fn ordered() -> [Self; 3] {
        [Self::National, Self::Public, Self::Private]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::National => "National",
            Self::Public => "Public",
            Self::Private => "Private",
        }
    }
}

/// One region after the join: school count plus combined outcomes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionRecord {
    pub region: String,
    pub schools: u64,
    pub graduates: u64,
    pub university_track: u64,
    pub rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn school_kind_parses_cli_and_query_spellings() {
        assert_eq!("high-school".parse::<SchoolKind>(), Ok(SchoolKind::HighSchool));
        assert_eq!("HIGH_SCHOOL".parse::<SchoolKind>(), Ok(SchoolKind::HighSchool));
        assert_eq!("university".parse::<SchoolKind>(), Ok(SchoolKind::University));
        assert!("college".parse::<SchoolKind>().is_err());
    }

    #[test]
    fn school_kind_display_matches_serde_name() {
        for kind in SchoolKind::ordered() {
            let json = serde_json::to_string(&kind).expect("serializes");
            assert_eq!(json, format!("\"{kind}\""));
        }
    }
}

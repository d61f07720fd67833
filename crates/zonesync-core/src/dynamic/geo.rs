// # Geo codes
//
// A geo code targets a continent (`EU`), a country (`EU-FR`) or a
// province (`NA-US-CA`). Province codes parse, but the steering engines
// reject them during validation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Continent codes accepted as the first geo component
pub const CONTINENTS: [&str; 7] = ["AF", "AN", "AS", "EU", "NA", "OC", "SA"];

const AFRICA: &[&str] = &[
    "AO", "BF", "BI", "BJ", "BW", "CD", "CF", "CG", "CI", "CM", "CV", "DJ", "DZ", "EG", "EH",
    "ER", "ET", "GA", "GH", "GM", "GN", "GQ", "GW", "KE", "KM", "LR", "LS", "LY", "MA", "MG",
    "ML", "MR", "MU", "MW", "MZ", "NA", "NE", "NG", "RE", "RW", "SC", "SD", "SH", "SL", "SN",
    "SO", "SS", "ST", "SZ", "TD", "TG", "TN", "TZ", "UG", "YT", "ZA", "ZM", "ZW",
];

const ANTARCTICA: &[&str] = &["AQ", "BV", "GS", "HM", "TF"];

const ASIA: &[&str] = &[
    "AE", "AF", "AM", "AZ", "BD", "BH", "BN", "BT", "CC", "CN", "CX", "CY", "GE", "HK", "ID",
    "IL", "IN", "IO", "IQ", "IR", "JO", "JP", "KG", "KH", "KP", "KR", "KW", "KZ", "LA", "LB",
    "LK", "MM", "MN", "MO", "MV", "MY", "NP", "OM", "PH", "PK", "PS", "QA", "SA", "SG", "SY",
    "TH", "TJ", "TL", "TM", "TR", "TW", "UZ", "VN", "YE",
];

const EUROPE: &[&str] = &[
    "AD", "AL", "AT", "AX", "BA", "BE", "BG", "BY", "CH", "CZ", "DE", "DK", "EE", "ES", "FI",
    "FO", "FR", "GB", "GG", "GI", "GR", "HR", "HU", "IE", "IM", "IS", "IT", "JE", "LI", "LT",
    "LU", "LV", "MC", "MD", "ME", "MK", "MT", "NL", "NO", "PL", "PT", "RO", "RS", "RU", "SE",
    "SI", "SJ", "SK", "SM", "UA", "VA", "XK",
];

const NORTH_AMERICA: &[&str] = &[
    "AG", "AI", "AW", "BB", "BL", "BM", "BQ", "BS", "BZ", "CA", "CR", "CU", "CW", "DM", "DO",
    "GD", "GL", "GP", "GT", "HN", "HT", "JM", "KN", "KY", "LC", "MF", "MQ", "MS", "MX", "NI",
    "PA", "PM", "PR", "SV", "SX", "TC", "TT", "US", "VC", "VG", "VI",
];

const OCEANIA: &[&str] = &[
    "AS", "AU", "CK", "FJ", "FM", "GU", "KI", "MH", "MP", "NC", "NF", "NR", "NU", "NZ", "PF",
    "PG", "PN", "PW", "SB", "TK", "TO", "TV", "UM", "VU", "WF", "WS",
];

const SOUTH_AMERICA: &[&str] = &[
    "AR", "BO", "BR", "CL", "CO", "EC", "FK", "GF", "GY", "PE", "PY", "SR", "UY", "VE",
];

/// Continent a raw ISO 3166-1 alpha-2 country code belongs to
pub fn continent_for_country(country: &str) -> Option<&'static str> {
    let table: [(&'static str, &[&str]); 7] = [
        ("AF", AFRICA),
        ("AN", ANTARCTICA),
        ("AS", ASIA),
        ("EU", EUROPE),
        ("NA", NORTH_AMERICA),
        ("OC", OCEANIA),
        ("SA", SOUTH_AMERICA),
    ];

    table
        .iter()
        .find(|(_, countries)| countries.contains(&country))
        .map(|(continent, _)| *continent)
}

/// A parsed geo target
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GeoCode {
    pub continent: String,
    pub country: Option<String>,
    pub province: Option<String>,
}

impl GeoCode {
    /// A whole continent
    pub fn continent(continent: impl Into<String>) -> Self {
        Self {
            continent: continent.into(),
            country: None,
            province: None,
        }
    }

    /// A single country inside `continent`
    pub fn country(continent: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            continent: continent.into(),
            country: Some(country.into()),
            province: None,
        }
    }

    /// Build the geo code for a raw country code, looking up its continent
    pub fn from_country(country: &str) -> Option<Self> {
        continent_for_country(country).map(|continent| Self::country(continent, country))
    }

    pub fn is_province(&self) -> bool {
        self.province.is_some()
    }
}

impl fmt::Display for GeoCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.continent)?;
        if let Some(country) = &self.country {
            write!(f, "-{}", country)?;
        }
        if let Some(province) = &self.province {
            write!(f, "-{}", province)?;
        }
        Ok(())
    }
}

impl FromStr for GeoCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('-').collect();
        if parts.len() > 3 || parts.iter().any(|p| p.is_empty()) {
            return Err(Error::invalid_input(format!("Invalid geo code: {}", s)));
        }

        let continent = parts[0].to_ascii_uppercase();
        if !CONTINENTS.contains(&continent.as_str()) {
            return Err(Error::invalid_input(format!(
                "Invalid geo code {}: unknown continent {}",
                s, continent
            )));
        }

        Ok(Self {
            continent,
            country: parts.get(1).map(|c| c.to_ascii_uppercase()),
            province: parts.get(2).map(|p| p.to_ascii_uppercase()),
        })
    }
}

impl TryFrom<String> for GeoCode {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GeoCode> for String {
    fn from(code: GeoCode) -> Self {
        code.to_string()
    }
}

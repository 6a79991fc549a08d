//! Country list backing the country selector and phone calling codes
//!
//! Codes are ISO 3166-1 alpha-2.

use serde::Serialize;

/// A selectable country
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Country {
    pub code: &'static str,
    pub name: &'static str,
    pub calling_code: u16,
}

const fn country(code: &'static str, name: &'static str, calling_code: u16) -> Country {
    Country {
        code,
        name,
        calling_code,
    }
}

/// Countries in display order (by name)
pub const COUNTRIES: &[Country] = &[
    country("AR", "Argentina", 54),
    country("AU", "Australia", 61),
    country("AT", "Austria", 43),
    country("BD", "Bangladesh", 880),
    country("BE", "Belgium", 32),
    country("BR", "Brazil", 55),
    country("CA", "Canada", 1),
    country("CN", "China", 86),
    country("EG", "Egypt", 20),
    country("FR", "France", 33),
    country("DE", "Germany", 49),
    country("IN", "India", 91),
    country("ID", "Indonesia", 62),
    country("IE", "Ireland", 353),
    country("IT", "Italy", 39),
    country("JP", "Japan", 81),
    country("KE", "Kenya", 254),
    country("MY", "Malaysia", 60),
    country("MX", "Mexico", 52),
    country("NL", "Netherlands", 31),
    country("NZ", "New Zealand", 64),
    country("NG", "Nigeria", 234),
    country("NO", "Norway", 47),
    country("PK", "Pakistan", 92),
    country("PH", "Philippines", 63),
    country("PL", "Poland", 48),
    country("PT", "Portugal", 351),
    country("SA", "Saudi Arabia", 966),
    country("SG", "Singapore", 65),
    country("ZA", "South Africa", 27),
    country("KR", "South Korea", 82),
    country("ES", "Spain", 34),
    country("SE", "Sweden", 46),
    country("CH", "Switzerland", 41),
    country("TR", "Turkey", 90),
    country("AE", "United Arab Emirates", 971),
    country("GB", "United Kingdom", 44),
    country("US", "United States", 1),
];

/// Looks up a country by alpha-2 code, case-insensitively
pub fn lookup(code: &str) -> Option<&'static Country> {
    COUNTRIES.iter().find(|c| c.code.eq_ignore_ascii_case(code))
}

/// First country using the given calling code
pub fn by_calling_code(calling_code: u16) -> Option<&'static Country> {
    COUNTRIES.iter().find(|c| c.calling_code == calling_code)
}

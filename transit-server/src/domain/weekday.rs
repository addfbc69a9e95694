//! Days of the week a schedule applies to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown weekday name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown weekday: {0:?}")]
pub struct InvalidWeekday(String);

/// A day of the week.
///
/// Serializes in English lowercase. Stored documents written with the
/// Spanish day names (`"Lunes"` … `"Domingo"`) are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    #[serde(alias = "Lunes", alias = "lunes")]
    Monday,
    #[serde(alias = "Martes", alias = "martes")]
    Tuesday,
    #[serde(alias = "Miércoles", alias = "miércoles", alias = "miercoles")]
    Wednesday,
    #[serde(alias = "Jueves", alias = "jueves")]
    Thursday,
    #[serde(alias = "Viernes", alias = "viernes")]
    Friday,
    #[serde(alias = "Sábado", alias = "sábado", alias = "sabado")]
    Saturday,
    #[serde(alias = "Domingo", alias = "domingo")]
    Sunday,
}

impl Weekday {
    /// English lowercase name, as serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }
}

impl FromStr for Weekday {
    type Err = InvalidWeekday;

    /// Parse an English or Spanish day name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let day = match s.to_lowercase().as_str() {
            "monday" | "lunes" => Weekday::Monday,
            "tuesday" | "martes" => Weekday::Tuesday,
            "wednesday" | "miércoles" | "miercoles" => Weekday::Wednesday,
            "thursday" | "jueves" => Weekday::Thursday,
            "friday" | "viernes" => Weekday::Friday,
            "saturday" | "sábado" | "sabado" => Weekday::Saturday,
            "sunday" | "domingo" => Weekday::Sunday,
            _ => return Err(InvalidWeekday(s.to_string())),
        };
        Ok(day)
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

use super::super::domain::{parse_int_prefix, ReadingValue};
use serde::Serialize;

/// Blood pressure category, evaluated from the most to the least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BloodPressureBand {
    Invalid,
    Normal,
    Elevated,
    Stage1,
    Stage2,
    /// Parsed reading outside every band above. Integer readings always land in a band.
    Unclassified,
}

impl BloodPressureBand {
    pub fn points(self) -> u8 {
        match self {
            BloodPressureBand::Stage2 => 4,
            BloodPressureBand::Stage1 => 3,
            BloodPressureBand::Elevated => 2,
            BloodPressureBand::Normal => 1,
            BloodPressureBand::Invalid | BloodPressureBand::Unclassified => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BloodPressureBand::Invalid => "invalid or missing",
            BloodPressureBand::Normal => "normal",
            BloodPressureBand::Elevated => "elevated",
            BloodPressureBand::Stage1 => "stage 1",
            BloodPressureBand::Stage2 => "stage 2",
            BloodPressureBand::Unclassified => "unclassified",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureBand {
    Invalid,
    Normal,
    LowFever,
    HighFever,
}

impl TemperatureBand {
    pub fn points(self) -> u8 {
        match self {
            TemperatureBand::HighFever => 2,
            TemperatureBand::LowFever => 1,
            TemperatureBand::Normal | TemperatureBand::Invalid => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TemperatureBand::Invalid => "invalid or missing",
            TemperatureBand::Normal => "normal",
            TemperatureBand::LowFever => "low fever",
            TemperatureBand::HighFever => "high fever",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeBand {
    Invalid,
    Under40,
    From40To65,
    Over65,
}

impl AgeBand {
    pub fn points(self) -> u8 {
        match self {
            AgeBand::Over65 => 2,
            AgeBand::From40To65 | AgeBand::Under40 => 1,
            AgeBand::Invalid => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeBand::Invalid => "invalid or missing",
            AgeBand::Under40 => "under 40",
            AgeBand::From40To65 => "40-65",
            AgeBand::Over65 => "over 65",
        }
    }
}

/// Splits a `"systolic/diastolic"` string into its two integer parts.
pub(crate) fn parse_blood_pressure(raw: Option<&ReadingValue>) -> Option<(i64, i64)> {
    let text = raw?.as_text()?;
    let mut parts = text.split('/');
    let systolic = parts.next()?;
    let diastolic = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    Some((parse_int_prefix(systolic)?, parse_int_prefix(diastolic)?))
}

pub(crate) fn parse_temperature(raw: Option<&ReadingValue>) -> Option<f64> {
    raw?.as_float().filter(|value| !value.is_nan())
}

pub(crate) fn parse_age(raw: Option<&ReadingValue>) -> Option<f64> {
    raw?.as_whole().filter(|value| !value.is_nan())
}

pub fn blood_pressure_band(raw: Option<&ReadingValue>) -> BloodPressureBand {
    let Some((systolic, diastolic)) = parse_blood_pressure(raw) else {
        return BloodPressureBand::Invalid;
    };

    if systolic >= 140 || diastolic >= 90 {
        BloodPressureBand::Stage2
    } else if (130..=139).contains(&systolic) || (80..=89).contains(&diastolic) {
        BloodPressureBand::Stage1
    } else if (120..=129).contains(&systolic) && diastolic < 80 {
        BloodPressureBand::Elevated
    } else if systolic < 120 && diastolic < 80 {
        BloodPressureBand::Normal
    } else {
        BloodPressureBand::Unclassified
    }
}

/// Temperatures in the open interval (100.9, 101.0) match neither fever band and score as
/// normal.
pub fn temperature_band(raw: Option<&ReadingValue>) -> TemperatureBand {
    let Some(temperature) = parse_temperature(raw) else {
        return TemperatureBand::Invalid;
    };

    if temperature >= 101.0 {
        TemperatureBand::HighFever
    } else if (99.6..=100.9).contains(&temperature) {
        TemperatureBand::LowFever
    } else {
        TemperatureBand::Normal
    }
}

pub fn age_band(raw: Option<&ReadingValue>) -> AgeBand {
    let Some(age) = parse_age(raw) else {
        return AgeBand::Invalid;
    };

    if age > 65.0 {
        AgeBand::Over65
    } else if (40.0..=65.0).contains(&age) {
        AgeBand::From40To65
    } else {
        AgeBand::Under40
    }
}

pub fn blood_pressure_risk(raw: Option<&ReadingValue>) -> u8 {
    blood_pressure_band(raw).points()
}

pub fn temperature_risk(raw: Option<&ReadingValue>) -> u8 {
    temperature_band(raw).points()
}

pub fn age_risk(raw: Option<&ReadingValue>) -> u8 {
    age_band(raw).points()
}

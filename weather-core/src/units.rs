use std::fmt;

/// Unit system requested from the API and used for display symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Units {
    #[default]
    Metric,
    Imperial,
    Standard,
}

impl Units {
    /// Map the CLI shorthand (`M`, `I`, `S`) to a unit system.
    ///
    /// Unrecognised values fall back to metric instead of being rejected.
    pub fn from_flag(flag: &str) -> Self {
        match flag.trim().to_lowercase().as_str() {
            "s" | "standard" => Units::Standard,
            "i" | "imperial" => Units::Imperial,
            _ => Units::Metric,
        }
    }

    /// Value of the `units` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
            Units::Standard => "standard",
        }
    }

    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
            Units::Standard => "K",
        }
    }

    pub fn speed_symbol(&self) -> &'static str {
        match self {
            Units::Imperial => "mph",
            Units::Metric | Units::Standard => "m/s",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Metric, Units::Imperial, Units::Standard]
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorthand_flags_map_to_unit_systems() {
        assert_eq!(Units::from_flag("M"), Units::Metric);
        assert_eq!(Units::from_flag("I"), Units::Imperial);
        assert_eq!(Units::from_flag("S"), Units::Standard);
        assert_eq!(Units::from_flag("i"), Units::Imperial);
    }

    #[test]
    fn unknown_flag_defaults_to_metric() {
        assert_eq!(Units::from_flag("X"), Units::Metric);
        assert_eq!(Units::from_flag(""), Units::Metric);
        assert_eq!(Units::from_flag("kelvin"), Units::Metric);
    }

    #[test]
    fn long_names_roundtrip() {
        for units in Units::all() {
            assert_eq!(Units::from_flag(units.as_str()), *units);
        }
    }

    #[test]
    fn symbols_per_unit_system() {
        assert_eq!(Units::Metric.temperature_symbol(), "°C");
        assert_eq!(Units::Metric.speed_symbol(), "m/s");
        assert_eq!(Units::Imperial.temperature_symbol(), "°F");
        assert_eq!(Units::Imperial.speed_symbol(), "mph");
        assert_eq!(Units::Standard.temperature_symbol(), "K");
        assert_eq!(Units::Standard.speed_symbol(), "m/s");
    }

    #[test]
    fn unrecognised_flag_uses_metric_symbols() {
        let units = Units::from_flag("?");
        assert_eq!(units.temperature_symbol(), "°C");
        assert_eq!(units.speed_symbol(), "m/s");
    }
}

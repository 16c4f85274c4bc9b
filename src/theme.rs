//! Light/dark theme selection.

use std::fmt;
use std::str::FromStr;

/// Attribute set on `<body>`.
pub const THEME_ATTRIBUTE: &str = "data-theme";

/// Name of the radio group that picks the theme.
pub const THEME_INPUT_NAME: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub const ALL: [Theme; 2] = [Theme::Light, Theme::Dark];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
        }
    }

    /// Theme currently applied, read back from the `data-theme` value.
    /// A missing or unknown value means the default.
    pub fn from_attribute(value: Option<&str>) -> Theme {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_themes() {
        for theme in Theme::ALL {
            assert_eq!(theme.as_str().parse::<Theme>(), Ok(theme));
        }
    }

    #[test]
    fn test_unknown_theme_rejected() {
        assert_eq!(
            "solarized".parse::<Theme>(),
            Err("unknown theme: solarized".to_string())
        );
        assert!("Dark".parse::<Theme>().is_err());
    }

    #[test]
    fn test_theme_read_back_from_attribute() {
        assert_eq!(Theme::from_attribute(Some("dark")), Theme::Dark);
        assert_eq!(Theme::from_attribute(Some("light")), Theme::Light);
        assert_eq!(Theme::from_attribute(Some("sepia")), Theme::Light);
        assert_eq!(Theme::from_attribute(None), Theme::Light);
    }
}

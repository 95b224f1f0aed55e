//! Top-level navigable views.

use serde::{Deserialize, Serialize};

/// The storefront's four top-level views.
///
/// Exactly one is current at a time. There is no deep linking, so this
/// value lives only in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Home,
    Diets,
    Health,
    About,
}

impl View {
    /// Navigation order.
    pub const ALL: [Self; 4] = [Self::Home, Self::Diets, Self::Health, Self::About];

    /// Navigation identifier, e.g. `"diets"`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Diets => "diets",
            Self::Health => "health",
            Self::About => "about",
        }
    }

    /// Navigation label, e.g. `"Diet Plans"`.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Diets => "Diet Plans",
            Self::Health => "Health Info",
            Self::About => "About",
        }
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown identifiers fall back to [`View::Home`].
impl std::str::FromStr for View {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .unwrap_or_default())
    }
}

//! Closed category sets for catalog records.
//!
//! Categories arrive from the data service as plain strings. Decoding them
//! into these enums at the boundary means a record with an unknown category
//! fails loudly instead of silently disappearing from every filtered view.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Behaviour shared by the category enums.
pub trait Category: Copy + Eq + fmt::Debug + 'static {
    /// Every variant, in display order.
    const ALL: &'static [Self];

    /// Label of the "everything" selection for this category set.
    const ALL_LABEL: &'static str;

    /// Wire value, e.g. `"weight-loss"`.
    fn as_str(&self) -> &'static str;

    /// Human-readable label, e.g. `"Weight Loss"`.
    fn label(&self) -> &'static str;

    /// Look up a variant by wire value.
    #[must_use]
    fn from_wire(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == s)
    }
}

/// Diet plan categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlanCategory {
    Balanced,
    WeightLoss,
    MuscleGain,
    Vegan,
    Keto,
    Beginner,
}

impl Category for PlanCategory {
    const ALL: &'static [Self] = &[
        Self::Balanced,
        Self::WeightLoss,
        Self::MuscleGain,
        Self::Vegan,
        Self::Keto,
        Self::Beginner,
    ];
    const ALL_LABEL: &'static str = "All Plans";

    fn as_str(&self) -> &'static str {
        match self {
            Self::Balanced => "balanced",
            Self::WeightLoss => "weight-loss",
            Self::MuscleGain => "muscle-gain",
            Self::Vegan => "vegan",
            Self::Keto => "keto",
            Self::Beginner => "beginner",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Balanced => "Balanced",
            Self::WeightLoss => "Weight Loss",
            Self::MuscleGain => "Muscle Gain",
            Self::Vegan => "Plant-Based",
            Self::Keto => "Keto",
            Self::Beginner => "Beginner",
        }
    }
}

/// Health article categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleCategory {
    Nutrition,
    Fitness,
    Wellness,
}

impl Category for ArticleCategory {
    const ALL: &'static [Self] = &[Self::Nutrition, Self::Fitness, Self::Wellness];
    const ALL_LABEL: &'static str = "All Articles";

    fn as_str(&self) -> &'static str {
        match self {
            Self::Nutrition => "nutrition",
            Self::Fitness => "fitness",
            Self::Wellness => "wellness",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Nutrition => "Nutrition",
            Self::Fitness => "Fitness",
            Self::Wellness => "Wellness",
        }
    }
}

macro_rules! impl_category_text {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty as Category>::from_wire(s)
                    .ok_or_else(|| format!("unknown {} category: {s}", stringify!($ty)))
            }
        }
    };
}

impl_category_text!(PlanCategory);
impl_category_text!(ArticleCategory);

/// The category selection applied to a catalog view.
///
/// Parsing never fails: `"all"` selects everything, a known wire value
/// selects that category, and anything else becomes
/// [`CategoryFilter::Unrecognized`], which matches no records.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter<C> {
    /// The `"all"` sentinel.
    #[default]
    All,
    /// A single known category.
    Only(C),
    /// A value outside the category set.
    Unrecognized(String),
}

impl<C: Category> CategoryFilter<C> {
    /// Wire value of the sentinel selection.
    pub const ALL_SENTINEL: &'static str = "all";

    /// Parse a selection from its wire value.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s == Self::ALL_SENTINEL {
            return Self::All;
        }
        C::from_wire(s).map_or_else(|| Self::Unrecognized(s.to_owned()), Self::Only)
    }

    /// Every selectable option in display order, starting with "all".
    #[must_use]
    pub fn options() -> Vec<Self> {
        std::iter::once(Self::All)
            .chain(C::ALL.iter().copied().map(Self::Only))
            .collect()
    }

    /// Whether a record in `category` is visible under this selection.
    #[must_use]
    pub fn matches(&self, category: C) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => *selected == category,
            Self::Unrecognized(_) => false,
        }
    }

    /// Wire value of this selection.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => Self::ALL_SENTINEL,
            Self::Only(c) => c.as_str(),
            Self::Unrecognized(raw) => raw,
        }
    }

    /// Human-readable label of this selection.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::All => C::ALL_LABEL,
            Self::Only(c) => c.label(),
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl<C: Category> FromStr for CategoryFilter<C> {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// A record that belongs to exactly one category.
pub trait Categorized {
    /// The category set.
    type Category: Category;

    /// This record's category.
    fn category(&self) -> Self::Category;
}

impl<T: Categorized + ?Sized> Categorized for &T {
    type Category = T::Category;

    fn category(&self) -> Self::Category {
        (**self).category()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_category_wire_values() {
        let json = serde_json::to_string(&PlanCategory::WeightLoss).unwrap();
        assert_eq!(json, "\"weight-loss\"");
        let parsed: PlanCategory = serde_json::from_str("\"muscle-gain\"").unwrap();
        assert_eq!(parsed, PlanCategory::MuscleGain);
    }

    #[test]
    fn test_serde_agrees_with_as_str() {
        for c in PlanCategory::ALL {
            assert_eq!(serde_json::to_string(c).unwrap(), format!("\"{}\"", c.as_str()));
        }
        for c in ArticleCategory::ALL {
            assert_eq!(serde_json::to_string(c).unwrap(), format!("\"{}\"", c.as_str()));
        }
    }

    #[test]
    fn test_unknown_category_rejected_by_serde() {
        assert!(serde_json::from_str::<ArticleCategory>("\"recipes\"").is_err());
    }

    #[test]
    fn test_vegan_label_is_plant_based() {
        assert_eq!(PlanCategory::Vegan.label(), "Plant-Based");
    }

    #[test]
    fn test_filter_parse() {
        assert_eq!(CategoryFilter::<PlanCategory>::parse("all"), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::<PlanCategory>::parse("keto"),
            CategoryFilter::Only(PlanCategory::Keto)
        );
        assert_eq!(
            CategoryFilter::<PlanCategory>::parse("paleo"),
            CategoryFilter::Unrecognized("paleo".to_string())
        );
    }

    #[test]
    fn test_filter_matches() {
        let keto = CategoryFilter::Only(PlanCategory::Keto);
        assert!(keto.matches(PlanCategory::Keto));
        assert!(!keto.matches(PlanCategory::Vegan));
        assert!(CategoryFilter::<PlanCategory>::All.matches(PlanCategory::Vegan));
        assert!(!CategoryFilter::<PlanCategory>::Unrecognized("x".into()).matches(PlanCategory::Vegan));
    }

    #[test]
    fn test_options_start_with_all() {
        let options = CategoryFilter::<ArticleCategory>::options();
        let labels: Vec<&str> = options.iter().map(CategoryFilter::label).collect();
        assert_eq!(labels, ["All Articles", "Nutrition", "Fitness", "Wellness"]);
    }
}

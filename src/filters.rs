//! Stateless filter predicates applied to stored-recipe queries and to the
//! raw find-by-ingredients pass-through.

/// Preparation-time bucket as exposed by the search endpoints. Unknown
/// strings deliberately fall back to no filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrepTimeBucket {
    #[default]
    Any,
    /// "10-60": 10 to 60 minutes inclusive.
    Short,
    /// "60-90": 60 to 90 minutes inclusive.
    Medium,
    /// "+90": strictly more than 90 minutes.
    Long,
}

impl PrepTimeBucket {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("10-60") => PrepTimeBucket::Short,
            Some("60-90") => PrepTimeBucket::Medium,
            Some("+90") => PrepTimeBucket::Long,
            _ => PrepTimeBucket::Any,
        }
    }

    pub fn contains(&self, minutes: i64) -> bool {
        match self {
            PrepTimeBucket::Any => true,
            PrepTimeBucket::Short => (10..=60).contains(&minutes),
            PrepTimeBucket::Medium => (60..=90).contains(&minutes),
            PrepTimeBucket::Long => minutes > 90,
        }
    }

    /// SQL predicate over the `prep_time` column, `None` when unfiltered.
    pub fn sql_clause(&self) -> Option<&'static str> {
        match self {
            PrepTimeBucket::Any => None,
            PrepTimeBucket::Short => Some("prep_time BETWEEN 10 AND 60"),
            PrepTimeBucket::Medium => Some("prep_time BETWEEN 60 AND 90"),
            PrepTimeBucket::Long => Some("prep_time > 90"),
        }
    }
}

/// Composable, order-independent predicates over stored recipes. The
/// meal_type and diet fields match exactly against enrichment columns that
/// no current code path populates, so those filters eliminate all rows
/// until population logic exists.
#[derive(Debug, Clone, Default)]
pub struct RecipeFilters {
    pub meal_type: Option<String>,
    pub diet: Option<String>,
    pub prep_time: PrepTimeBucket,
    pub exclude_ingredients: Vec<String>,
}

impl RecipeFilters {
    pub fn new(
        meal_type: Option<String>,
        diet: Option<String>,
        prep_time: Option<&str>,
        exclude_ingredients: Vec<String>,
    ) -> Self {
        Self {
            meal_type,
            diet,
            prep_time: PrepTimeBucket::parse(prep_time),
            exclude_ingredients,
        }
    }
}

/// Split a comma-separated parameter into trimmed, non-empty terms.
pub fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_parse_maps_known_labels() {
        assert_eq!(PrepTimeBucket::parse(Some("10-60")), PrepTimeBucket::Short);
        assert_eq!(PrepTimeBucket::parse(Some("60-90")), PrepTimeBucket::Medium);
        assert_eq!(PrepTimeBucket::parse(Some("+90")), PrepTimeBucket::Long);
        assert_eq!(PrepTimeBucket::parse(Some("banana")), PrepTimeBucket::Any);
        assert_eq!(PrepTimeBucket::parse(None), PrepTimeBucket::Any);
    }

    #[test]
    fn sixty_one_minutes_is_medium_not_short() {
        assert!(PrepTimeBucket::Medium.contains(61));
        assert!(!PrepTimeBucket::Short.contains(61));
    }

    #[test]
    fn bucket_edges_are_inclusive_except_long() {
        assert!(PrepTimeBucket::Short.contains(10));
        assert!(PrepTimeBucket::Short.contains(60));
        assert!(PrepTimeBucket::Medium.contains(60));
        assert!(PrepTimeBucket::Medium.contains(90));
        assert!(!PrepTimeBucket::Long.contains(90));
        assert!(PrepTimeBucket::Long.contains(91));
    }

    #[test]
    fn unknown_bucket_matches_everything() {
        assert!(PrepTimeBucket::Any.contains(0));
        assert!(PrepTimeBucket::Any.contains(10_000));
    }

    #[test]
    fn split_csv_trims_and_drops_empty_terms() {
        assert_eq!(split_csv("milk, eggs ,,  "), vec!["milk", "eggs"]);
        assert!(split_csv("").is_empty());
    }
}

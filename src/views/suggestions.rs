use crate::model::{AiSuggestion, Impact, SuggestionCategory};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// Sort order for the suggestion list, always descending
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionSort {
    #[default]
    Priority,
    Savings,
    Impact,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct SuggestionFilter {
    pub category: Option<SuggestionCategory>,
    pub impact: Option<Impact>,
    #[serde(default)]
    pub sort: SuggestionSort,
}

/// Filter then sort; ties keep catalog order
pub fn filter_suggestions(
    suggestions: &[AiSuggestion],
    filter: &SuggestionFilter,
) -> Vec<AiSuggestion> {
    let mut result: Vec<AiSuggestion> = suggestions
        .iter()
        .filter(|s| filter.category.map_or(true, |c| s.category == c))
        .filter(|s| filter.impact.map_or(true, |i| s.impact == i))
        .cloned()
        .collect();

    match filter.sort {
        SuggestionSort::Priority => result.sort_by_key(|s| Reverse(s.priority)),
        SuggestionSort::Savings => result.sort_by_key(|s| Reverse(s.estimated_savings)),
        SuggestionSort::Impact => result.sort_by_key(|s| Reverse(s.impact)),
    }

    result
}

/// Headline numbers for the suggestions page
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionTotals {
    pub count: usize,
    pub total_savings: u64,
    pub high_impact: usize,
    /// Distinct categories in first-seen order
    pub categories: Vec<SuggestionCategory>,
}

impl SuggestionTotals {
    pub fn from_suggestions(suggestions: &[AiSuggestion]) -> Self {
        let mut categories = Vec::new();
        for s in suggestions {
            if !categories.contains(&s.category) {
                categories.push(s.category);
            }
        }

        Self {
            count: suggestions.len(),
            total_savings: suggestions.iter().map(|s| u64::from(s.estimated_savings)).sum(),
            high_impact: suggestions.iter().filter(|s| s.impact == Impact::High).count(),
            categories,
        }
    }
}

/// Estimated monthly savings, rounded to whole currency units
pub fn monthly_savings(suggestion: &AiSuggestion) -> u32 {
    (f64::from(suggestion.estimated_savings) / 12.0).round() as u32
}

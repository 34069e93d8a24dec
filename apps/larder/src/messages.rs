//! User-facing status lines shared by the CLI and the HTTP API.

use larder_core::LarderError;
use larder_core::primitives::MAX_SEARCH_TERM_LENGTH;

pub const EMPTY_SEARCH: &str = "Enter an ingredient to search.";
pub const NO_MATCHES: &str = "No recipes matched that ingredient.";
pub const RECIPE_NOT_FOUND: &str = "Recipe not found.";

/// Summary line for a search that returned `count` recipes.
pub fn search_summary(count: usize) -> String {
    match count {
        0 => NO_MATCHES.to_string(),
        1 => "Found 1 recipe.".to_string(),
        n => format!("Found {} recipes.", n),
    }
}

/// Trim a raw search term; blank or over-long terms are rejected.
pub fn normalize_search_term(raw: &str) -> Result<String, LarderError> {
    let term = raw.trim();
    if term.is_empty() {
        return Err(LarderError::InvalidInput(EMPTY_SEARCH.to_string()));
    }
    if term.len() > MAX_SEARCH_TERM_LENGTH {
        return Err(LarderError::InvalidInput(format!(
            "Search term is {} bytes, maximum is {}",
            term.len(),
            MAX_SEARCH_TERM_LENGTH
        )));
    }
    Ok(term.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_lines() {
        assert_eq!(search_summary(0), NO_MATCHES);
        assert_eq!(search_summary(1), "Found 1 recipe.");
        assert_eq!(search_summary(12), "Found 12 recipes.");
    }

    #[test]
    fn search_terms_are_trimmed() {
        assert_eq!(normalize_search_term("  Flour ").expect("term"), "Flour");
        assert!(matches!(
            normalize_search_term(" \t "),
            Err(LarderError::InvalidInput(msg)) if msg == EMPTY_SEARCH
        ));
        assert!(normalize_search_term(&"a".repeat(MAX_SEARCH_TERM_LENGTH + 1)).is_err());
    }
}

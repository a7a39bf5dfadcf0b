//! # Search Term Matching
//!
//! Decides which catalog models a free-text search term refers to.
//!
//! ## Matching Rule
//! ```text
//! term  "PRO  iphone"  ──lowercase + split_whitespace──►  ["pro", "iphone"]
//!
//! model "iPhone 15 Pro", keywords ["ip15p"]
//!       haystack = "iphone 15 pro ip15p"
//!
//! match ⇔ every token is a substring of the haystack
//!         "pro" ✓   "iphone" ✓   → MATCH
//! ```
//!
//! Token order never matters. A token may match across no word boundary
//! ("phone" matches "iphone") but never spans a space, so "iphone16" does
//! not match "iPhone 16".

use crate::types::PhoneModel;

/// A search term split into lower-cased tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchTerms {
    tokens: Vec<String>,
}

impl SearchTerms {
    /// Tokenizes a raw search term.
    pub fn parse(term: &str) -> Self {
        SearchTerms {
            tokens: term
                .to_lowercase()
                .split_whitespace()
                .map(str::to_string)
                .collect(),
        }
    }

    /// Returns true if the term had no tokens (blank input).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Returns the tokens in input order.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Checks every token against an already lower-cased haystack.
    pub fn matches(&self, haystack: &str) -> bool {
        !self.is_empty() && self.tokens.iter().all(|token| haystack.contains(token.as_str()))
    }

    /// Checks a catalog model's name and search keywords.
    pub fn matches_model(&self, model: &PhoneModel) -> bool {
        self.matches(&model_haystack(model))
    }
}

/// Lower-cased text a model is searchable by.
pub fn model_haystack(model: &PhoneModel) -> String {
    let mut haystack = model.name.to_lowercase();
    for keyword in &model.search_keywords {
        haystack.push(' ');
        haystack.push_str(&keyword.to_lowercase());
    }
    haystack
}

/// Filters models to those matching `terms`, keeping catalog order.
pub fn matching_models<'a, I>(terms: &SearchTerms, models: I) -> Vec<PhoneModel>
where
    I: IntoIterator<Item = &'a PhoneModel>,
{
    models
        .into_iter()
        .filter(|model| terms.matches_model(model))
        .cloned()
        .collect()
}

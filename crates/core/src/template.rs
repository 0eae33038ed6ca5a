//! Placeholder extraction for stored mustache search templates

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// `{{ name }}`, `{{{ name }}}` and section openers `{{#name}}` / `{{^name}}`.
/// Section closers repeat an already counted name and are not matched.
#[allow(clippy::expect_used)]
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*[#^]?\s*([A-Za-z_][A-Za-z0-9_.\-]*)\s*\}\}")
        .expect("valid placeholder regex")
});

/// Mustache helpers provided by the backend rather than by the caller
const BUILTIN_HELPERS: &[&str] = &["toJson", "join", "url"];

/// Well-known template parameters, returned alongside the extracted names
pub const PARAMETER_GLOSSARY: &str = "\
Parameter descriptions:
- query: the full natural language search text of the user
- latitude: latitude of the search center, from geocode_location
- longitude: longitude of the search center, from geocode_location
- distance: search radius around the center, e.g. \"10miles\" or \"5km\"
- bathrooms: minimum number of bathrooms
- bedrooms: minimum number of bedrooms
- tax: maximum annual property tax
- maintenance: maximum monthly maintenance or HOA fee
- square_footage: minimum living area in square feet
- home_price: maximum home price; a range such as \"0-500000\" uses its upper bound
- features: desired amenities, e.g. \"pool\", \"garage\", \"waterfront\"";

/// Extracts the distinct placeholder names used in a template body
///
/// Whitespace inside the braces is ignored. Names come back sorted.
pub fn extract_template_parameters(source: &str) -> BTreeSet<String> {
    PLACEHOLDER
        .captures_iter(source)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|name| !BUILTIN_HELPERS.contains(name))
        .map(str::to_string)
        .collect()
}

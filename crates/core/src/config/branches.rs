//! Branch rule matching.

use glob::{MatchOptions, Pattern};
use rk_protocol::config_models::BranchRule;

/// Find the first rule whose pattern matches `branch`.
///
/// Rules are glob patterns matched like paths: `main` matches only `main`,
/// `release/*` matches `release/1.x` but not `release/1.x/rc`, and `**`
/// spans segments. Invalid patterns never match; the loader rejects them
/// before a release starts.
pub fn matching_rule<'a>(rules: &'a [BranchRule], branch: &str) -> Option<&'a BranchRule> {
    const OPTIONS: MatchOptions = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };

    rules.iter().find(|rule| {
        Pattern::new(&rule.name)
            .map(|pattern| pattern.matches_with(branch, OPTIONS))
            .unwrap_or(false)
    })
}

//! Category and group inference from file names.
//!
//! Matching is a case-insensitive substring test against each configured
//! token, first match wins in configuration order. Falling back to a default
//! is reported through [`Origin::Defaulted`] so the pipeline can log it; a
//! misnamed file would otherwise mix categories unnoticed.

use tvstat_core::config::Config;
use tvstat_core::{Classification, Resolved};

use crate::FeedError;

/// Classify `file_name` using the category and group tokens in `config`.
pub fn classify(file_name: &str, config: &Config) -> Result<Classification, FeedError> {
    let lower = file_name.to_lowercase();
    let matches = |tokens: &[String]| tokens.iter().any(|t| !t.is_empty() && lower.contains(&t.to_lowercase()));

    let category = match config.categories.iter().find(|c| matches(&c.tokens)) {
        Some(cat) => Resolved::inferred(cat.name.as_str()),
        None => match &config.parsing.default_category {
            Some(name) => Resolved::defaulted(name.as_str()),
            None => return Err(FeedError::Unclassified(file_name.to_string())),
        },
    };

    let group = match config.groups.iter().find(|g| matches(&g.tokens)) {
        Some(group) => Resolved::inferred(group.label.as_str()),
        None => Resolved::defaulted(config.parsing.default_group.as_str()),
    };

    Ok(Classification { category, group })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tvstat_core::Origin;

    #[rstest]
    #[case("bench_go_day1.log", "golang", "day1")]
    #[case("bench_py_day3.log", "python", "day3")]
    #[case("BENCH_GOLANG_DAY2.LOG", "golang", "day2")]
    #[case("python-run.log", "python", "day1")]
    fn infers_from_tokens(#[case] name: &str, #[case] category: &str, #[case] group: &str) {
        let class = classify(name, &Config::defaults()).unwrap();
        assert_eq!(class.category.value, category);
        assert_eq!(class.category.origin, Origin::Inferred);
        assert_eq!(class.group.value, group);
    }

    #[test]
    fn missing_group_token_is_defaulted_explicitly() {
        let class = classify("bench_go.log", &Config::defaults()).unwrap();
        assert_eq!(class.group.value, "day1");
        assert_eq!(class.group.origin, Origin::Defaulted);
    }

    #[test]
    fn unknown_category_without_default_is_an_error() {
        let err = classify("bench_rust_day1.log", &Config::defaults()).unwrap_err();
        assert!(matches!(err, FeedError::Unclassified(_)));
    }

    #[test]
    fn default_category_is_marked_defaulted() {
        let cfg = Config::from_toml("[parsing]\ndefault_category = \"golang\"\n").unwrap();
        let class = classify("bench_rust_day2.log", &cfg).unwrap();
        assert_eq!(class.category.value, "golang");
        assert_eq!(class.category.origin, Origin::Defaulted);
        assert_eq!(class.group.value, "day2");
    }
}

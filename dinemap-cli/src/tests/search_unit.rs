//! Focused unit tests covering search CLI configuration and execution.

use super::helpers::{StubProviderFactory, at, block_on, providers_with};
use super::*;
use crate::search::{SearchArgs, SearchCommandConfig, execute_search};
use dinemap_core::Suggestion;
use dinemap_core::test_support::ScriptedPlaces;
use rstest::rstest;
use std::sync::Arc;

fn args(query: &str) -> SearchArgs {
    SearchArgs {
        query: Some(query.to_owned()),
        api_key: Some("k3y".to_owned()),
        ..SearchArgs::default()
    }
}

#[rstest]
#[case::missing_query(SearchArgs { query: None, ..args("pho") }, ARG_QUERY, ENV_SEARCH_QUERY)]
#[case::blank_query(args("   "), ARG_QUERY, ENV_SEARCH_QUERY)]
#[case::missing_key(SearchArgs { api_key: None, ..args("pho") }, ARG_API_KEY, ENV_SEARCH_API_KEY)]
#[case::half_a_bias(
    SearchArgs { latitude: Some(10.0), ..args("pho") },
    ARG_LONGITUDE,
    ENV_SEARCH_LONGITUDE
)]
fn converting_incomplete_search_errors(
    #[case] input: SearchArgs,
    #[case] expected_field: &'static str,
    #[case] expected_env: &'static str,
) {
    let err = SearchCommandConfig::try_from(input).expect_err("incomplete search should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, expected_field);
            assert_eq!(env, expected_env);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn search_config_carries_key_and_bias() {
    let input = SearchArgs {
        latitude: Some(10.5),
        longitude: Some(106.25),
        places_base_url: Some("http://places.test".to_owned()),
        ..args("pho")
    };

    let config = SearchCommandConfig::try_from(input).expect("config should build");

    assert_eq!(config.bias, Some(at(10.5, 106.25)));
    assert_eq!(config.services.api_key, "k3y");
    assert_eq!(config.services.places_base_url, "http://places.test");
    assert!(!config.select);
}

#[rstest]
fn execute_search_sends_one_biased_request() {
    let places = Arc::new(
        ScriptedPlaces::new().with_suggestions("pho", vec![Suggestion::new("p1", "Pho Hoa")]),
    );
    let factory = StubProviderFactory::new(providers_with(Arc::clone(&places)));
    let mut config = SearchCommandConfig::try_from(args("pho")).expect("config");
    config.bias = Some(at(10.5, 106.25));

    let output = block_on(execute_search(&config, &factory)).expect("search should run");

    assert_eq!(output.suggestions, vec![Suggestion::new("p1", "Pho Hoa")]);
    assert_eq!(output.selected, None);
    assert_eq!(
        places.queries(),
        vec![("pho".to_owned(), Some(at(10.5, 106.25)))]
    );
}

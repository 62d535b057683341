//! S6: `whoprovides`/`whorequires` against a shared fixture cache.

use depot_query::relation_query::{who_provides, who_requires, Spec};
use depot_test_utils::scenario_cache;

#[test]
fn s6_query_by_whoprovides_regex() {
    let (cache, ids) = scenario_cache();

    let specs = vec![Spec::parse("lib.*").unwrap()];
    let mut hits: Vec<_> = who_provides(&cache, &specs, true).unwrap();
    hits.sort_by_key(|e| e.packages().to_vec());
    let providers: std::collections::BTreeSet<_> =
        hits.iter().flat_map(|e| e.packages().iter().copied()).collect();
    assert!(providers.contains(&ids.lib_a));
    assert!(providers.contains(&ids.lib_b));

    let specs = vec![Spec::parse("libcommon").unwrap()];
    let requirers: Vec<_> = who_requires(&cache, &specs, false).unwrap();
    let by: std::collections::BTreeSet<_> = requirers.iter().flat_map(|e| e.packages().iter().copied()).collect();
    assert_eq!(by.len(), 1);
    assert!(by.contains(&ids.tool_1_0));
}

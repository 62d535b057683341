//! Shared fixtures for cross-crate scenario tests, covering S1-S6.

use depot_cache::Cache;
use depot_core::{Depends, LoadSink, LoaderId, PackageId, Provides, RelOp, Version};

fn ver(s: &str) -> Version {
    Version::parse(s).expect("fixture version literals are always valid")
}

/// Package ids assigned by [`scenario_cache`], named for lookup in tests.
#[derive(Debug, Clone, Copy)]
#[allow(missing_docs)]
pub struct ScenarioIds {
    pub foo_1_0: PackageId,
    pub bar_2_0: PackageId,
    pub libx_1_2: PackageId,
    pub baz_1_0: PackageId,
    pub baz_2_0: PackageId,
    pub qux_1_0: PackageId,
    pub alpha_1_0: PackageId,
    pub beta_1_0: PackageId,
    pub lib_a: PackageId,
    pub lib_b: PackageId,
    pub tool_1_0: PackageId,
}

/// Builds the shared cache fixture used by scenarios S1-S6, along with the
/// ids it assigned.
#[must_use]
pub fn scenario_cache() -> (Cache, ScenarioIds) {
    let mut cache = Cache::new();
    let loader = LoaderId(0);

    // S1: a standalone package with no requirements.
    let foo_1_0 = cache.declare_package(loader, "foo", "1.0", "", false).unwrap();

    // S2: bar requires libx>=1, satisfied by libx-1.2.
    let bar_2_0 = cache.declare_package(loader, "bar", "2.0", "", false).unwrap();
    let libx_1_2 = cache.declare_package(loader, "libx", "1.2", "", false).unwrap();
    cache.add_requires(bar_2_0, Depends::new("libx", RelOp::Ge, Some(ver("1"))));
    cache.add_provides(libx_1_2, Provides::new("libx", Some(ver("1.2"))));

    // S3: baz-1.0 is installed; baz-2.0 is available under the same name.
    let baz_1_0 = cache.declare_package(loader, "baz", "1.0", "", true).unwrap();
    let baz_2_0 = cache.declare_package(loader, "baz", "2.0", "", false).unwrap();

    // S4: qux requires a capability nothing provides.
    let qux_1_0 = cache.declare_package(loader, "qux", "1.0", "", false).unwrap();
    cache.add_requires(qux_1_0, Depends::new("missing", RelOp::Ge, Some(ver("1"))));

    // S5: alpha is installed and conflicts with beta.
    let alpha_1_0 = cache.declare_package(loader, "alpha", "1.0", "", true).unwrap();
    let beta_1_0 = cache.declare_package(loader, "beta", "1.0", "", false).unwrap();
    cache.add_conflicts(alpha_1_0, Depends::new("beta", RelOp::None, None));
    cache.add_provides(alpha_1_0, Provides::new("alpha", Some(ver("1.0"))));
    cache.add_provides(beta_1_0, Provides::new("beta", Some(ver("1.0"))));

    // S6: lib-a and lib-b both provide libcommon; tool-1.0 requires it.
    let lib_a = cache.declare_package(loader, "lib-a", "1.0", "", false).unwrap();
    let lib_b = cache.declare_package(loader, "lib-b", "1.0", "", false).unwrap();
    let tool_1_0 = cache.declare_package(loader, "tool", "1.0", "", false).unwrap();
    cache.add_provides(lib_a, Provides::new("libcommon", None));
    cache.add_provides(lib_b, Provides::new("libcommon", None));
    cache.add_requires(tool_1_0, Depends::new("libcommon", RelOp::None, None));

    cache.link_deps();

    let ids = ScenarioIds {
        foo_1_0,
        bar_2_0,
        libx_1_2,
        baz_1_0,
        baz_2_0,
        qux_1_0,
        alpha_1_0,
        beta_1_0,
        lib_a,
        lib_b,
        tool_1_0,
    };
    (cache, ids)
}

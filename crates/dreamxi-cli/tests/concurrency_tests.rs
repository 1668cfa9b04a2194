// Concurrent fixture runs over one shared bundle must match sequential runs.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dreamxi_app::config::load_config_from;
use dreamxi_app::pipeline::StatsBundle;
use dreamxi_cli::run_predictions;
use dreamxi_core::Fixture;

fn project_root() -> PathBuf {
    let cwd = std::env::current_dir().unwrap();
    cwd.ancestors()
        .find(|dir| dir.join("defaults").join("engine.toml").exists())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| panic!("Cannot locate defaults/ directory from CWD {:?}", cwd))
}

/// Bundle and fixture from the shipped defaults, via a scratch `config/`.
fn sample_named(name: &str) -> (StatsBundle, Fixture) {
    let tmp = std::env::temp_dir().join(format!("dreamxi_cli_{name}"));
    let _ = fs::remove_dir_all(&tmp);
    fs::create_dir_all(tmp.join("config")).unwrap();
    let root = project_root();
    for file in ["engine.toml", "fixture.toml"] {
        fs::copy(root.join("defaults").join(file), tmp.join("config").join(file)).unwrap();
    }
    let config = load_config_from(&tmp).unwrap();
    let bundle = StatsBundle::load(&config, &root).unwrap();
    (bundle, config.fixture.to_fixture())
}

/// The sample fixture plus variations on venue and side order.
fn variations(base: &Fixture) -> Vec<Fixture> {
    let mut swapped = base.clone();
    std::mem::swap(&mut swapped.home, &mut swapped.away);

    let mut elsewhere = base.clone();
    elsewhere.venue = "Wankhede Stadium".into();

    let mut tight = base.clone();
    tight.home.entries.truncate(3);

    vec![base.clone(), swapped, elsewhere, tight, base.clone()]
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_runs_match_sequential_runs() {
    let (bundle, base) = sample_named("concurrent");
    let fixtures = variations(&base);
    let sequential: Vec<_> = fixtures.iter().map(|f| bundle.predict(f)).collect();

    let bundle = Arc::new(bundle);
    let concurrent = run_predictions(Arc::clone(&bundle), fixtures.clone())
        .await
        .unwrap();

    assert_eq!(concurrent.len(), fixtures.len());
    assert_eq!(concurrent, sequential);
    assert_eq!(concurrent[0], concurrent[4]);
    assert_eq!(concurrent[1].home, "Chennai Super Kings");
}

#[tokio::test]
async fn no_fixtures_no_predictions() {
    let (bundle, _) = sample_named("empty");
    let out = run_predictions(Arc::new(bundle), vec![]).await.unwrap();
    assert!(out.is_empty());
}

use postbuild::core::config::PipelineConfig;
use postbuild::core::models::ProcessorId;
use postbuild::core::services::ProcessorManager;
use std::fs;
use std::path::Path;

fn quiet_config() -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.reporting.enabled = false;
    config
}

/// Valid JavaScript padded with a block comment to exactly `len` bytes
fn js_of_len(len: usize) -> String {
    let code = "function add(first, second) {\n  return first + second;\n}\nexport { add };\n";
    let padding = len - code.len() - 4;
    format!("{}/*{}*/", code, " ".repeat(padding))
}

fn article_page(paragraphs: usize) -> String {
    let body: String = (0..paragraphs)
        .map(|i| format!("    <p>\n      Paragraph number {} of the article body.\n    </p>\n", i))
        .collect();
    format!(
        "<!DOCTYPE html>\n<html>\n  <head>\n    <title>Article</title>\n  </head>\n  <body>\n    <!-- content -->\n{}  </body>\n</html>\n",
        body
    )
}

#[tokio::test]
async fn test_single_js_file_scenario() {
    let temp = tempfile::tempdir().unwrap();
    let dist = temp.path().join("dist");
    fs::create_dir_all(&dist).unwrap();
    let source = js_of_len(500);
    assert_eq!(source.len(), 500);
    fs::write(dist.join("app.js"), &source).unwrap();

    let mut config = quiet_config();
    config.gzip.enabled = false;
    let mut manager = ProcessorManager::new(&config).unwrap();

    let stats = manager
        .run_processor(ProcessorId::JavaScript, temp.path(), Path::new("dist"))
        .await
        .unwrap();

    assert_eq!(stats.file_count, 1);
    assert_eq!(stats.original_size(), 500);
    assert!(stats.compressed_size() < 500);
    assert!(fs::metadata(dist.join("app.js")).unwrap().len() < 500);
}

#[tokio::test]
async fn test_full_pipeline_over_site_output() {
    let temp = tempfile::tempdir().unwrap();
    let dist = temp.path().join("dist");
    fs::create_dir_all(dist.join("blog/first-post")).unwrap();
    fs::create_dir_all(dist.join("_astro")).unwrap();
    fs::create_dir_all(dist.join("maps/deep")).unwrap();

    fs::write(dist.join("index.html"), article_page(80)).unwrap();
    fs::write(dist.join("blog/first-post/index.html"), article_page(5)).unwrap();
    fs::write(dist.join("app.js"), js_of_len(600)).unwrap();
    fs::write(dist.join("_astro/hoisted.js"), "export  const  a = 1;").unwrap();
    fs::write(dist.join("maps/deep/app.js.map"), "{}").unwrap();

    let mut manager = ProcessorManager::new(&quiet_config()).unwrap();
    let results = manager.run_all(temp.path(), Path::new("dist")).await;

    let order: Vec<ProcessorId> = results.iter().map(|(id, _)| *id).collect();
    assert_eq!(
        order,
        vec![
            ProcessorId::JavaScript,
            ProcessorId::Html,
            ProcessorId::Cleanup,
            ProcessorId::Gzip
        ]
    );
    assert!(results.iter().all(|(_, stats)| stats.errors.is_empty()));

    // _astro output is left exactly as the site generator wrote it
    assert_eq!(
        fs::read_to_string(dist.join("_astro/hoisted.js")).unwrap(),
        "export  const  a = 1;"
    );
    assert!(!dist.join("_astro/hoisted.js.gz").exists());

    let html = fs::read_to_string(dist.join("index.html")).unwrap();
    assert!(!html.contains("<!-- content -->"));
    assert!(dist.join("index.html.gz").exists());

    assert!(!dist.join("maps").exists());

    let report = manager.report();
    assert_eq!(report.stats("javascript").unwrap().file_count, 1);
    assert_eq!(report.stats("html").unwrap().file_count, 2);
    assert_eq!(report.stats("cleanup").unwrap().file_count, 1);
    let totals = report.totals();
    assert!(totals.compressed_size < totals.original_size);
    assert_eq!(totals.errors, 0);
}

#[tokio::test]
async fn test_global_ignores_protect_dependencies() {
    let temp = tempfile::tempdir().unwrap();
    let dist = temp.path().join("dist");
    fs::create_dir_all(dist.join("node_modules/pkg")).unwrap();
    fs::write(dist.join("node_modules/pkg/index.js"), "var   untouched = 1;").unwrap();
    fs::write(dist.join("main.js"), "var   touched = 1;\nexport { touched };").unwrap();

    let mut config = quiet_config();
    config.gzip.enabled = false;
    let mut manager = ProcessorManager::new(&config).unwrap();
    let stats = manager
        .run_processor(ProcessorId::JavaScript, temp.path(), Path::new("dist"))
        .await
        .unwrap();

    assert_eq!(stats.file_count, 1);
    assert_eq!(
        fs::read_to_string(dist.join("node_modules/pkg/index.js")).unwrap(),
        "var   untouched = 1;"
    );
}

#[tokio::test]
async fn test_broken_file_is_isolated() {
    let temp = tempfile::tempdir().unwrap();
    let dist = temp.path().join("dist");
    fs::create_dir_all(&dist).unwrap();
    let mut originals = Vec::new();
    for i in 1..=5 {
        let source = if i == 3 {
            "function (".to_string()
        } else {
            format!("export function f{}(value) {{\n  return value * {};\n}}\n", i, i)
        };
        fs::write(dist.join(format!("chunk{}.js", i)), &source).unwrap();
        originals.push(source);
    }

    let mut manager = ProcessorManager::new(&quiet_config()).unwrap();
    let results = manager.run_all(temp.path(), Path::new("dist")).await;

    let (_, js) = results
        .iter()
        .find(|(id, _)| *id == ProcessorId::JavaScript)
        .unwrap();
    assert_eq!(js.file_count, 4);
    assert_eq!(js.errors.len(), 1);
    assert!(js.errors[0].contains("chunk3.js"));
    assert_eq!(fs::read_to_string(dist.join("chunk3.js")).unwrap(), "function (");
    for i in [1, 2, 4, 5] {
        let rewritten = fs::read_to_string(dist.join(format!("chunk{}.js", i))).unwrap();
        assert!(rewritten.len() < originals[i - 1].len(), "chunk{}.js was not minified", i);
        assert!(rewritten.contains(&format!("f{}", i)));
    }
    assert_eq!(manager.report().totals().errors, 1);
}

#[tokio::test]
async fn test_missing_dist_completes_with_empty_stats() {
    let temp = tempfile::tempdir().unwrap();

    let mut manager = ProcessorManager::new(&quiet_config()).unwrap();
    let results = manager.run_all(temp.path(), Path::new("dist")).await;

    assert_eq!(results.len(), 4);
    for (_, stats) in results {
        assert_eq!(stats.file_count, 0);
        assert!(stats.errors.is_empty());
    }
}

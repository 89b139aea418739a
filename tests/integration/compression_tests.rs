use flate2::read::GzDecoder;
use postbuild::core::config::PipelineConfig;
use postbuild::core::models::ProcessorId;
use postbuild::core::services::ProcessorManager;
use std::fs;
use std::io::Read;
use std::path::Path;

fn compression_only() -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.javascript.enabled = false;
    config.html.enabled = false;
    config.cleanup.enabled = false;
    config.reporting.enabled = false;
    config
}

fn page_of_len(len: usize) -> String {
    "<section><h2>Heading</h2><p>Some text for the page.</p></section>"
        .chars()
        .cycle()
        .take(len)
        .collect()
}

#[tokio::test]
async fn test_html_page_gets_gzip_sibling() {
    let temp = tempfile::tempdir().unwrap();
    let dist = temp.path().join("dist");
    fs::create_dir_all(&dist).unwrap();
    let page = page_of_len(2000);
    fs::write(dist.join("index.html"), &page).unwrap();

    let mut manager = ProcessorManager::new(&compression_only()).unwrap();
    let results = manager.run_all(temp.path(), Path::new("dist")).await;

    assert_eq!(results.len(), 1);
    let (id, stats) = &results[0];
    assert_eq!(*id, ProcessorId::Gzip);
    assert_eq!(stats.file_count, 1);
    assert_eq!(stats.original_size(), 2000);

    let archive = fs::read(dist.join("index.html.gz")).unwrap();
    assert!(!archive.is_empty());
    assert_eq!(fs::read_to_string(dist.join("index.html")).unwrap(), page);

    let mut decoded = String::new();
    GzDecoder::new(&archive[..]).read_to_string(&mut decoded).unwrap();
    assert_eq!(decoded, page);
}

#[tokio::test]
async fn test_gzip_and_brotli_side_by_side() {
    let temp = tempfile::tempdir().unwrap();
    let dist = temp.path().join("dist");
    fs::create_dir_all(dist.join("data")).unwrap();
    let feed = page_of_len(4096);
    fs::write(dist.join("data/feed.xml"), &feed).unwrap();
    fs::write(dist.join("data/tiny.json"), "{}").unwrap();
    fs::write(dist.join("photo.png"), page_of_len(4096)).unwrap();

    let mut config = compression_only();
    config.brotli.enabled = true;
    let mut manager = ProcessorManager::new(&config).unwrap();
    let results = manager.run_all(temp.path(), Path::new("dist")).await;

    let ids: Vec<ProcessorId> = results.iter().map(|(id, _)| *id).collect();
    assert_eq!(ids, vec![ProcessorId::Gzip, ProcessorId::Brotli]);
    for (_, stats) in &results {
        assert_eq!(stats.file_count, 1);
    }

    assert!(dist.join("data/feed.xml.gz").exists());
    assert!(!dist.join("data/tiny.json.gz").exists());
    assert!(!dist.join("photo.png.gz").exists());

    let archive = fs::read(dist.join("data/feed.xml.br")).unwrap();
    let mut decoded = Vec::new();
    brotli::Decompressor::new(&archive[..], 4096)
        .read_to_end(&mut decoded)
        .unwrap();
    assert_eq!(decoded, feed.as_bytes());
}

#[tokio::test]
async fn test_cdn_settings_raise_threshold() {
    let temp = tempfile::tempdir().unwrap();
    let dist = temp.path().join("dist");
    fs::create_dir_all(&dist).unwrap();
    fs::write(dist.join("index.html"), page_of_len(1500)).unwrap();

    let config = postbuild::utils::ConfigLoader::apply_env_overrides(compression_only(), Some("cdn"));
    let mut manager = ProcessorManager::new(&config).unwrap();
    let stats = manager
        .run_processor(ProcessorId::Gzip, temp.path(), Path::new("dist"))
        .await
        .unwrap();

    assert_eq!(stats.file_count, 0);
    assert!(!dist.join("index.html.gz").exists());
}

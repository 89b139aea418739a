use postbuild::core::config::{PipelineConfig, RunTarget};
use postbuild::core::models::ProcessorId;
use postbuild::core::services::ProcessorManager;
use postbuild::utils::ConfigLoader;
use std::fs;
use std::path::Path;

#[tokio::test]
async fn test_cleanup_target_removes_generated_output() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("dist/assets")).unwrap();
    fs::create_dir_all(root.join(".astro/types")).unwrap();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(root.join("dist/index.html"), "<p>hi</p>").unwrap();
    fs::write(root.join("dist/assets/app.js"), "let a;").unwrap();
    fs::write(root.join(".astro/types/content.d.ts"), "export {};").unwrap();
    fs::write(root.join("src/index.astro"), "---\n---").unwrap();

    let config = ConfigLoader::for_target(PipelineConfig::default(), RunTarget::Cleanup);
    let mut manager = ProcessorManager::new(&config).unwrap();
    assert_eq!(manager.enabled_processors(), vec![ProcessorId::Cleanup]);

    let results = manager.run_all(root, Path::new("dist")).await;
    let (_, stats) = &results[0];

    assert_eq!(stats.file_count, 3);
    assert!(stats.errors.is_empty());
    assert!(!root.join("dist").exists());
    assert!(!root.join(".astro").exists());
    assert!(root.join("src/index.astro").exists());
    assert!(manager.report().render().is_none());
}

#[tokio::test]
async fn test_cleanup_is_idempotent() {
    let temp = tempfile::tempdir().unwrap();
    let dist = temp.path().join("dist");
    fs::create_dir_all(dist.join("a/b/c")).unwrap();
    fs::write(dist.join("a/b/c/file.tmp"), "").unwrap();
    fs::write(dist.join("a/b/keep.html"), "<p>keep</p>").unwrap();
    fs::write(dist.join("bundle.js.map"), "{}").unwrap();

    let mut config = PipelineConfig::default();
    config.reporting.enabled = false;
    let mut manager = ProcessorManager::new(&config).unwrap();

    let first = manager
        .run_processor(ProcessorId::Cleanup, temp.path(), Path::new("dist"))
        .await
        .unwrap();
    assert_eq!(first.file_count, 2);
    assert_eq!(first.deleted_dirs(), &[dist.join("a/b/c")]);
    assert!(dist.join("a/b/keep.html").exists());

    let second = manager
        .run_processor(ProcessorId::Cleanup, temp.path(), Path::new("dist"))
        .await
        .unwrap();
    assert_eq!(second.file_count, 0);
    assert!(second.deleted_dirs().is_empty());
    assert!(second.errors.is_empty());

    // Replaced, not summed
    assert_eq!(manager.report().stats("cleanup").unwrap().file_count, 0);
}

//! Still-image and batch generation against an in-memory image backend.

mod common;

use carousel_forge::batch::{MANIFEST_FILE, PREVIOUSLY_GENERATED};
use carousel_forge::{
    generate_still, load_prompts, run_batch, BatchPrompt, CarouselError, ImagesManifest, StillImageRequest,
};
use common::FakeBackend;

fn prompt(name: &str) -> BatchPrompt {
    BatchPrompt {
        name: name.into(),
        prompt: format!("A picture of {name}"),
        style: None,
    }
}

// ── Still images ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn still_writes_single_image_with_description() {
    let mut backend = FakeBackend::new();
    backend.description = Some("A calm sunset".into());
    let dir = tempfile::tempdir().unwrap();
    let mut req = StillImageRequest::new("A sunset over the sea");
    req.output = dir.path().join("sunset.png");

    let out = generate_still(&backend, &req).await.unwrap();
    assert_eq!(out.images, vec![dir.path().join("sunset.png")]);
    assert_eq!(out.description.as_deref(), Some("A calm sunset"));
    assert_eq!(std::fs::read(&out.images[0]).unwrap(), backend.bytes_for(0, 0));

    let sent = &backend.requests()[0];
    assert_eq!(sent.aspect_ratio.as_str(), "1:1");
    assert_eq!(sent.num_images, 1);
    assert!(sent.reference().is_none());
}

#[tokio::test]
async fn still_numbers_multiple_images() {
    let mut backend = FakeBackend::new();
    backend.images_per_call = 3;
    let dir = tempfile::tempdir().unwrap();
    let mut req = StillImageRequest::new("Logo concepts");
    req.output = dir.path().join("logo.png");
    req.num_images = 3;

    let out = generate_still(&backend, &req).await.unwrap();
    let names: Vec<String> = out
        .images
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["logo_1.png", "logo_2.png", "logo_3.png"]);
    assert!(out.description.is_none());
    assert_eq!(backend.requests()[0].num_images, 3);
}

#[tokio::test]
async fn invalid_still_request_never_reaches_the_backend() {
    let backend = FakeBackend::new();
    let mut req = StillImageRequest::new("x");
    req.aspect_ratio = "5:3".into();

    let err = generate_still(&backend, &req).await.unwrap_err();
    assert!(matches!(err, CarouselError::InvalidConfig(_)), "got: {err:?}");
    assert!(err.to_string().contains("5:3"));

    let mut req = StillImageRequest::new("x");
    req.num_images = 5;
    assert!(generate_still(&backend, &req).await.is_err());

    assert_eq!(backend.calls(), 0);
}

// ── Batch ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn batch_continues_past_failures() {
    let backend = FakeBackend::new().fail_at(1);
    let dir = tempfile::tempdir().unwrap();
    let prompts = vec![prompt("alpha"), prompt("beta"), prompt("gamma")];

    let report = run_batch(&backend, &prompts, dir.path()).await.unwrap();
    assert_eq!(backend.calls(), 3);
    assert!(!report.is_complete());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].name, "beta");

    assert!(dir.path().join("alpha.png").is_file());
    assert!(!dir.path().join("beta.png").exists());
    assert!(dir.path().join("gamma.png").is_file());

    let m = &report.manifest;
    assert_eq!(m.newly_generated, 2);
    assert_eq!(m.skipped_images, 0);
    assert_eq!(m.total_images, 2);
    assert_eq!(m.images[0].source_url.as_deref(), Some("mem://0/0"));
    assert_eq!(m.images[0].parameters.aspect_ratio.as_str(), "3:4");
}

#[tokio::test]
async fn batch_rerun_skips_existing_and_keeps_entries() {
    let dir = tempfile::tempdir().unwrap();
    let prompts = vec![prompt("alpha"), prompt("beta")];

    let first = run_batch(&FakeBackend::new().empty_at(1), &prompts, dir.path())
        .await
        .unwrap();
    assert_eq!(first.failures.len(), 1);
    let alpha_entry = first.manifest.images[0].clone();

    let backend = FakeBackend::new();
    let second = run_batch(&backend, &prompts, dir.path()).await.unwrap();
    assert_eq!(backend.calls(), 1, "only the missing image is generated");
    assert!(second.is_complete());
    assert_eq!(second.manifest.skipped_images, 1);
    assert_eq!(second.manifest.newly_generated, 1);
    assert_eq!(second.manifest.images[0], alpha_entry);

    let on_disk = ImagesManifest::load(&dir.path().join(MANIFEST_FILE)).await.unwrap();
    assert_eq!(on_disk, second.manifest);
}

#[tokio::test]
async fn batch_marks_unknown_existing_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("alpha.png"), b"old").unwrap();

    let backend = FakeBackend::new();
    let report = run_batch(&backend, &[prompt("alpha")], dir.path()).await.unwrap();
    assert_eq!(backend.calls(), 0);
    assert_eq!(report.manifest.images[0].generated_at, PREVIOUSLY_GENERATED);
    assert_eq!(std::fs::read(dir.path().join("alpha.png")).unwrap(), b"old");
}

#[tokio::test]
async fn batch_manifest_on_disk_is_camel_case() {
    let dir = tempfile::tempdir().unwrap();
    run_batch(&FakeBackend::new(), &[prompt("alpha")], dir.path())
        .await
        .unwrap();

    let raw = std::fs::read_to_string(dir.path().join(MANIFEST_FILE)).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["totalImages"], 1);
    assert_eq!(json["newlyGenerated"], 1);
    assert_eq!(json["images"][0]["filename"], "alpha.png");
    assert!(json["images"][0]["generatedAt"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn prompts_file_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prompts.json");
    std::fs::write(
        &path,
        r#"[{"name": "hero", "prompt": "Hero image", "style": "flat"}, {"name": "icon", "prompt": "Icon"}]"#,
    )
    .unwrap();

    let prompts = load_prompts(&path).await.unwrap();
    assert_eq!(prompts.len(), 2);
    assert_eq!(prompts[0].style.as_deref(), Some("flat"));

    let missing = load_prompts(&dir.path().join("nope.json")).await.unwrap_err();
    assert!(matches!(missing, CarouselError::ContentReadFailed { .. }));
}

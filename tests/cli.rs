//! Exit codes and output of the `fal-image` and `carousel` binaries.
//!
//! No test here needs a key; credentials are removed from the child's
//! environment so nothing can reach the network.

use std::process::{Command, Output};

fn run(bin: &str, args: &[&str]) -> Output {
    Command::new(bin)
        .args(args)
        .env_remove("FAL_KEY")
        .env_remove("FALAI_KEY")
        .env_remove("RUST_LOG")
        .output()
        .expect("spawn binary")
}

fn fal_image(args: &[&str]) -> Output {
    run(env!("CARGO_BIN_EXE_fal-image"), args)
}

fn carousel(args: &[&str]) -> Output {
    run(env!("CARGO_BIN_EXE_carousel"), args)
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

// ── fal-image ────────────────────────────────────────────────────────────────

#[test]
fn fal_image_help_exits_zero() {
    let out = fal_image(&["-h"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stdout).contains("--aspect-ratio"));
}

#[test]
fn fal_image_without_prompt_exits_one() {
    let out = fal_image(&[]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("prompt is required"), "stderr: {}", stderr(&out));
}

#[test]
fn fal_image_rejects_bad_aspect_ratio_before_reading_key() {
    let out = fal_image(&["A sunset", "--aspect-ratio", "5:3"]);
    assert_eq!(out.status.code(), Some(1));
    let err = stderr(&out);
    assert!(err.contains("21:9, 16:9, 3:2"), "stderr: {err}");
    assert!(!err.contains("FAL_KEY environment variable"), "stderr: {err}");
}

#[test]
fn fal_image_rejects_image_count_out_of_range() {
    let out = fal_image(&["A sunset", "--num-images", "5"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("numImages must be between 1 and 4"));
}

#[test]
fn fal_image_without_key_exits_one() {
    let out = fal_image(&["A sunset"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("FAL_KEY environment variable is required"));
}

// ── carousel plan ────────────────────────────────────────────────────────────

#[test]
fn plan_json_matches_planned_content() {
    let out = carousel(&[
        "plan",
        "--topic",
        "  Preisfehler  ",
        "--template",
        "listicle",
        "--slides",
        "5",
        "--json",
    ]);
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));

    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["topic"], "Preisfehler");
    let slides = json["slides"].as_array().unwrap();
    assert_eq!(slides.len(), 5);
    assert_eq!(slides[0]["type"], "hook");
    assert_eq!(slides[0]["title"], "Preisfehler");
    assert_eq!(slides[4]["type"], "cta");
}

#[test]
fn plan_prints_slides_and_cost() {
    let out = carousel(&["plan", "--topic", "Pricing", "--slides", "4", "--resolution", "1K"]);
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Estimated cost: $0.60"), "stdout: {stdout}");
    assert!(stdout.contains("1. hook"), "stdout: {stdout}");
    assert!(stdout.contains("4. cta"), "stdout: {stdout}");
}

#[test]
fn plan_rejects_slide_count_outside_template_range() {
    let out = carousel(&["plan", "--topic", "Pricing", "--template", "listicle", "--slides", "3"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("Invalid configuration"));
}

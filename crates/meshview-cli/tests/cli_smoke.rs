use assert_cmd::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn repo_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("expected crates/<name> layout")
        .to_path_buf()
}

fn grid_fixture(name: &str) -> PathBuf {
    let path = repo_root().join("fixtures").join("grid").join(name);
    assert!(path.exists(), "fixture missing: {}", path.display());
    path
}

fn cli() -> Command {
    let exe = assert_cmd::cargo_bin!("meshview-cli");
    let mut cmd = Command::new(exe);
    cmd.current_dir(repo_root()).env_remove("RUST_LOG");
    cmd
}

#[test]
fn cli_renders_svg_from_input_file() {
    let fixture = grid_fixture("square.json");
    let output = cli()
        .args([
            "render",
            "--input",
            fixture.to_string_lossy().as_ref(),
            "--width",
            "500",
            "--height",
            "500",
        ])
        .output()
        .expect("run");
    assert!(output.status.success(), "{output:?}");

    let svg = String::from_utf8(output.stdout).expect("utf8");
    let doc = roxmltree::Document::parse(&svg).expect("well-formed svg");
    assert_eq!(doc.root_element().attribute("width"), Some("500"));
    let paths: Vec<_> = doc
        .descendants()
        .filter(|n| n.has_tag_name("path"))
        .collect();
    assert_eq!(paths.len(), 1);
    assert_eq!(
        paths[0].attribute("d"),
        Some("M71.429,428.571L428.571,428.571L428.571,71.429L71.429,71.429Z")
    );
}

#[test]
fn cli_renders_png_at_scale() {
    let fixture = grid_fixture("parabola.json");
    let tmp = tempfile::tempdir().expect("tempdir");
    let out = tmp.path().join("mesh.png");

    cli()
        .args([
            "render",
            "--input",
            fixture.to_string_lossy().as_ref(),
            "--neighborhoods",
            "--format",
            "png",
            "--scale",
            "2",
            "--background",
            "white",
            "--out",
            out.to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let decoder = png::Decoder::new(fs::File::open(&out).expect("open png"));
    let reader = decoder.read_info().expect("png header");
    let info = reader.info();
    assert_eq!((info.width, info.height), (1200, 1200));
}

#[test]
fn cli_reads_grid_from_stdin_into_host_canvas() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let host = tmp.path().join("page.svg");
    fs::write(
        &host,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="300" height="200"><title>mesh</title></svg>"#,
    )
    .expect("write host");

    let body = fs::read_to_string(grid_fixture("empty_mesh.json")).expect("fixture");
    let output = assert_cmd::Command::new(assert_cmd::cargo_bin!("meshview-cli"))
        .args([
            "render",
            "--input",
            "-",
            "--canvas",
            host.to_string_lossy().as_ref(),
        ])
        .write_stdin(body)
        .output()
        .expect("run");
    assert!(output.status.success(), "{output:?}");

    let svg = String::from_utf8(output.stdout).expect("utf8");
    assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="300""#));
    assert!(svg.contains(r#"<title>mesh</title><path class="mesh""#));
    assert!(svg.contains(r#"d=""/>"#));
}

#[test]
fn cli_applies_yaml_config() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let config = tmp.path().join("meshview.yaml");
    fs::write(
        &config,
        "curve: linear\nincludeLattice: true\nstyle:\n  stroke: red\ncanvas:\n  width: 140\n  height: 140\n",
    )
    .expect("write config");
    let fixture = grid_fixture("square.json");

    let output = cli()
        .args([
            "render",
            "--config",
            config.to_string_lossy().as_ref(),
            "--input",
            fixture.to_string_lossy().as_ref(),
        ])
        .output()
        .expect("run");
    assert!(output.status.success(), "{output:?}");

    let svg = String::from_utf8(output.stdout).expect("utf8");
    let doc = roxmltree::Document::parse(&svg).expect("well-formed svg");
    let mesh = doc
        .descendants()
        .find(|n| n.attribute("class") == Some("mesh"))
        .expect("mesh path");
    assert_eq!(mesh.attribute("stroke"), Some("red"));
    // Linear curve: no closing command. 140px over 14 units puts x=0 at 20.
    assert_eq!(mesh.attribute("d"), Some("M20,120L120,120L120,20L20,20"));
    assert!(
        doc.descendants()
            .any(|n| n.attribute("class") == Some("lattice"))
    );
}

#[test]
fn cli_inspect_prints_validated_grid() {
    let fixture = grid_fixture("parabola.json");
    let output = cli()
        .args(["inspect", "--input", fixture.to_string_lossy().as_ref()])
        .output()
        .expect("run");
    assert!(output.status.success(), "{output:?}");

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(value["nx"], 10);
    assert_eq!(value["mesh"]["segments"].as_array().map(Vec::len), Some(11));
    // Face data of the neighborhoods is not part of the model.
    assert!(value["u_neighborhoods"][0].get("fe").is_none());
}

#[test]
fn cli_reports_schema_mismatch() {
    let fixture = grid_fixture("missing_mesh.json");
    let output = cli()
        .args(["render", "--input", fixture.to_string_lossy().as_ref()])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Schema mismatch at `mesh`"), "{stderr}");
}

#[test]
fn cli_reports_missing_render_target() {
    let fixture = grid_fixture("square.json");
    let host = repo_root().join("fixtures").join("canvas").join("no_svg.xml");
    let output = cli()
        .args([
            "render",
            "--input",
            fixture.to_string_lossy().as_ref(),
            "--canvas",
            host.to_string_lossy().as_ref(),
        ])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("render target missing"), "{stderr}");
}

#[test]
fn cli_reports_unreachable_endpoint() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let output = cli()
        .args(["render", "--url", &format!("http://{addr}")])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("network failure"), "{stderr}");
}

#[test]
fn cli_rejects_unknown_flags() {
    cli().args(["render", "--wat"]).assert().code(2);
}

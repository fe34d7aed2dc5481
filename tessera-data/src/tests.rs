use crate::defaults::{builtin_defaults, layered_defaults, resolve};
use crate::descriptor::{dump, load, load_with_meta, meta, parse_body};
use crate::schema::RASTER_OPTIONS;
use crate::{fit_with_defaults, Document, MetaRecord, MetaType};
use toml::Value;

const HELLO_BOX: &str = r#"#meta type="archetype"
[archetype]
name = "HelloBox"
[[archetype.sprite]]
name = "body"
texture = "res/hello.png"
[archetype]
draw = ["body"]
"#;

fn write(
    dir: &tempfile::TempDir,
    name: &str,
    contents: &str,
) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn meta_reads_only_the_first_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "broken.toml", "#meta type=\"font\"\nthis is = = not toml\n");
    let meta = meta(&path).unwrap();
    assert!(meta.is_type(MetaType::Font));
    assert!(load(&path).unwrap_err().is_malformed());
}

#[test]
fn missing_meta_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "plain.toml", "[texture]\nstorage = \"keep\"\n");
    assert!(meta(&path).unwrap().is_empty());
    let document = load(&path).unwrap();
    assert_eq!(
        document["texture"]["storage"],
        Value::String("keep".to_string())
    );
}

#[test]
fn unreadable_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let error = load(&dir.path().join("nope.toml")).unwrap_err();
    assert!(error.is_not_found());
}

#[test]
fn reopened_tables_are_merged() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "HelloBox.toml", HELLO_BOX);
    let (meta, document) = load_with_meta(&path).unwrap();
    assert!(meta.is_type(MetaType::Archetype));

    let archetype = document["archetype"].as_table().unwrap();
    assert_eq!(archetype["name"].as_str(), Some("HelloBox"));
    assert_eq!(archetype["sprite"].as_array().unwrap().len(), 1);
    assert_eq!(archetype["draw"].as_array().unwrap()[0].as_str(), Some("body"));

    let keys: Vec<_> = archetype.keys().map(|x| x.as_str()).collect();
    assert_eq!(keys, vec!["name", "sprite", "draw"]);
}

#[test]
fn arrays_of_tables_append_across_sections() {
    let body = "[a]\nx = 1\n[[a.items]]\nv = 1\n[a]\ny = 2\n[[a.items]]\nv = 2\n";
    let document = parse_body(body).unwrap();
    let a = document["a"].as_table().unwrap();
    assert_eq!(a["items"].as_array().unwrap().len(), 2);
    assert_eq!(a["x"].as_integer(), Some(1));
    assert_eq!(a["y"].as_integer(), Some(2));
}

#[test]
fn sub_tables_attach_to_the_last_array_element() {
    let body = r#"[archetype]
name = "HelloBox"
[[archetype.sprite]]
name = "shadow"
[[archetype.sprite]]
name = "body"
[archetype.sprite.transformer]
rotation = 0.5
[archetype]
draw = ["body"]
"#;
    let document = parse_body(body).unwrap();
    let archetype = document["archetype"].as_table().unwrap();
    let sprites = archetype["sprite"].as_array().unwrap();
    assert_eq!(sprites.len(), 2);
    assert_eq!(sprites[0]["name"].as_str(), Some("shadow"));
    assert!(sprites[0].get("transformer").is_none());
    assert_eq!(sprites[1]["name"].as_str(), Some("body"));
    assert_eq!(sprites[1]["transformer"]["rotation"].as_float(), Some(0.5));
    assert_eq!(archetype["draw"].as_array().unwrap().len(), 1);
}

#[test]
fn nested_arrays_of_tables_attach_to_the_last_array_element() {
    let body = r#"[archetype]
name = "Level"
[[archetype.tilemap]]
name = "ground"
[[archetype.tilemap.layers]]
tileset = "res/grass.png"
[[archetype.tilemap.layers]]
tileset = "res/rocks.png"
[archetype]
draw = ["ground"]
"#;
    let document = parse_body(body).unwrap();
    let archetype = document["archetype"].as_table().unwrap();
    let tilemaps = archetype["tilemap"].as_array().unwrap();
    assert_eq!(tilemaps.len(), 1);
    assert_eq!(tilemaps[0]["name"].as_str(), Some("ground"));
    let layers = tilemaps[0]["layers"].as_array().unwrap();
    assert_eq!(layers.len(), 2);
    assert_eq!(layers[1]["tileset"].as_str(), Some("res/rocks.png"));
}

#[test]
fn non_utf8_body_is_malformed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Bad.toml");
    std::fs::write(&path, b"#meta type=\"archetype\"\n[archetype]\nname = \"B\xffd\"\n").unwrap();
    assert!(meta(&path).unwrap().is_type(MetaType::Archetype));
    assert!(load(&path).unwrap_err().is_malformed());

    std::fs::write(&path, b"#meta type=\"arche\xfftype\"\n").unwrap();
    assert!(meta(&path).unwrap_err().is_malformed());
}

#[test]
fn malformed_body_reports_an_error() {
    assert!(parse_body("[a]\nx = \n").is_err());
    assert!(parse_body("[a\n").is_err());
}

#[test]
fn round_trip_preserves_meta_and_body() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "HelloBox.toml", HELLO_BOX);
    let (original_meta, original) = load_with_meta(&path).unwrap();

    dump(&path, &original, None).unwrap();
    let first_pass = std::fs::read_to_string(&path).unwrap();
    assert!(first_pass.starts_with("#meta type=\"archetype\"\n\n"));

    let (reloaded_meta, reloaded) = load_with_meta(&path).unwrap();
    assert_eq!(reloaded_meta, original_meta);
    assert_eq!(reloaded, original);

    // A second pass without edits is a no-op on disk
    dump(&path, &reloaded, None).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), first_pass);
}

#[test]
fn dump_merges_meta_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "icon.png.toml", "#meta type=\"font\" owner=\"ui\"\n\n");
    let mut overrides = MetaRecord::with_type(MetaType::Texture);
    overrides.set("version", "2");

    dump(&path, &Document::new(), Some(&overrides)).unwrap();
    let meta = meta(&path).unwrap();
    assert_eq!(
        meta.to_line(),
        "#meta type=\"texture\" owner=\"ui\" version=\"2\""
    );
}

#[test]
fn dump_without_meta_writes_only_the_body() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("new.toml");
    let mut document = Document::new();
    document.insert("x".to_string(), Value::Integer(3));

    dump(&path, &document, None).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "x = 3\n");
    assert!(!dir.path().join("new.toml.tmp").exists());
}

#[test]
fn fit_never_overwrites() {
    let mut document = Document::new();
    document.insert("storage".to_string(), Value::String("discard".to_string()));

    let mut defaults = Document::new();
    defaults.insert("storage".to_string(), Value::String("keep".to_string()));
    defaults.insert("generate_mipmaps".to_string(), Value::Boolean(true));

    fit_with_defaults(&mut document, &defaults);
    assert_eq!(document["storage"].as_str(), Some("discard"));
    assert_eq!(document["generate_mipmaps"].as_bool(), Some(true));
}

#[test]
fn project_defaults_layer_over_builtins() {
    let project_defaults = parse_body(
        "[texture.raster]\nstorage = \"keep\"\nmin_filter = 9728\nnot_an_option = 1\n",
    )
    .unwrap();

    let layered = layered_defaults(RASTER_OPTIONS, &project_defaults, "texture.raster");
    let builtin = builtin_defaults(RASTER_OPTIONS);
    assert_eq!(layered.len(), builtin.len());
    assert_eq!(layered["storage"].as_str(), Some("keep"));
    assert_eq!(layered["min_filter"].as_integer(), Some(0x2600));
    assert_eq!(layered["wrap_t"], builtin["wrap_t"]);
    assert!(!layered.contains_key("not_an_option"));

    // Per-file values override both layers
    let mut per_file = Document::new();
    per_file.insert("storage".to_string(), Value::String("discard".to_string()));
    resolve(&mut per_file, RASTER_OPTIONS, &project_defaults, "texture.raster");
    assert_eq!(per_file["storage"].as_str(), Some("discard"));
    assert_eq!(per_file["min_filter"].as_integer(), Some(0x2600));
    assert_eq!(per_file.len(), builtin.len());
}

#[test]
fn missing_project_section_uses_builtins() {
    let layered = layered_defaults(RASTER_OPTIONS, &Document::new(), "texture.raster");
    assert_eq!(layered, builtin_defaults(RASTER_OPTIONS));
}

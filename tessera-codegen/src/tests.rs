use crate::archetype::{generate, ArchetypeDescriptor};
use crate::emitter::emit_renderable;
use crate::{ArchetypeErrorKind, CodegenTarget, Document, Indent, RenderableKind};
use std::path::Path;
use tessera_data::descriptor::{parse_body, parse_descriptor};

const HELLO_BOX: &str = r#"#meta type="archetype"
[archetype]
name = "HelloBox"
[[archetype.sprite]]
name = "body"
texture = "res/hello.png"
[archetype]
draw = ["body"]
"#;

fn parse(contents: &str) -> Document {
    parse_descriptor(contents).unwrap().1
}

fn fragment(body: &str) -> Document {
    parse_body(body).unwrap()
}

fn error_kind(body: &str) -> ArchetypeErrorKind {
    generate(
        Path::new("assets/Broken.toml"),
        &parse(body),
        "assets/Broken.toml",
        &CodegenTarget::default(),
    )
    .unwrap_err()
    .kind
}

#[test]
fn hello_box_header() {
    let generated = generate(
        Path::new("assets/HelloBox.toml"),
        &parse(HELLO_BOX),
        "assets/HelloBox.toml",
        &CodegenTarget::default(),
    )
    .unwrap();

    assert_eq!(generated.name, "HelloBox");
    assert_eq!(generated.header_file_name, "HelloBox.h");
    assert_eq!(generated.body_file_name, "HelloBox.cpp");

    let expected = "// Generated from: assets/HelloBox.toml
#pragma once

#include \"Engine.h\"

namespace eng::gen
{
\tclass HelloBox
\t{
\t\teng::Transformer2D transformer;

\tpublic:
\t\teng::Handle<eng::rendering::Sprite> body;

\t\tHelloBox();
\t\tHelloBox(const HelloBox& other);
\t\tHelloBox& operator=(const HelloBox& other);
\t\tHelloBox(HelloBox&& other) noexcept;
\t\tHelloBox& operator=(HelloBox&& other) noexcept;

\t\teng::Transform2D get_local() const { return transformer.get_local(); }
\t\teng::Transform2D& set_local() { return transformer.set_local(); }

\t\tvoid draw() const;
\t\tvoid on_tick() const;
\t};
}
";
    assert_eq!(generated.header, expected);
}

#[test]
fn hello_box_body() {
    let generated = generate(
        Path::new("assets/HelloBox.toml"),
        &parse(HELLO_BOX),
        "assets/HelloBox.toml",
        &CodegenTarget::default(),
    )
    .unwrap();

    let body = &generated.body;
    assert!(body.starts_with("// Generated from: assets/HelloBox.toml\n#include \"HelloBox.h\"\n"));

    let constructor = "\tHelloBox::HelloBox()
\t{
\t\t{
\t\t\teng::reg::params::Sprite params;
\t\t\tparams.texture = \"res/hello.png\";
\t\t\tbody = eng::reg::load_sprite(std::move(params));
\t\t}
\t\tbody->set_transformer().attach_parent(&transformer);
\t}
";
    assert!(body.contains(constructor), "{}", body);
    assert!(body.contains("\t\tbody = other.body.clone();\n"));
    assert!(body.contains("\t\tbody = std::move(other.body);\n"));
    assert!(body.contains("\tvoid HelloBox::draw() const\n\t{\n\t\tbody->draw();\n\t}\n"));
    assert_eq!(body.matches("->draw();").count(), 1);
    assert!(body.contains("\tvoid HelloBox::on_tick() const\n\t{\n\t}\n"));
}

#[test]
fn zero_renderables() {
    let document = parse("[archetype]\nname = \"Empty\"\n[archetype.transformer]\nrotation = 0.5\n");
    let generated = generate(
        Path::new("Empty.toml"),
        &document,
        "Empty.toml",
        &CodegenTarget::default(),
    )
    .unwrap();

    assert!(!generated.header.contains("eng::Handle"));
    assert!(!generated.header.contains("draw()"));
    assert!(generated.header.contains("void on_tick() const;"));

    assert!(generated
        .body
        .contains("\tEmpty::Empty()\n\t{\n\t\ttransformer.set_local().rotation = (float)0.5;\n\t}\n"));
    assert!(!generated.body.contains("draw"));
    assert!(generated.body.contains("\tvoid Empty::on_tick() const\n\t{\n\t}\n"));
}

#[test]
fn draw_calls_follow_draw_order() {
    let document = parse(
        r#"[archetype]
name = "Stack"
draw = ["c", "a", "b"]
[[archetype.sprite]]
name = "a"
[[archetype.sprite]]
name = "b"
[[archetype.ngon]]
name = "c"
"#,
    );
    let generated = generate(Path::new("Stack.toml"), &document, "Stack.toml", &CodegenTarget::default()).unwrap();

    assert!(generated
        .body
        .contains("\t\tc->draw();\n\t\ta->draw();\n\t\tb->draw();\n"));

    // Handles are declared by kind, not by draw order
    let a = generated.header.find("eng::rendering::Sprite> a;").unwrap();
    let b = generated.header.find("eng::rendering::Sprite> b;").unwrap();
    let c = generated.header.find("eng::rendering::NGon> c;").unwrap();
    assert!(a < b && b < c);
}

#[test]
fn handles_follow_category_order() {
    let document = parse(
        r#"[archetype]
name = "Everything"
[[archetype.ngon]]
name = "n"
[[archetype.sprite_nonant]]
name = "sn"
[[archetype.tilemap]]
name = "t"
[[archetype.sprite_atlas]]
name = "sa"
[[archetype.paragraph]]
name = "p"
[[archetype.sprite]]
name = "s"
"#,
    );
    let descriptor = ArchetypeDescriptor::from_document(&document).unwrap();
    let kinds: Vec<_> = descriptor.renderables.iter().map(|x| x.kind).collect();
    assert_eq!(kinds, RenderableKind::ALL.to_vec());

    let generated = generate(
        Path::new("Everything.toml"),
        &document,
        "Everything.toml",
        &CodegenTarget::default(),
    )
    .unwrap();
    let body = &generated.body;
    assert!(body.contains("\t\ts->set_transformer().attach_parent(&transformer);\n"));
    assert!(body.contains("\t\tp->set_transformer().attach_parent(&transformer);\n"));
    assert!(body.contains("\t\tsa->sprite.transformer.attach_parent(&transformer);\n"));
    assert!(body.contains("\t\tt->transformer.attach_parent(&transformer);\n"));
    assert!(body.contains("\t\tsn->set_transformer().attach_parent(&transformer);\n"));
    assert!(body.contains("\t\tn->transformer.attach_parent(&transformer);\n"));
    assert!(body.contains("\tvoid Everything::on_tick() const\n\t{\n\t\tsa->on_tick();\n\t}\n"));
}

#[test]
fn reserved_name_is_rejected() {
    let body = "[archetype]\nname = \"Box\"\n[[archetype.sprite]]\nname = \"params\"\n";
    assert_eq!(
        error_kind(body),
        ArchetypeErrorKind::ReservedRenderableName("params".to_string())
    );

    let error = generate(
        Path::new("assets/Box.toml"),
        &parse(body),
        "assets/Box.toml",
        &CodegenTarget::default(),
    )
    .unwrap_err();
    let message = error.to_string();
    assert!(message.contains("assets/Box.toml"));
    assert!(message.contains("params"));
    assert!(error.kind.is_schema_violation());
}

#[test]
fn duplicate_names_across_categories() {
    assert_eq!(
        error_kind("[archetype]\nname = \"Box\"\n[[archetype.sprite]]\nname = \"body\"\n[[archetype.sprite]]\nname = \"body\"\n"),
        ArchetypeErrorKind::DuplicateRenderableName("body".to_string())
    );
    assert_eq!(
        error_kind("[archetype]\nname = \"Box\"\n[[archetype.sprite]]\nname = \"x\"\n[[archetype.ngon]]\nname = \"x\"\n"),
        ArchetypeErrorKind::DuplicateRenderableName("x".to_string())
    );
}

#[test]
fn naming_violations() {
    assert_eq!(
        error_kind("[archetype]\nname = \"9Box\"\n"),
        ArchetypeErrorKind::InvalidArchetypeName("9Box".to_string())
    );
    assert_eq!(
        error_kind("[archetype]\nname = \"Box\"\n[[archetype.sprite]]\nname = \"left arm\"\n"),
        ArchetypeErrorKind::InvalidRenderableName("left arm".to_string())
    );
    assert_eq!(
        error_kind("[archetype]\nname = \"Box\"\ndraw = [\"ghost\"]\n"),
        ArchetypeErrorKind::UnknownDrawReference("ghost".to_string())
    );
}

#[test]
fn structural_errors() {
    assert_eq!(error_kind("[texture]\nstorage = \"keep\"\n"), ArchetypeErrorKind::MissingArchetype);
    assert_eq!(error_kind("[archetype]\ndraw = []\n"), ArchetypeErrorKind::MissingArchetype);
    assert!(matches!(
        error_kind("[archetype]\nname = \"Box\"\n[[archetype.sprite]]\ntexture = \"a.png\"\n"),
        ArchetypeErrorKind::MalformedRenderable { index: 0, .. }
    ));
    assert_eq!(
        error_kind("[archetype]\nname = \"Box\"\n[[archetype.sprite]]\nname = \"s\"\ntexture = 3\n"),
        ArchetypeErrorKind::InvalidAttribute {
            renderable: "s".to_string(),
            attribute: "texture".to_string(),
            message: "expected a string, found integer".to_string(),
        }
    );
}

#[test]
fn ngon_emission_order() {
    let ngon = fragment(
        r#"name = "hex"
points = [[0, 0], [1, 0], [1, 1]]
border_pivot = "outer"
bordered = true
[transformer]
position = [2, 3]
"#,
    );

    let expected = "{
\teng::reg::params::NGon params;
\tparams.local.position = { (float)2, (float)3 };
\tparams.bordered = true;
\tparams.points.reserve(3);
\tparams.points.push_back({ (float)0, (float)0 });
\tparams.points.push_back({ (float)1, (float)0 });
\tparams.points.push_back({ (float)1, (float)1 });
\tparams.border_pivot = eng::rendering::BorderPivot::OUTER;
\thex = eng::reg::load_ngon(std::move(params));
}
";
    assert_eq!(emit_renderable(RenderableKind::NGon, &ngon, "hex", Indent(0)).unwrap(), expected);
}

#[test]
fn tilemap_layers() {
    let tilemap = fragment(
        r#"name = "ground"
[[layers]]
tileset = "res/tiles.png"
tiles = [[0, 1], [2, -1]]
"#,
    );

    let expected = "{
\teng::reg::params::TileMap params;
\tparams.layers.reserve(1);
\t{
\t\teng::reg::params::TileMap::Layer layer;
\t\tlayer.tileset = \"res/tiles.png\";
\t\tlayer.tiles.reserve(2);
\t\tlayer.tiles.push_back({ 0, 1 });
\t\tlayer.tiles.push_back({ 2, -1 });
\t\tparams.layers.push_back(std::move(layer));
\t}
\tground = eng::reg::load_tilemap(std::move(params));
}
";
    assert_eq!(
        emit_renderable(RenderableKind::Tilemap, &tilemap, "ground", Indent(0)).unwrap(),
        expected
    );
}

#[test]
fn nested_records_follow_primary_attributes() {
    let sprite = fragment(
        r#"name = "s"
frame_format = { mode = "auto", num_frames = 4 }
texture = "a.png"
unknown_key = 1
"#,
    );

    let expected = "{
\teng::reg::params::Sprite params;
\tparams.texture = \"a.png\";
\tparams.frame_format.mode = eng::graphics::AnimFrameFormat::Mode::AUTO;
\tparams.frame_format.num_frames = 4u;
\ts = eng::reg::load_sprite(std::move(params));
}
";
    assert_eq!(emit_renderable(RenderableKind::Sprite, &sprite, "s", Indent(0)).unwrap(), expected);

    let bad = fragment("name = \"s\"\nframe_format = { mode = \"sometimes\" }\n");
    let error = emit_renderable(RenderableKind::Sprite, &bad, "s", Indent(0)).unwrap_err();
    assert_eq!(error.attribute, "frame_format.mode");
}

#[test]
fn paragraph_text_is_escaped() {
    let paragraph = fragment(
        "name = \"label\"\ntext = \"one\\ttwo\\nthree\"\nhorizontal_alignment = \"center\"\n",
    );
    let text = emit_renderable(RenderableKind::Paragraph, &paragraph, "label", Indent(1)).unwrap();
    assert!(text.contains("\t\tparams.text = \"one\\ttwo\\nthree\";\n"));
    assert!(text.contains(
        "\t\tparams.horizontal_alignment = eng::rendering::Paragraph::HorizontalAlignment::CENTER;\n"
    ));
    assert!(text.starts_with("\t{\n"));
    assert!(text.ends_with("\t}\n"));
}

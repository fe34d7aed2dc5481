use super::{AttributeDef, AttributeHook, FragmentSchema};
use crate::literals::{BORDER_PIVOT, FRAME_FORMAT_MODE, HORIZONTAL_ALIGNMENT, VERTICAL_ALIGNMENT};

const fn attr(
    name: &'static str,
    hook: AttributeHook,
) -> AttributeDef {
    AttributeDef { name, hook }
}

pub static TRANSFORMER_SCHEMA: FragmentSchema = FragmentSchema {
    transformer_member: None,
    variant: None,
    attributes: &[
        attr("position", AttributeHook::Pair),
        attr("rotation", AttributeHook::Real),
        attr("scale", AttributeHook::Pair),
        attr("shearing", AttributeHook::Pair),
    ],
};

pub static FRAME_FORMAT_SCHEMA: FragmentSchema = FragmentSchema {
    transformer_member: None,
    variant: None,
    attributes: &[
        attr("mode", AttributeHook::Enum(&FRAME_FORMAT_MODE)),
        attr("starting_frame", AttributeHook::UInt),
        attr("num_frames", AttributeHook::UInt),
        attr("starting_time", AttributeHook::Real),
        attr("delay_seconds", AttributeHook::Real),
    ],
};

pub static TEX_COORDS_SCHEMA: FragmentSchema = FragmentSchema {
    transformer_member: None,
    variant: None,
    attributes: &[
        attr("x1", AttributeHook::Real),
        attr("x2", AttributeHook::Real),
        attr("y1", AttributeHook::Real),
        attr("y2", AttributeHook::Real),
    ],
};

pub static NONANT_OFFSETS_SCHEMA: FragmentSchema = FragmentSchema {
    transformer_member: None,
    variant: None,
    attributes: &[
        attr("x_left", AttributeHook::Real),
        attr("x_right", AttributeHook::Real),
        attr("y_bottom", AttributeHook::Real),
        attr("y_top", AttributeHook::Real),
    ],
};

pub static TILEMAP_LAYER_SCHEMA: FragmentSchema = FragmentSchema {
    transformer_member: None,
    variant: None,
    attributes: &[
        attr("tileset", AttributeHook::Str),
        attr("tiles", AttributeHook::IntPairs),
    ],
};

pub static SPRITE_SCHEMA: FragmentSchema = FragmentSchema {
    transformer_member: Some("local"),
    variant: None,
    attributes: &[
        attr("texture", AttributeHook::Str),
        attr("svg_scale", AttributeHook::Real),
        attr("texture_index", AttributeHook::UInt),
        attr("modulation", AttributeHook::Quad),
        attr("tex_coords", AttributeHook::Record(&TEX_COORDS_SCHEMA)),
        attr("frame_format", AttributeHook::Record(&FRAME_FORMAT_SCHEMA)),
    ],
};

pub static PARAGRAPH_SCHEMA: FragmentSchema = FragmentSchema {
    transformer_member: Some("local"),
    variant: None,
    attributes: &[
        attr("font_atlas", AttributeHook::Str),
        attr("text", AttributeHook::Str),
        attr("draw_bkg", AttributeHook::Bool),
        attr("bkg_color", AttributeHook::Quad),
        attr("text_color", AttributeHook::Quad),
        attr("line_spacing", AttributeHook::Real),
        attr("linebreak_spacing", AttributeHook::Real),
        attr("horizontal_alignment", AttributeHook::Enum(&HORIZONTAL_ALIGNMENT)),
        attr("vertical_alignment", AttributeHook::Enum(&VERTICAL_ALIGNMENT)),
        attr("min_size", AttributeHook::Pair),
        attr("padding", AttributeHook::Pair),
    ],
};

pub static SPRITE_ATLAS_SCHEMA: FragmentSchema = FragmentSchema {
    transformer_member: Some("local"),
    variant: None,
    attributes: &[
        attr("texture", AttributeHook::Str),
        attr("svg_scale", AttributeHook::Real),
        attr("texture_index", AttributeHook::UInt),
        attr("modulation", AttributeHook::Quad),
        attr("rows", AttributeHook::UInt),
        attr("cols", AttributeHook::UInt),
        attr("delay_seconds", AttributeHook::Real),
        attr("row_major", AttributeHook::Bool),
        attr("row_up", AttributeHook::Bool),
        attr("starting_frame", AttributeHook::UInt),
        attr("starting_time", AttributeHook::Real),
        attr("static_frame", AttributeHook::UInt),
    ],
};

pub static TILEMAP_SCHEMA: FragmentSchema = FragmentSchema {
    transformer_member: Some("local"),
    variant: None,
    attributes: &[attr(
        "layers",
        AttributeHook::Records {
            element_type: "eng::reg::params::TileMap::Layer",
            element_var: "layer",
            schema: &TILEMAP_LAYER_SCHEMA,
        },
    )],
};

pub static SPRITE_NONANT_SCHEMA: FragmentSchema = FragmentSchema {
    transformer_member: Some("local"),
    variant: None,
    attributes: &[
        attr("texture", AttributeHook::Str),
        attr("svg_scale", AttributeHook::Real),
        attr("texture_index", AttributeHook::UInt),
        attr("modulation", AttributeHook::Quad),
        attr("nsize", AttributeHook::Pair),
        attr("tex_coords", AttributeHook::Record(&TEX_COORDS_SCHEMA)),
        attr("frame_format", AttributeHook::Record(&FRAME_FORMAT_SCHEMA)),
        attr("offsets", AttributeHook::Record(&NONANT_OFFSETS_SCHEMA)),
    ],
};

pub static NGON_SCHEMA: FragmentSchema = FragmentSchema {
    transformer_member: Some("local"),
    variant: Some(attr("bordered", AttributeHook::Bool)),
    attributes: &[
        attr("points", AttributeHook::Pairs),
        attr("fill_colors", AttributeHook::Quads),
        attr("border_colors", AttributeHook::Quads),
        attr("border_width", AttributeHook::Real),
        attr("border_pivot", AttributeHook::RealOrEnum(&BORDER_PIVOT)),
    ],
};

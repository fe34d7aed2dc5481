use crate::emitter::{self, FragmentSchema};

/// Kinds of drawable sub-objects an archetype can hold. Declaration order is the order handles
/// appear in generated headers.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderableKind {
    Sprite,
    Paragraph,
    SpriteAtlas,
    Tilemap,
    SpriteNonant,
    NGon,
}

impl RenderableKind {
    pub const ALL: [RenderableKind; 6] = [
        RenderableKind::Sprite,
        RenderableKind::Paragraph,
        RenderableKind::SpriteAtlas,
        RenderableKind::Tilemap,
        RenderableKind::SpriteNonant,
        RenderableKind::NGon,
    ];

    /// Key of the array of tables holding this kind in an archetype descriptor
    pub fn key(&self) -> &'static str {
        match self {
            RenderableKind::Sprite => "sprite",
            RenderableKind::Paragraph => "paragraph",
            RenderableKind::SpriteAtlas => "sprite_atlas",
            RenderableKind::Tilemap => "tilemap",
            RenderableKind::SpriteNonant => "sprite_nonant",
            RenderableKind::NGon => "ngon",
        }
    }

    pub fn from_key(key: &str) -> Option<RenderableKind> {
        RenderableKind::ALL.iter().copied().find(|x| x.key() == key)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            RenderableKind::Sprite => "Sprite",
            RenderableKind::Paragraph => "Paragraph",
            RenderableKind::SpriteAtlas => "SpriteAtlas",
            RenderableKind::Tilemap => "TileMap",
            RenderableKind::SpriteNonant => "SpriteNonant",
            RenderableKind::NGon => "NGon",
        }
    }

    pub fn handle_type(&self) -> String {
        format!("eng::Handle<eng::rendering::{}>", self.type_name())
    }

    pub fn loader(&self) -> &'static str {
        match self {
            RenderableKind::Sprite => "load_sprite",
            RenderableKind::Paragraph => "load_paragraph",
            RenderableKind::SpriteAtlas => "load_sprite_atlas",
            RenderableKind::Tilemap => "load_tilemap",
            RenderableKind::SpriteNonant => "load_sprite_nonant",
            RenderableKind::NGon => "load_ngon",
        }
    }

    pub fn schema(&self) -> &'static FragmentSchema {
        match self {
            RenderableKind::Sprite => &emitter::SPRITE_SCHEMA,
            RenderableKind::Paragraph => &emitter::PARAGRAPH_SCHEMA,
            RenderableKind::SpriteAtlas => &emitter::SPRITE_ATLAS_SCHEMA,
            RenderableKind::Tilemap => &emitter::TILEMAP_SCHEMA,
            RenderableKind::SpriteNonant => &emitter::SPRITE_NONANT_SCHEMA,
            RenderableKind::NGon => &emitter::NGON_SCHEMA,
        }
    }

    /// Expression for the transformer of a handle named `name` that gets attached to the
    /// archetype's transformer
    pub fn attachment(
        &self,
        name: &str,
    ) -> String {
        match self {
            RenderableKind::Sprite | RenderableKind::Paragraph | RenderableKind::SpriteNonant => {
                format!("{}->set_transformer()", name)
            }
            RenderableKind::SpriteAtlas => format!("{}->sprite.transformer", name),
            RenderableKind::Tilemap | RenderableKind::NGon => format!("{}->transformer", name),
        }
    }

    /// Whether the archetype's `on_tick` forwards to this kind
    pub fn ticks(&self) -> bool {
        *self == RenderableKind::SpriteAtlas
    }
}

impl std::fmt::Display for RenderableKind {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

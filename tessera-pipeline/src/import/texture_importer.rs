use super::{ImportContext, Importer};
use tessera_data::defaults::{layered_defaults, resolve};
use tessera_data::schema::{check_registered_values, SPRITESHEET_KEY, SPRITESHEET_OPTIONS, SPRITESHEET_SECTION};
use tessera_data::{Document, MetaType};
use toml::Value;

pub const TEXTURE_BODY_KEY: &str = "texture";

/// Side-cars for raster, vector and animated images. The option set is chosen by the asset's
/// extension. A `spritesheet` subrecord is kept and fitted when present but never created.
#[derive(Default)]
pub struct TextureImporter;

impl Importer for TextureImporter {
    fn importer_name(&self) -> &'static str {
        "textures"
    }

    fn supported_file_extensions(&self) -> &[&'static str] {
        &["png", "jpg", "jpeg", "bmp", "tga", "svg", "gif"]
    }

    fn meta_type(&self) -> MetaType {
        MetaType::Texture
    }

    fn body_key(&self) -> &'static str {
        TEXTURE_BODY_KEY
    }

    fn default_body(
        &self,
        context: &ImportContext,
    ) -> Document {
        let kind = context.import_kind;
        layered_defaults(kind.options(), context.project_defaults, kind.defaults_section())
    }

    fn refresh_body(
        &self,
        context: &ImportContext,
        body: &mut Document,
    ) {
        let kind = context.import_kind;
        resolve(body, kind.options(), context.project_defaults, kind.defaults_section());

        if let Some(Value::Table(spritesheet)) = body.get_mut(SPRITESHEET_KEY) {
            resolve(
                spritesheet,
                SPRITESHEET_OPTIONS,
                context.project_defaults,
                SPRITESHEET_SECTION,
            );
        }
    }

    fn check_body(
        &self,
        context: &ImportContext,
        body: &Document,
    ) -> Vec<String> {
        let mut problems = check_registered_values(body, context.import_kind.options());

        match body.get(SPRITESHEET_KEY) {
            None | Some(Value::Table(_)) => {}
            Some(other) => problems.push(format!(
                "{} should be a table, found {}",
                SPRITESHEET_KEY,
                other.type_str()
            )),
        }

        problems
    }
}

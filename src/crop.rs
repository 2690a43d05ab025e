use eframe::egui::{self, Vec2};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Stored avatar crop, in editing-viewport units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropMetadata {
    pub scale: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Default for CropMetadata {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl CropMetadata {
    pub fn new(scale: f32, offset: Vec2) -> Self {
        Self {
            scale,
            offset_x: offset.x,
            offset_y: offset.y,
        }
    }

    pub fn offset(&self) -> Vec2 {
        egui::vec2(self.offset_x, self.offset_y)
    }

    pub fn is_uncropped(&self) -> bool {
        self.scale <= 1.0 && self.offset_x == 0.0 && self.offset_y == 0.0
    }

    fn is_finite(&self) -> bool {
        self.scale.is_finite() && self.offset_x.is_finite() && self.offset_y.is_finite()
    }
}

/// Stored vertical pan of the cover strip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverOffset {
    pub offset_y: f32,
}

/// Reads crop metadata that may arrive as an object or as a JSON-encoded
/// string. Anything malformed yields `None`; callers fall back to a
/// cover-fit render.
pub fn parse_crop(raw: &Value) -> Option<CropMetadata> {
    let crop = match raw {
        Value::Object(_) => serde_json::from_value::<CropMetadata>(raw.clone()).ok(),
        Value::String(encoded) => match serde_json::from_str::<Value>(encoded) {
            Ok(inner @ Value::Object(_)) => serde_json::from_value::<CropMetadata>(inner).ok(),
            Ok(_) => None,
            Err(err) => {
                log::debug!("ignoring unparsable profile crop: {err}");
                None
            }
        },
        _ => None,
    }?;
    crop.is_finite().then_some(crop)
}

fn lenient_crop<'de, D>(deserializer: D) -> Result<Option<CropMetadata>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(parse_crop))
}

/// The body handed to the persistence gateway on save.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileImagePayload {
    pub avatar: Option<String>,
    pub cover_image: Option<String>,
    #[serde(default)]
    pub cover_offset: f32,
    #[serde(
        default,
        deserialize_with = "lenient_crop",
        skip_serializing_if = "Option::is_none"
    )]
    pub profile_crop: Option<CropMetadata>,
}

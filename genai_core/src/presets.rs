use serde::Serialize;

use crate::error::GenAiError;
use crate::types::AspectRatio;

/// Target platform for a generated thumbnail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocialPreset {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub ratio: AspectRatio,
    pub description: &'static str,
}

pub static PRESETS: &[SocialPreset] = &[
    SocialPreset {
        id: "youtube",
        name: "YouTube Thumbnail",
        icon: "youtube",
        ratio: AspectRatio::Wide,
        description: "16:9 • High Impact",
    },
    SocialPreset {
        id: "instagram",
        name: "Instagram Post",
        icon: "instagram",
        ratio: AspectRatio::Square,
        description: "1:1 • Square Feed",
    },
    SocialPreset {
        id: "tiktok",
        name: "TikTok / Story",
        icon: "tiktok",
        ratio: AspectRatio::Tall,
        description: "9:16 • Full Screen",
    },
    SocialPreset {
        id: "linkedin",
        name: "LinkedIn / Post",
        icon: "linkedin",
        ratio: AspectRatio::Landscape,
        description: "4:3 • Professional",
    },
];

pub fn all() -> &'static [SocialPreset] {
    PRESETS
}

/// Find a preset by id or display name (case-insensitive).
pub fn find(key: &str) -> Option<&'static SocialPreset> {
    let key = key.trim();
    PRESETS
        .iter()
        .find(|p| p.id.eq_ignore_ascii_case(key) || p.name.eq_ignore_ascii_case(key))
}

pub fn resolve(key: &str) -> Result<&'static SocialPreset, GenAiError> {
    find(key).ok_or_else(|| GenAiError::InvalidInput(format!("Unknown thumbnail preset '{key}'")))
}

impl SocialPreset {
    /// Wrap the user's description in platform-specific art direction. With a
    /// reference image the model is asked to restyle it rather than start over.
    pub fn compose_prompt(&self, prompt: &str, editing: bool) -> String {
        if editing {
            format!(
                "Edit this image to create a {} thumbnail. {}. Keep the main subject but enhance the style for social media.",
                self.name, prompt
            )
        } else {
            format!(
                "High quality social media thumbnail for {}. {}. Make it engaging, high contrast, catchy.",
                self.name, prompt
            )
        }
    }
}

//! Built-in voice personas.
//!
//! Each persona pairs one of the prebuilt synthesis voices with a style
//! instruction that is woven into the speech prompt.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::GenAiError;

/// Prebuilt voices accepted by the speech endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoiceName {
    /// Male, energetic
    Puck,
    /// Male, deep
    Charon,
    /// Female, calm
    Kore,
    /// Male, intense
    Fenrir,
    /// Female, soft
    Zephyr,
}

impl VoiceName {
    pub const ALL: [VoiceName; 5] = [
        VoiceName::Puck,
        VoiceName::Charon,
        VoiceName::Kore,
        VoiceName::Fenrir,
        VoiceName::Zephyr,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceName::Puck => "Puck",
            VoiceName::Charon => "Charon",
            VoiceName::Kore => "Kore",
            VoiceName::Fenrir => "Fenrir",
            VoiceName::Zephyr => "Zephyr",
        }
    }
}

impl fmt::Display for VoiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoiceName {
    type Err = GenAiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VoiceName::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GenAiError::InvalidInput(format!("Unknown voice '{s}'")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum VoiceCategory {
    Social,
    Professional,
    Narrative,
    Child,
    Teen,
    Adult,
    Character,
    Elder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoiceProfile {
    pub id: &'static str,
    pub voice: VoiceName,
    pub label: &'static str,
    pub description: &'static str,
    pub category: VoiceCategory,
    pub gender: Gender,
    pub instruction: Option<&'static str>,
}

pub const DEFAULT_VOICE_ID: &str = "social_hype";

pub static VOICES: &[VoiceProfile] = &[
    VoiceProfile {
        id: "social_hype",
        voice: VoiceName::Puck,
        label: "Kyle",
        description: "Hype YouTuber",
        category: VoiceCategory::Social,
        gender: Gender::Male,
        instruction: Some("Speak with high energy, fast pace, and excitement like a famous YouTuber intro"),
    },
    VoiceProfile {
        id: "social_vlog",
        voice: VoiceName::Zephyr,
        label: "Chloe",
        description: "Lifestyle Vlog",
        category: VoiceCategory::Social,
        gender: Gender::Female,
        instruction: Some("Speak with a trendy, casual, and friendly influencer voice"),
    },
    VoiceProfile {
        id: "social_asmr",
        voice: VoiceName::Kore,
        label: "Luna",
        description: "ASMR Whisper",
        category: VoiceCategory::Social,
        gender: Gender::Female,
        instruction: Some("Speak in a very soft, whispering, slow, and tingling ASMR style voice"),
    },
    VoiceProfile {
        id: "social_podcast",
        voice: VoiceName::Fenrir,
        label: "Marcus",
        description: "Podcast Host",
        category: VoiceCategory::Social,
        gender: Gender::Male,
        instruction: Some("Speak with a conversational, inquisitive, and engaging podcast host voice"),
    },
    VoiceProfile {
        id: "pro_news_f",
        voice: VoiceName::Kore,
        label: "Elena",
        description: "News Anchor",
        category: VoiceCategory::Professional,
        gender: Gender::Female,
        instruction: Some("Speak with a formal, articulate, and authoritative news anchor voice"),
    },
    VoiceProfile {
        id: "pro_news_m",
        voice: VoiceName::Charon,
        label: "James",
        description: "News Anchor",
        category: VoiceCategory::Professional,
        gender: Gender::Male,
        instruction: Some("Speak with a serious, deep, and trustworthy news anchor voice"),
    },
    VoiceProfile {
        id: "pro_corp",
        voice: VoiceName::Zephyr,
        label: "Sophia",
        description: "Corporate Presenter",
        category: VoiceCategory::Professional,
        gender: Gender::Female,
        instruction: Some("Speak with a clear, professional, and confident corporate presentation voice"),
    },
    VoiceProfile {
        id: "pro_sales",
        voice: VoiceName::Puck,
        label: "David",
        description: "Sales & Promo",
        category: VoiceCategory::Professional,
        gender: Gender::Male,
        instruction: Some("Speak with a persuasive, punchy, and upbeat commercial voice"),
    },
    VoiceProfile {
        id: "nar_fern",
        voice: VoiceName::Charon,
        label: "Fern",
        description: "Video Essayist",
        category: VoiceCategory::Narrative,
        gender: Gender::Male,
        instruction: Some("Speak with a calm, intellectual, deep, and well-paced video essay narration voice"),
    },
    VoiceProfile {
        id: "nar_epic",
        voice: VoiceName::Charon,
        label: "The Voice",
        description: "Movie Trailer",
        category: VoiceCategory::Narrative,
        gender: Gender::Male,
        instruction: Some("Speak with an extremely deep, gravelly, epic movie trailer voice"),
    },
    VoiceProfile {
        id: "nar_docu",
        voice: VoiceName::Fenrir,
        label: "Attenborough-ish",
        description: "Nature Documentary",
        category: VoiceCategory::Narrative,
        gender: Gender::Male,
        instruction: Some("Speak with a breathy, observant, and wondrous nature documentary narrator voice"),
    },
    VoiceProfile {
        id: "nar_fantasy",
        voice: VoiceName::Zephyr,
        label: "Elara",
        description: "Fantasy Narrator",
        category: VoiceCategory::Narrative,
        gender: Gender::Female,
        instruction: Some("Speak with a mystical, ethereal, and storytelling fantasy voice"),
    },
    VoiceProfile {
        id: "nar_audiobook",
        voice: VoiceName::Charon,
        label: "Sebastian",
        description: "Classic Audiobook",
        category: VoiceCategory::Narrative,
        gender: Gender::Male,
        instruction: Some("Speak with a soothing, well-paced, and warm audiobook narrator voice"),
    },
    VoiceProfile {
        id: "boy_child",
        voice: VoiceName::Puck,
        label: "Leo",
        description: "Little Boy (8y)",
        category: VoiceCategory::Child,
        gender: Gender::Male,
        instruction: Some("Speak with a high-pitched, enthusiastic voice like a young boy"),
    },
    VoiceProfile {
        id: "girl_child",
        voice: VoiceName::Zephyr,
        label: "Mia",
        description: "Little Girl (6y)",
        category: VoiceCategory::Child,
        gender: Gender::Female,
        instruction: Some("Speak with a sweet, high-pitched voice like a little girl"),
    },
    VoiceProfile {
        id: "teen_boy",
        voice: VoiceName::Puck,
        label: "Jax",
        description: "Teenager (16y)",
        category: VoiceCategory::Teen,
        gender: Gender::Male,
        instruction: Some("Speak with a cool, casual, slightly cracking voice like a teenage boy"),
    },
    VoiceProfile {
        id: "teen_girl",
        voice: VoiceName::Kore,
        label: "Zoe",
        description: "Teenager (17y)",
        category: VoiceCategory::Teen,
        gender: Gender::Female,
        instruction: Some("Speak with a bright, energetic, fast-paced voice like a teenage girl"),
    },
    VoiceProfile {
        id: "adult_man_energetic",
        voice: VoiceName::Puck,
        label: "Puck",
        description: "Friendly Male",
        category: VoiceCategory::Adult,
        gender: Gender::Male,
        instruction: Some("Speak with an energetic, standard adult male voice"),
    },
    VoiceProfile {
        id: "adult_woman_soft",
        voice: VoiceName::Zephyr,
        label: "Zephyr",
        description: "Gentle Female",
        category: VoiceCategory::Adult,
        gender: Gender::Female,
        instruction: Some("Speak with a soft, gentle adult female voice"),
    },
    VoiceProfile {
        id: "adult_man_intense",
        voice: VoiceName::Fenrir,
        label: "Fenrir",
        description: "Confident Male",
        category: VoiceCategory::Adult,
        gender: Gender::Male,
        instruction: Some("Speak with an intense, strong adult male voice"),
    },
    VoiceProfile {
        id: "adult_woman_calm",
        voice: VoiceName::Kore,
        label: "Kore",
        description: "Calm Female",
        category: VoiceCategory::Adult,
        gender: Gender::Female,
        instruction: Some("Speak with a calm, motherly adult female voice"),
    },
    VoiceProfile {
        id: "char_villain",
        voice: VoiceName::Fenrir,
        label: "Vaderis",
        description: "The Villain",
        category: VoiceCategory::Character,
        gender: Gender::Male,
        instruction: Some("Speak with a sinister, slow, and menacing villain voice"),
    },
    VoiceProfile {
        id: "char_robot",
        voice: VoiceName::Puck,
        label: "Unit-734",
        description: "Robot / AI",
        category: VoiceCategory::Character,
        gender: Gender::Male,
        instruction: Some("Speak with a flat, monotone, staccato robotic voice"),
    },
    VoiceProfile {
        id: "char_meditation",
        voice: VoiceName::Kore,
        label: "Serenity",
        description: "Meditation Guide",
        category: VoiceCategory::Character,
        gender: Gender::Female,
        instruction: Some("Speak with a very slow, breathing, and hypnotic meditation guide voice"),
    },
    VoiceProfile {
        id: "old_man",
        voice: VoiceName::Charon,
        label: "Arthur",
        description: "Elderly Man (80y)",
        category: VoiceCategory::Elder,
        gender: Gender::Male,
        instruction: Some("Speak with a raspy, slow, aged voice like an 80 year old man"),
    },
    VoiceProfile {
        id: "old_woman",
        voice: VoiceName::Kore,
        label: "Martha",
        description: "Elderly Woman (75y)",
        category: VoiceCategory::Elder,
        gender: Gender::Female,
        instruction: Some("Speak with a shaky, wise, grandmotherly voice"),
    },
    VoiceProfile {
        id: "wizard",
        voice: VoiceName::Fenrir,
        label: "The Ancient",
        description: "Wizard / Mystic",
        category: VoiceCategory::Elder,
        gender: Gender::Male,
        instruction: Some("Speak with a creaky, ancient, mystical voice like a 100 year old wizard"),
    },
];

pub fn all() -> &'static [VoiceProfile] {
    VOICES
}

pub fn find(id: &str) -> Option<&'static VoiceProfile> {
    VOICES.iter().find(|v| v.id == id)
}

/// Look up a persona, falling back to [`DEFAULT_VOICE_ID`] when `id` is `None`.
pub fn resolve(id: Option<&str>) -> Result<&'static VoiceProfile, GenAiError> {
    let id = id.map(str::trim).filter(|id| !id.is_empty()).unwrap_or(DEFAULT_VOICE_ID);
    find(id).ok_or_else(|| GenAiError::InvalidInput(format!("Unknown voice profile '{id}'")))
}

pub fn by_category(category: VoiceCategory) -> impl Iterator<Item = &'static VoiceProfile> {
    VOICES.iter().filter(move |v| v.category == category)
}

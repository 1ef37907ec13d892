//! Slide Plan Builder: expand a carousel request into ordered slide specs.
//!
//! Every template produces the same skeleton: a hook at position 0, a brand
//! CTA at the last position, and a template-specific pattern in between.
//! Slide content is a sum type ([`SlideContent`]) so that each slide type
//! carries exactly the fields its layout uses.

use crate::config::{BrandProfile, ColorMode, TemplateKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Background colour of a single slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideColor {
    Dark,
    Light,
}

impl ColorMode {
    /// Resolve the colour of slide `index` in a carousel of `total` slides.
    ///
    /// `Mixed` alternates by parity, except that the first and last slide are
    /// always dark.
    pub fn resolve(self, index: usize, total: usize) -> SlideColor {
        match self {
            ColorMode::Dark => SlideColor::Dark,
            ColorMode::Light => SlideColor::Light,
            ColorMode::Mixed => {
                if index == 0 || index + 1 == total || index % 2 == 0 {
                    SlideColor::Dark
                } else {
                    SlideColor::Light
                }
            }
        }
    }
}

/// The closed set of slide archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlideType {
    Hook,
    Content,
    ListicleItem,
    FrameworkStep,
    Cta,
    Quote,
    Stat,
    Question,
    Tip,
    MythBuster,
    Comparison,
    Split,
    Highlight,
    Chapter,
    ImageLeft,
    ImageRight,
    ImageTop,
    PhoneMockup,
}

impl SlideType {
    /// Kebab-case name, used in filenames and prompts.
    pub fn as_str(self) -> &'static str {
        match self {
            SlideType::Hook => "hook",
            SlideType::Content => "content",
            SlideType::ListicleItem => "listicle-item",
            SlideType::FrameworkStep => "framework-step",
            SlideType::Cta => "cta",
            SlideType::Quote => "quote",
            SlideType::Stat => "stat",
            SlideType::Question => "question",
            SlideType::Tip => "tip",
            SlideType::MythBuster => "myth-buster",
            SlideType::Comparison => "comparison",
            SlideType::Split => "split",
            SlideType::Highlight => "highlight",
            SlideType::Chapter => "chapter",
            SlideType::ImageLeft => "image-left",
            SlideType::ImageRight => "image-right",
            SlideType::ImageTop => "image-top",
            SlideType::PhoneMockup => "phone-mockup",
        }
    }
}

impl fmt::Display for SlideType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-type slide payload.
///
/// Serialised with an inline `"type"` tag so a `content.json` entry reads
/// `{"index": 1, "type": "listicle-item", "title": "Punkt 1", ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SlideContent {
    Hook {
        title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subtitle: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        body: Option<String>,
    },
    Content {
        title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        number: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        body: Option<String>,
    },
    ListicleItem {
        title: String,
        number: u32,
        /// Zero-padded number shown huge on the slide, e.g. `"03"`.
        accent: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        body: Option<String>,
    },
    FrameworkStep {
        title: String,
        number: u32,
        /// Progress label, e.g. `"2/5"`.
        step_label: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        phase: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        body: Option<String>,
    },
    Cta {
        name: String,
        tagline: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        handle: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        body: Option<String>,
    },
    Quote {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        author: Option<String>,
    },
    Stat {
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        body: Option<String>,
    },
    Question {
        question: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        body: Option<String>,
    },
    Tip {
        title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        body: Option<String>,
    },
    MythBuster {
        myth: String,
        truth: String,
    },
    Comparison {
        left_label: String,
        left: String,
        right_label: String,
        right: String,
    },
    Split {
        title: String,
        left_label: String,
        left: String,
        right_label: String,
        right: String,
    },
    Highlight {
        title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        body: Option<String>,
    },
    Chapter {
        number: u32,
        title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subtitle: Option<String>,
    },
    ImageLeft(ImagePanel),
    ImageRight(ImagePanel),
    ImageTop(ImagePanel),
    PhoneMockup(ImagePanel),
}

/// Text next to an image area (image-left/right/top, phone mockup).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePanel {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// What the image area should depict.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_alt: Option<String>,
}

impl SlideContent {
    pub fn slide_type(&self) -> SlideType {
        match self {
            SlideContent::Hook { .. } => SlideType::Hook,
            SlideContent::Content { .. } => SlideType::Content,
            SlideContent::ListicleItem { .. } => SlideType::ListicleItem,
            SlideContent::FrameworkStep { .. } => SlideType::FrameworkStep,
            SlideContent::Cta { .. } => SlideType::Cta,
            SlideContent::Quote { .. } => SlideType::Quote,
            SlideContent::Stat { .. } => SlideType::Stat,
            SlideContent::Question { .. } => SlideType::Question,
            SlideContent::Tip { .. } => SlideType::Tip,
            SlideContent::MythBuster { .. } => SlideType::MythBuster,
            SlideContent::Comparison { .. } => SlideType::Comparison,
            SlideContent::Split { .. } => SlideType::Split,
            SlideContent::Highlight { .. } => SlideType::Highlight,
            SlideContent::Chapter { .. } => SlideType::Chapter,
            SlideContent::ImageLeft(_) => SlideType::ImageLeft,
            SlideContent::ImageRight(_) => SlideType::ImageRight,
            SlideContent::ImageTop(_) => SlideType::ImageTop,
            SlideContent::PhoneMockup(_) => SlideType::PhoneMockup,
        }
    }

    /// The slide's primary text.
    pub fn title(&self) -> &str {
        match self {
            SlideContent::Hook { title, .. }
            | SlideContent::Content { title, .. }
            | SlideContent::ListicleItem { title, .. }
            | SlideContent::FrameworkStep { title, .. }
            | SlideContent::Tip { title, .. }
            | SlideContent::Split { title, .. }
            | SlideContent::Highlight { title, .. }
            | SlideContent::Chapter { title, .. } => title,
            SlideContent::Cta { name, .. } => name,
            SlideContent::Quote { text, .. } => text,
            SlideContent::Stat { value, .. } => value,
            SlideContent::Question { question, .. } => question,
            SlideContent::MythBuster { myth, .. } => myth,
            SlideContent::Comparison { left_label, .. } => left_label,
            SlideContent::ImageLeft(p)
            | SlideContent::ImageRight(p)
            | SlideContent::ImageTop(p)
            | SlideContent::PhoneMockup(p) => &p.title,
        }
    }
}

/// One planned slide. Immutable once the plan is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideSpec {
    pub index: usize,
    pub color: SlideColor,
    pub show_swipe_arrow: bool,
    #[serde(flatten)]
    pub content: SlideContent,
}

impl SlideSpec {
    pub fn slide_type(&self) -> SlideType {
        self.content.slide_type()
    }

    pub fn title(&self) -> &str {
        self.content.title()
    }
}

/// Expand a carousel request into exactly `slide_count` slides.
///
/// # Preconditions
/// `slide_count` lies within `template`'s `[min_slides, max_slides]`. This is
/// not checked here; [`crate::config::CarouselConfigBuilder::build`] enforces
/// it for configured runs.
pub fn build_plan(
    template: TemplateKind,
    topic: &str,
    thoughts: &str,
    slide_count: usize,
    color_mode: ColorMode,
    brand: &BrandProfile,
) -> Vec<SlideSpec> {
    let topic = topic.trim();
    let interior = slide_count.saturating_sub(2);
    let first_sentence = first_sentence(thoughts);
    let mut slides = Vec::with_capacity(slide_count);

    let hook = match template {
        TemplateKind::HookContentCta => SlideContent::Hook {
            title: topic.to_string(),
            subtitle: first_sentence.clone(),
            body: None,
        },
        TemplateKind::Listicle => SlideContent::Hook {
            title: topic.to_string(),
            subtitle: Some(format!("{interior} Punkte die du kennen musst")),
            body: None,
        },
        TemplateKind::StoryFramework => SlideContent::Hook {
            title: topic.to_string(),
            subtitle: Some(format!("Ein {interior}-Schritte Framework")),
            body: first_sentence.clone(),
        },
    };
    slides.push(hook);

    for i in 0..interior {
        let n = (i + 1) as u32;
        slides.push(match template {
            TemplateKind::HookContentCta => SlideContent::Content {
                title: format!("Key Point {n}"),
                number: Some(n),
                body: None,
            },
            TemplateKind::Listicle => SlideContent::ListicleItem {
                title: format!("Punkt {n}"),
                number: n,
                accent: format!("{n:02}"),
                body: None,
            },
            TemplateKind::StoryFramework => SlideContent::FrameworkStep {
                title: format!("Schritt {n}"),
                number: n,
                step_label: format!("{n}/{interior}"),
                phase: Some(format!("Phase {n}")),
                body: None,
            },
        });
    }

    slides.push(SlideContent::Cta {
        name: brand.name.clone(),
        tagline: brand.tagline.clone(),
        handle: Some(brand.handle.clone()),
        body: match template {
            TemplateKind::StoryFramework => Some(brand.cta_body.clone()),
            _ => None,
        },
    });

    let total = slides.len();
    slides
        .into_iter()
        .enumerate()
        .map(|(index, content)| SlideSpec {
            index,
            color: color_mode.resolve(index, total),
            show_swipe_arrow: !matches!(content, SlideContent::Cta { .. }),
            content,
        })
        .collect()
}

/// First `.`-terminated sentence of `thoughts`, or `None` when blank.
fn first_sentence(thoughts: &str) -> Option<String> {
    let t = thoughts.trim();
    if t.is_empty() {
        return None;
    }
    let first = t.split('.').next().unwrap_or(t).trim();
    if first.is_empty() {
        None
    } else {
        Some(first.to_string())
    }
}

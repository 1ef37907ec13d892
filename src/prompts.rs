//! Prompt Compiler: turn a [`SlideSpec`] into an image-generation prompt.
//!
//! Centralising every prompt here keeps prompt wording in one place and lets
//! unit tests inspect prompts without calling the image service.
//!
//! A text-to-image prompt is assembled from these sections, in order:
//!
//! 1. instruction header
//! 2. brand style guide ([`BRAND_STYLE_GUIDE`])
//! 3. platform framing (dimensions, aspect ratio, mobile safe zone)
//! 4. slide-type layout directive
//! 5. visual-consistency directive - every slide except the first
//! 6. topic/context trailer - every slide except the CTA
//!
//! The edit form ([`build_edit_prompt`]) drops the header and always carries
//! the consistency directive; it is used whenever a reference image is sent.
//! Every function here is pure.

use crate::config::Platform;
use crate::plan::{ImagePanel, SlideColor, SlideContent, SlideSpec};

/// First line of every text-to-image prompt.
pub const INSTRUCTION_HEADER: &str = "Create a professional carousel slide image.";

/// Brand design system shared by every slide.
pub const BRAND_STYLE_GUIDE: &str = r#"Werner Strauch personal brand design system. Premium, corporate, strategic consulting feel.

COLORS (STRICT):
- Primary: Deep Navy (#0A192F) - 60% of design, professional foundation
- Accent: Electric Lime (#DFFF00) - 10% ONLY, key highlights and CTAs
- Contrast: Pure White (#FFFFFF) - 30%, text and breathing space

TYPOGRAPHY FEEL:
- Headlines: Bold, condensed, uppercase, brutalist impact (like Bebas Neue)
- Subheads: Modern geometric sans-serif, distinctive (like Syne)
- Body: Technical monospace for precise, expert feel (like Space Mono)

VISUAL STYLE:
- Ultra clean, generous whitespace
- Strong typographic hierarchy - text IS the visual
- Geometric accents using lime color SPARINGLY
- Subtle grid pattern in background (barely visible)
- Light noise texture for depth
- NO stock photos, NO illustrations - pure typography and geometric shapes
- Professional but not boring - strategic use of bold elements

BRAND VOICE:
- German text
- "Der Stille Stratege" tagline
- Expert positioning in pricing, profit, and business strategy"#;

/// Appended to every prompt that is sent together with a reference image.
pub const CONSISTENCY_DIRECTIVE: &str = r#"CRITICAL - VISUAL CONSISTENCY:
Match the EXACT visual style from the reference image:
- Same fonts, same weights, same sizes
- Same color palette and usage ratios
- Same spacing and margins
- Same background treatment and texture
- Same accent element style
This slide must look like it belongs to the same carousel."#;

/// Build the text-to-image prompt for a slide.
///
/// `is_first` suppresses the visual-consistency directive: the first slide
/// has no reference image to match.
pub fn build_slide_prompt(
    slide: &SlideSpec,
    platform: Platform,
    is_first: bool,
    topic: &str,
    thoughts: Option<&str>,
) -> String {
    let mut sections = vec![INSTRUCTION_HEADER.to_string()];
    sections.extend(body_sections(slide, platform, !is_first, topic, thoughts));
    sections.join("\n\n")
}

/// Build the image-to-image prompt used whenever a reference image is sent.
pub fn build_edit_prompt(
    slide: &SlideSpec,
    platform: Platform,
    topic: &str,
    thoughts: Option<&str>,
) -> String {
    body_sections(slide, platform, true, topic, thoughts).join("\n\n")
}

/// Append free-text reviewer feedback to a compiled prompt.
pub fn with_feedback(prompt: String, feedback: Option<&str>) -> String {
    match feedback.map(str::trim) {
        Some(f) if !f.is_empty() => format!("{prompt}\n\nADDITIONAL FEEDBACK: {f}"),
        _ => prompt,
    }
}

fn body_sections(
    slide: &SlideSpec,
    platform: Platform,
    consistent: bool,
    topic: &str,
    thoughts: Option<&str>,
) -> Vec<String> {
    let mut sections = vec![
        BRAND_STYLE_GUIDE.to_string(),
        platform_framing(platform),
        layout_directive(slide),
    ];
    if consistent {
        sections.push(CONSISTENCY_DIRECTIVE.to_string());
    }
    if !matches!(slide.content, SlideContent::Cta { .. }) {
        sections.push(topic_trailer(topic, thoughts));
    }
    sections
}

fn platform_framing(platform: Platform) -> String {
    format!(
        "IMAGE FORMAT:\n\
- Dimensions: {}x{}px\n\
- Aspect ratio: {}\n\
- Platform: {}\n\
- Text must be clearly readable on mobile devices\n\
- Important content in safe zone (at least 80px from every edge)",
        platform.width(),
        platform.height(),
        platform.aspect_ratio(),
        platform.display_name()
    )
}

fn topic_trailer(topic: &str, thoughts: Option<&str>) -> String {
    match thoughts.map(str::trim) {
        Some(t) if !t.is_empty() => {
            format!("CAROUSEL TOPIC: {topic}\nADDITIONAL CONTEXT: {t}")
        }
        _ => format!("CAROUSEL TOPIC: {topic}"),
    }
}

fn color_instructions(color: SlideColor) -> &'static str {
    match color {
        SlideColor::Dark => "Navy (#0A192F) background with white text. Lime accents.",
        SlideColor::Light => "White background with navy (#0A192F) text. Lime accents.",
    }
}

fn swipe_line(slide: &SlideSpec) -> &'static str {
    if slide.show_swipe_arrow {
        "- Swipe arrow indicator bottom right (subtle, 50% opacity)"
    } else {
        "- NO swipe arrow"
    }
}

/// Render `lines` as a directive block, skipping lines for absent fields.
fn block(heading: &str, slide: &SlideSpec, layout: Vec<Option<String>>, style: &str) -> String {
    let mut out = format!(
        "SLIDE TYPE: {heading}\n{}\n\nLAYOUT:",
        color_instructions(slide.color)
    );
    for line in layout.into_iter().flatten() {
        out.push('\n');
        out.push_str(&line);
    }
    out.push('\n');
    out.push_str(swipe_line(slide));
    out.push_str("\n\n");
    out.push_str(style);
    out
}

fn opt_line(label: &str, value: &Option<String>) -> Option<String> {
    value.as_ref().map(|v| format!("- {label}: \"{v}\""))
}

fn line(s: impl Into<String>) -> Option<String> {
    Some(s.into())
}

fn layout_directive(slide: &SlideSpec) -> String {
    match &slide.content {
        SlideContent::Hook { title, subtitle, body } => block(
            "Hook/Title Slide",
            slide,
            vec![
                line("- Large, bold headline taking 50-60% of vertical space (around 140px type)"),
                line(format!("- Headline text: \"{title}\"")),
                opt_line("Subtitle below, 36px at 70% opacity", subtitle),
                opt_line("Supporting line under the subtitle", body),
                line("- One bold lime accent element (diagonal stripe, circle, or geometric shape), partly bleeding off the bottom edge"),
            ],
            "HEADLINE STYLE:\n\
- Uppercase, condensed, maximum impact\n\
- Break into 2-3 lines if needed for rhythm\n\
- Typography IS the hero - make it commanding",
        ),

        SlideContent::Content { title, number, body } => block(
            "Content Slide",
            slide,
            vec![
                line(format!("- Main heading: \"{title}\" (around 72px, bold)")),
                number.map(|n| format!("- Small slide number \"{n:02}\" in the top corner, 24px, 20% opacity")),
                opt_line("Supporting text, 32px at 70% opacity, 40px below the heading", body),
                line("- Lime accent bar (60x6px) above the heading"),
            ],
            "CONTENT STYLE:\n\
- Bold heading, supporting text smaller\n\
- Use geometric dividers or accent shapes\n\
- Maintain breathing room around text",
        ),

        SlideContent::ListicleItem { title, accent, body, .. } => block(
            "Listicle Item",
            slide,
            vec![
                line(format!("- HUGE number \"{accent}\" in lime color (200px+ size, dominant)")),
                line(format!("- Faint oversized \"{accent}\" (600px, 8% opacity) centered in the background")),
                line(format!("- Item title: \"{title}\" below the number, around 90px")),
                opt_line("Explanation, 32px at 60% opacity", body),
            ],
            "NUMBER STYLE:\n\
- The number should be the first thing you see\n\
- Bold, geometric, could be outline or filled\n\
- Position: left side with text right, or stacked",
        ),

        SlideContent::FrameworkStep { title, number, step_label, phase, body } => block(
            "Framework Step",
            slide,
            vec![
                line(format!("- Step indicator \"{step_label}\" prominent, 28px at 60% opacity")),
                line(format!("- Step number \"{number}\" as large lime element (around 280px)")),
                line(format!("- Step title: \"{title}\", around 64px")),
                opt_line("Phase label, 22px uppercase", phase),
                opt_line("Step description, 28px at 60% opacity", body),
            ],
            "STEP STYLE:\n\
- Large lime number block on left (or top), about 40% of the width\n\
- Content aligned right (or below)\n\
- Progress indicator feel",
        ),

        SlideContent::Cta { name, tagline, handle, body } => block(
            "Call-to-Action (Final Slide)",
            slide,
            vec![
                line("- Centered composition"),
                line(format!("- Brand name \"{name}\" large and prominent (around 120px)")),
                line(format!("- Tagline \"{tagline}\" above the name, 26px at 50% opacity")),
                opt_line("Handle/contact, 32px lime, 50px below the name", handle),
                opt_line("Closing line", body),
                line("- Decorative lime element (concentric circles centered behind the name)"),
            ],
            "CTA STYLE:\n\
- Name is the hero - big, bold, centered\n\
- Tagline in lighter weight\n\
- Subtle decorative elements, not overwhelming\n\
- Professional sign-off feel, this is the last slide",
        ),

        SlideContent::Quote { text, author } => block(
            "Quote",
            slide,
            vec![
                line(format!("- Quote text: \"{text}\", centered, 56px semi-bold, max 850px wide")),
                line("- Oversized lime quotation marks (300px, 15% opacity) top-left and bottom-right"),
                author.as_ref().map(|a| {
                    format!("- Author \"{a}\" 60px below the quote, 24px, preceded by a 50x3px lime line")
                }),
            ],
            "QUOTE STYLE:\n\
- Quiet, editorial, lots of air around the text\n\
- Quote marks decorate, they never compete with the words",
        ),

        SlideContent::Stat { value, label, body } => block(
            "Statistic",
            slide,
            vec![
                line(format!("- Big stat \"{value}\" in lime, 220px, centered")),
                line(format!("- Ghosted copy of \"{value}\" at 500px, 6% opacity, behind everything")),
                opt_line("Label under the stat, 42px semi-bold, max 700px wide", label),
                opt_line("Source or context, 26px at 60% opacity", body),
            ],
            "STAT STYLE:\n\
- The number is the whole story\n\
- Everything centered on one vertical axis",
        ),

        SlideContent::Question { question, body } => block(
            "Rhetorical Question",
            slide,
            vec![
                line("- Giant lime question mark (700px, 8% opacity) centered in the background"),
                line(format!("- Question: \"{question}\", around 100px, centered")),
                opt_line("Follow-up, 36px at 70% opacity, 40px below", body),
            ],
            "QUESTION STYLE:\n\
- Provocative, leaves the reader thinking\n\
- Question text must stay readable over the background mark",
        ),

        SlideContent::Tip { title, body } => block(
            "Quick Tip",
            slide,
            vec![
                line("- Rounded box filling the width, 2px lime border, 60px padding"),
                line("- Small lime label \"TIPP\" (20px, letter-spaced) at the top of the box"),
                line(format!("- Tip: \"{title}\", 52px bold inside the box")),
                opt_line("Explanation, 28px at 70% opacity, 30px below", body),
            ],
            "TIP STYLE:\n\
- Feels like a card you would save\n\
- Box is the visual anchor, generous margins outside it",
        ),

        SlideContent::MythBuster { myth, truth } => block(
            "Myth Buster",
            slide,
            vec![
                line("- Label \"MYTHOS\" (22px, letter-spaced, 50% opacity)"),
                line(format!("- Myth: \"{myth}\", 56px, struck through with a thick lime line, 50% opacity")),
                line("- 80px gap"),
                line("- Label \"WAHRHEIT\" (22px, lime)"),
                line(format!("- Truth: \"{truth}\", 56px bold, full opacity")),
                line("- Faint oversized \"X\" (600px) in the background"),
            ],
            "MYTH STYLE:\n\
- Clear before/after reading order from top to bottom\n\
- The truth must visually win",
        ),

        SlideContent::Comparison { left_label, left, right_label, right } => block(
            "Comparison",
            slide,
            vec![
                line("- Two equal columns split by a thin vertical divider"),
                line(format!("- Left label \"{left_label}\" (20px, 50% opacity) above an 80px headline \"{left}\" at 60% opacity")),
                line(format!("- Right label \"{right_label}\" (20px, lime) above an 80px headline \"{right}\" at full opacity")),
                line("- Small lime arrow pointing from left column to right column"),
            ],
            "COMPARISON STYLE:\n\
- Left reads as the old state, right as the better one\n\
- Identical vertical alignment in both columns",
        ),

        SlideContent::Split { title, left_label, left, right_label, right } => block(
            "Do / Don't Split",
            slide,
            vec![
                line(format!("- Heading \"{title}\" across the top, 48px")),
                line(format!("- Left half: label \"{left_label}\" (24px, 50% opacity) with list \"{left}\" at 26px, 70% opacity")),
                line(format!("- Right half: label \"{right_label}\" (24px, lime) with list \"{right}\" at 26px, full opacity")),
                line("- Each list item starts with a small marker (x on the left, check on the right)"),
            ],
            "SPLIT STYLE:\n\
- Halves separated by 50px gutter\n\
- Right half carries the lime accent",
        ),

        SlideContent::Highlight { title, body } => block(
            "Key Takeaway",
            slide,
            vec![
                line("- Full-width lime-bordered panel, vertically centered"),
                line("- Small tab \"KEY TAKEAWAY\" (18px) overlapping the panel's top edge"),
                line(format!("- Takeaway: \"{title}\", 56px bold inside the panel")),
                opt_line("Supporting sentence, 28px at 70% opacity", body),
            ],
            "HIGHLIGHT STYLE:\n\
- One idea, framed like a pull-quote\n\
- Panel never touches the safe-zone margin",
        ),

        SlideContent::Chapter { number, title, subtitle } => block(
            "Chapter Divider",
            slide,
            vec![
                line(format!("- Chapter number \"{number:02}\" in lime, 180px")),
                line(format!("- Ghosted \"{number:02}\" at 600px, 6% opacity behind")),
                line("- Thin divider line (120px, 30% opacity) between number and title"),
                line(format!("- Chapter title \"{title}\", 72px")),
                opt_line("Subtitle, 32px at 60% opacity", subtitle),
            ],
            "CHAPTER STYLE:\n\
- Pause slide: minimal, calm, lots of negative space",
        ),

        SlideContent::ImageLeft(panel) => image_block(
            "Image Left",
            slide,
            panel,
            "- Image area: left 40% of the width, full height, soft gradient fade into the background on its right edge",
            "- Text column: right 60%, 60px padding, 50x5px lime accent bar above a 56px heading",
        ),
        SlideContent::ImageRight(panel) => image_block(
            "Image Right",
            slide,
            panel,
            "- Image area: right 40% of the width, full height, soft gradient fade on its left edge",
            "- Text column: left 60%, 60px padding, 50x5px lime accent bar above a 56px heading",
        ),
        SlideContent::ImageTop(panel) => image_block(
            "Image Top",
            slide,
            panel,
            "- Image area: top 50% of the height, full width, gradient fade into the background at the bottom",
            "- Text block: bottom 50%, 50x5px lime accent bar above a 52px heading",
        ),
        SlideContent::PhoneMockup(panel) => image_block(
            "Phone Mockup",
            slide,
            panel,
            "- Smartphone frame (about 280px wide, rounded corners, notch) on the right half, slightly tilted, showing the screen content",
            "- Text: left 50%, 50x5px lime accent bar above a 48px heading",
        ),
    }
}

fn image_block(heading: &str, slide: &SlideSpec, panel: &ImagePanel, image: &str, text: &str) -> String {
    block(
        heading,
        slide,
        vec![
            line(image),
            panel
                .image_alt
                .as_ref()
                .map(|alt| format!("- Image content: {alt}")),
            line(text),
            line(format!("- Heading: \"{}\"", panel.title)),
            opt_line("Subtitle, 28px at 70% opacity", &panel.subtitle),
            opt_line("Body text, 24px", &panel.body),
        ],
        "IMAGE STYLE:\n\
- Imagery is photographic but toned toward the navy/lime palette\n\
- Text side stays pure typography",
    )
}

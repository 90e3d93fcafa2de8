//! Decorations
//!
//! Randomized decorative fragments for the invitation pages: background
//! sparkles on the host's generator view, balloons, confetti, sparkles,
//! floating numerals and crystals on the guest invitation, and a confetti
//! burst on the RSVP confirmation.
//!
//! Generation is pure: every call takes its random source, so a seeded RNG
//! gives a reproducible layout.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

const BALLOON_CLASSES: [&str; 3] = ["balloon-silver", "balloon-white", "balloon-light"];
const CONFETTI_COLORS: [&str; 4] = ["#C0C0C0", "#E8E8E8", "#FFFFFF", "#D0D0D0"];

/// Which page region is being decorated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scene {
    /// Sparkle field behind the generator view
    Background,
    /// Full set for the guest invitation
    Invitation,
    /// Confetti shown with an RSVP confirmation
    Celebration,
}

impl std::str::FromStr for Scene {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "background" => Ok(Scene::Background),
            "invitation" => Ok(Scene::Invitation),
            "celebration" => Ok(Scene::Celebration),
            other => Err(format!("Unknown scene: {}", other)),
        }
    }
}

/// Kind of decorative element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecorationKind {
    BackgroundSparkle,
    Balloon,
    Confetti,
    Sparkle,
    Numeral,
    Crystal,
}

impl DecorationKind {
    /// CSS class the stylesheet animates
    pub fn css_class(&self) -> &'static str {
        match self {
            DecorationKind::BackgroundSparkle => "sparkle",
            DecorationKind::Balloon => "elegant-balloon",
            DecorationKind::Confetti => "subtle-confetti",
            DecorationKind::Sparkle => "elegant-sparkle",
            DecorationKind::Numeral => "floating-number",
            DecorationKind::Crystal => "crystal",
        }
    }
}

/// CSS length unit used for a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "%")]
    Percent,
    #[serde(rename = "vw")]
    Vw,
    #[serde(rename = "vh")]
    Vh,
}

impl Unit {
    fn as_str(&self) -> &'static str {
        match self {
            Unit::Percent => "%",
            Unit::Vw => "vw",
            Unit::Vh => "vh",
        }
    }
}

/// A position along one axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub value: f64,
    pub unit: Unit,
}

impl Offset {
    fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }
}

/// One decorative element with its randomized layout and timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decoration {
    pub kind: DecorationKind,
    /// Additional CSS class (balloon colour variant)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    pub left: Offset,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<Offset>,
    /// Width and height in px
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<(f64, f64)>,
    /// Animation duration in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<f64>,
    /// Animation delay in seconds
    pub delay_secs: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Decoration {
    fn new(kind: DecorationKind, left: Offset, delay_secs: f64) -> Self {
        Self {
            kind,
            variant: None,
            left,
            top: None,
            size: None,
            duration_secs: None,
            delay_secs,
            color: None,
            text: None,
        }
    }

    /// Inline CSS for this element
    pub fn style(&self) -> String {
        let mut style = format!("left: {:.2}{};", self.left.value, self.left.unit.as_str());

        if let Some(top) = &self.top {
            let _ = write!(style, " top: {:.2}{};", top.value, top.unit.as_str());
        }
        if let Some(color) = &self.color {
            let _ = write!(style, " background-color: {};", color);
        }
        if let Some((w, h)) = self.size {
            let _ = write!(style, " width: {:.2}px; height: {:.2}px;", w, h);
        }
        if let Some(duration) = self.duration_secs {
            let _ = write!(style, " animation-duration: {:.2}s;", duration);
        }
        let _ = write!(style, " animation-delay: {:.2}s;", self.delay_secs);

        style
    }

    /// Render as an HTML fragment
    pub fn to_html(&self) -> String {
        let class = match &self.variant {
            Some(variant) => format!("{} {}", self.kind.css_class(), variant),
            None => self.kind.css_class().to_string(),
        };

        format!(
            "<div class=\"{}\" style=\"{}\">{}</div>",
            class,
            self.style(),
            self.text.as_deref().map(escape_html).unwrap_or_default()
        )
    }
}

/// Generate every decoration for a scene
pub fn generate<R: Rng>(scene: Scene, rng: &mut R, numeral: &str) -> Vec<Decoration> {
    match scene {
        Scene::Background => background_sparkles(rng),
        Scene::Invitation => {
            let mut all = balloons(rng);
            all.extend(confetti(rng));
            all.extend(sparkles(rng));
            all.extend(numerals(rng, numeral));
            all.extend(crystals(rng));
            all
        }
        Scene::Celebration => confetti(rng),
    }
}

/// Render a list of decorations as concatenated HTML
pub fn render_html(decorations: &[Decoration]) -> String {
    decorations.iter().map(Decoration::to_html).collect::<Vec<_>>().join("\n")
}

fn background_sparkles<R: Rng>(rng: &mut R) -> Vec<Decoration> {
    (0..50)
        .map(|_| {
            let left = rng.gen_range(0.0..100.0);
            let top = rng.gen_range(0.0..100.0);
            let size = rng.gen_range(1.0..5.0);
            let delay = rng.gen_range(0.0..5.0);

            let mut d = Decoration::new(
                DecorationKind::BackgroundSparkle,
                Offset::new(left, Unit::Percent),
                delay,
            );
            d.top = Some(Offset::new(top, Unit::Percent));
            d.size = Some((size, size));
            d
        })
        .collect()
}

fn balloons<R: Rng>(rng: &mut R) -> Vec<Decoration> {
    (0..12)
        .map(|_| {
            let variant = BALLOON_CLASSES.choose(rng).copied().unwrap_or(BALLOON_CLASSES[0]);
            let left = rng.gen_range(5.0..90.0);
            let top = rng.gen_range(10.0..90.0);
            let width = rng.gen_range(35.0..55.0);
            let duration = rng.gen_range(20.0..30.0);
            let delay = rng.gen_range(0.0..15.0);

            let mut d = Decoration::new(
                DecorationKind::Balloon,
                Offset::new(left, Unit::Percent),
                delay,
            );
            d.variant = Some(variant.to_string());
            d.top = Some(Offset::new(top, Unit::Percent));
            d.size = Some((width, width * 1.25));
            d.duration_secs = Some(duration);
            d
        })
        .collect()
}

fn confetti<R: Rng>(rng: &mut R) -> Vec<Decoration> {
    (0..30)
        .map(|_| {
            let left = rng.gen_range(0.0..100.0);
            let color = CONFETTI_COLORS.choose(rng).copied().unwrap_or(CONFETTI_COLORS[0]);
            let size = rng.gen_range(2.0..6.0);
            let duration = rng.gen_range(6.0..11.0);
            let delay = rng.gen_range(0.0..8.0);

            let mut d = Decoration::new(DecorationKind::Confetti, Offset::new(left, Unit::Vw), delay);
            d.color = Some(color.to_string());
            d.size = Some((size, size));
            d.duration_secs = Some(duration);
            d
        })
        .collect()
}

fn sparkles<R: Rng>(rng: &mut R) -> Vec<Decoration> {
    (0..25)
        .map(|_| {
            let left = rng.gen_range(0.0..100.0);
            let top = rng.gen_range(0.0..100.0);
            let size = rng.gen_range(2.0..7.0);
            let delay = rng.gen_range(0.0..4.0);

            let mut d = Decoration::new(DecorationKind::Sparkle, Offset::new(left, Unit::Vw), delay);
            d.top = Some(Offset::new(top, Unit::Vh));
            d.size = Some((size, size));
            d
        })
        .collect()
}

fn numerals<R: Rng>(rng: &mut R, numeral: &str) -> Vec<Decoration> {
    (0..8)
        .map(|_| {
            let left = rng.gen_range(5.0..95.0);
            let top = rng.gen_range(5.0..95.0);
            let duration = rng.gen_range(15.0..30.0);
            let delay = rng.gen_range(0.0..10.0);

            let mut d = Decoration::new(
                DecorationKind::Numeral,
                Offset::new(left, Unit::Percent),
                delay,
            );
            d.top = Some(Offset::new(top, Unit::Percent));
            d.duration_secs = Some(duration);
            d.text = Some(numeral.to_string());
            d
        })
        .collect()
}

fn crystals<R: Rng>(rng: &mut R) -> Vec<Decoration> {
    (0..15)
        .map(|_| {
            let left = rng.gen_range(0.0..95.0);
            let top = rng.gen_range(0.0..95.0);
            let size = rng.gen_range(10.0..25.0);
            let duration = rng.gen_range(20.0..40.0);
            let delay = rng.gen_range(0.0..15.0);

            let mut d = Decoration::new(
                DecorationKind::Crystal,
                Offset::new(left, Unit::Percent),
                delay,
            );
            d.top = Some(Offset::new(top, Unit::Percent));
            d.size = Some((size, size));
            d.duration_secs = Some(duration);
            d
        })
        .collect()
}

pub(crate) fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn count(decorations: &[Decoration], kind: DecorationKind) -> usize {
        decorations.iter().filter(|d| d.kind == kind).count()
    }

    #[test]
    fn test_scene_counts() {
        let mut rng = StdRng::seed_from_u64(42);

        let background = generate(Scene::Background, &mut rng, "21");
        assert_eq!(background.len(), 50);

        let invitation = generate(Scene::Invitation, &mut rng, "21");
        assert_eq!(count(&invitation, DecorationKind::Balloon), 12);
        assert_eq!(count(&invitation, DecorationKind::Confetti), 30);
        assert_eq!(count(&invitation, DecorationKind::Sparkle), 25);
        assert_eq!(count(&invitation, DecorationKind::Numeral), 8);
        assert_eq!(count(&invitation, DecorationKind::Crystal), 15);

        let celebration = generate(Scene::Celebration, &mut rng, "21");
        assert_eq!(celebration.len(), 30);
        assert!(celebration.iter().all(|d| d.kind == DecorationKind::Confetti));
    }

    #[test]
    fn test_ranges() {
        let mut rng = StdRng::seed_from_u64(1);
        let invitation = generate(Scene::Invitation, &mut rng, "21");

        for d in &invitation {
            match d.kind {
                DecorationKind::Balloon => {
                    let (w, h) = d.size.unwrap();
                    assert!((35.0..55.0).contains(&w));
                    assert!((h - w * 1.25).abs() < 1e-9);
                    assert!((5.0..90.0).contains(&d.left.value));
                    assert!(BALLOON_CLASSES.contains(&d.variant.as_deref().unwrap()));
                }
                DecorationKind::Confetti => {
                    assert_eq!(d.left.unit, Unit::Vw);
                    assert!(CONFETTI_COLORS.contains(&d.color.as_deref().unwrap()));
                    assert!((6.0..11.0).contains(&d.duration_secs.unwrap()));
                }
                DecorationKind::Numeral => {
                    assert_eq!(d.text.as_deref(), Some("21"));
                }
                DecorationKind::Crystal => {
                    assert!((0.0..95.0).contains(&d.left.value));
                }
                _ => {}
            }
        }
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = generate(Scene::Invitation, &mut StdRng::seed_from_u64(9), "21");
        let b = generate(Scene::Invitation, &mut StdRng::seed_from_u64(9), "21");
        assert_eq!(a, b);
    }

    #[test]
    fn test_html_rendering() {
        let mut d = Decoration::new(DecorationKind::Numeral, Offset::new(10.0, Unit::Percent), 1.5);
        d.top = Some(Offset::new(20.0, Unit::Percent));
        d.text = Some("<21>".to_string());

        let html = d.to_html();
        assert!(html.starts_with("<div class=\"floating-number\""));
        assert!(html.contains("left: 10.00%; top: 20.00%;"));
        assert!(html.contains("animation-delay: 1.50s;"));
        assert!(html.contains("&lt;21&gt;"));
    }

    #[test]
    fn test_scene_from_str() {
        assert_eq!("Invitation".parse::<Scene>().unwrap(), Scene::Invitation);
        assert!("party".parse::<Scene>().is_err());
    }
}

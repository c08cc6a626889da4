//! Portraits and the placeholder drawn when an actor has none.

use castbook_core::Actor;
use serde::Serialize;

/// Background colours cycled by actor id.
pub const PALETTE: [&str; 3] = ["#f4cccc", "#a2c4c9", "#d5a6bd"];

/// Frame and initial colour.
pub const FRAME_COLOR: &str = "#4a3f35";

/// Drawn stand-in for a missing portrait.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placeholder {
    /// Upper-cased first character of the name, or "?"
    pub initial: String,
    /// Background colour
    pub background: &'static str,
}

impl Placeholder {
    /// Placeholder for an actor.
    #[must_use]
    pub fn for_actor(actor: &Actor) -> Self {
        let initial = actor
            .name
            .chars()
            .next()
            .map_or_else(|| "?".to_string(), |c| c.to_uppercase().collect());
        Self {
            initial,
            background: PALETTE[(actor.id.0 % PALETTE.len() as u64) as usize],
        }
    }

    /// Inline SVG of `size` pixels square.
    #[must_use]
    pub fn to_svg(&self, size: u32) -> String {
        format!(
            concat!(
                r#"<svg class="placeholder" width="{size}" height="{size}" viewBox="0 0 100 100">"#,
                r#"<ellipse cx="50" cy="50" rx="48" ry="48" fill="{bg}" stroke="{frame}" stroke-width="4"/>"#,
                r#"<ellipse cx="50" cy="50" rx="42" ry="42" fill="none" stroke="{frame}" stroke-width="2" stroke-dasharray="6 3"/>"#,
                r#"<text x="52%" y="65%" text-anchor="middle" font-size="42" font-weight="bold" fill="{frame}">{initial}</text>"#,
                "</svg>"
            ),
            size = size,
            bg = self.background,
            frame = FRAME_COLOR,
            initial = crate::html::escape(&self.initial),
        )
    }
}

/// What to show where an actor's face goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Portrait {
    /// A real image
    Image {
        /// Image URI
        src: String,
    },
    /// The drawn placeholder
    Placeholder(Placeholder),
}

impl Portrait {
    /// Portrait for an actor, falling back to a placeholder.
    #[must_use]
    pub fn for_actor(actor: &Actor) -> Self {
        match &actor.image {
            Some(src) if !src.is_empty() => Self::Image { src: src.clone() },
            _ => Self::Placeholder(Placeholder::for_actor(actor)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_and_color() {
        let p = Placeholder::for_actor(&Actor::new(4, "léa Seydoux"));
        assert_eq!(p.initial, "L");
        assert_eq!(p.background, "#a2c4c9");
        assert_eq!(Placeholder::for_actor(&Actor::new(3, "x")).background, "#f4cccc");
        assert_eq!(Placeholder::for_actor(&Actor::new(5, "x")).background, "#d5a6bd");
    }

    #[test]
    fn test_empty_name_is_question_mark() {
        assert_eq!(Placeholder::for_actor(&Actor::new(1, "")).initial, "?");
    }

    #[test]
    fn test_portrait_fallback() {
        let with = Actor::new(1, "Bill Murray").image("https://img/bill.jpg");
        assert_eq!(
            Portrait::for_actor(&with),
            Portrait::Image {
                src: "https://img/bill.jpg".to_string()
            }
        );
        let without = Actor::new(1, "Bill Murray");
        assert!(matches!(Portrait::for_actor(&without), Portrait::Placeholder(_)));
        let blank = Actor::new(1, "Bill Murray").image("");
        assert!(matches!(Portrait::for_actor(&blank), Portrait::Placeholder(_)));
    }

    #[test]
    fn test_svg_contains_initial_and_colors() {
        let svg = Placeholder::for_actor(&Actor::new(0, "<script>")).to_svg(32);
        assert!(svg.contains(r#"width="32""#));
        assert!(svg.contains("#f4cccc"));
        assert!(svg.contains(FRAME_COLOR));
        assert!(svg.contains(">&lt;</text>"));
    }
}

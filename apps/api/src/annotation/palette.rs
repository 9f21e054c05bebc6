//! Color cycle used to tag placeholder keywords in annotated prompts.

/// Fixed highlight palette. Keyword `n` (0-based) gets `PALETTE[n % 5]`.
pub const PALETTE: [&str; 5] = ["#0070f2", "#00b050", "#ffb100", "#d62d20", "#a200ff"];

/// Deterministic ordinal → color mapping that wraps around the palette.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorCycle;

impl ColorCycle {
    pub fn color_at(index: usize) -> &'static str {
        PALETTE[index % PALETTE.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_at_wraps_after_palette() {
        assert_eq!(ColorCycle::color_at(0), "#0070f2");
        assert_eq!(ColorCycle::color_at(4), "#a200ff");
        assert_eq!(ColorCycle::color_at(5), "#0070f2");
        assert_eq!(ColorCycle::color_at(12), "#ffb100");
    }

    #[test]
    fn test_palette_colors_are_distinct() {
        let mut colors = PALETTE.to_vec();
        colors.sort_unstable();
        colors.dedup();
        assert_eq!(colors.len(), PALETTE.len());
    }
}

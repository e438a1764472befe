/// Fixed one-click prompt shortcuts. Selecting one overwrites the prompt
/// field with its exact text.
pub const PRESETS: [(&str, &str); 6] = [
    (
        "🎨 Artistic",
        "Transform the subject into a beautiful watercolor painting style artwork",
    ),
    (
        "🚀 Space",
        "Make the subject an astronaut in space with a helmet and stars around",
    ),
    (
        "👑 Royal",
        "Make the subject look like royalty wearing a crown and royal outfit",
    ),
    (
        "🦸 Hero",
        "Transform the subject into a superhero with a cape and mask",
    ),
    (
        "🎭 Cartoon",
        "Turn the subject into a cute cartoon character with big expressive eyes",
    ),
    (
        "🌈 Rainbow",
        "Make the subject multicolored and rainbow-like with magical effects",
    ),
];

/// Pure mapping from preset label to its fixed text. The interface layer
/// owns the re-render after selection.
pub fn preset_text(label: &str) -> Option<&'static str> {
    PRESETS
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, text)| *text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_six_presets() {
        assert_eq!(PRESETS.len(), 6);
    }

    #[test]
    fn test_lookup_is_exact() {
        for (label, text) in PRESETS {
            assert_eq!(preset_text(label), Some(text));
        }
        assert_eq!(preset_text("🎨 Artistic"), Some(PRESETS[0].1));
        assert_eq!(preset_text("Artistic"), None);
        assert_eq!(preset_text(""), None);
    }

    #[test]
    fn test_preset_texts_are_dispatchable_prompts() {
        for (_, text) in PRESETS {
            assert!(!text.trim().is_empty());
            assert!(text.chars().count() <= crate::models::MAX_PROMPT_CHARS);
        }
    }
}

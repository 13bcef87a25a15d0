//! Color presets for the board and panels.

use egui::Color32;

#[derive(Clone, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    pub background: Color32,
    pub panel_background: Color32,
    pub text_color: Color32,
    pub accent_color: Color32,
    pub board_light: Color32,
    pub board_dark: Color32,
    pub queen_color: Color32,
    pub probe_color: Color32,
    pub retreat_color: Color32,
}

impl Theme {
    pub fn presets() -> Vec<Self> {
        vec![
            Self {
                name: "Tech Console",
                background: Color32::from_rgb(10, 15, 31),
                panel_background: Color32::from_rgb(16, 24, 48),
                text_color: Color32::from_rgb(216, 226, 220),
                accent_color: Color32::from_rgb(92, 225, 230),
                board_light: Color32::from_rgb(0, 119, 182),
                board_dark: Color32::from_rgb(15, 32, 39),
                queen_color: Color32::from_rgb(92, 225, 230),
                probe_color: Color32::from_rgb(255, 183, 3),
                retreat_color: Color32::from_rgb(230, 57, 70),
            },
            Self {
                name: "Sleek Dark",
                background: Color32::from_rgb(15, 23, 42),
                panel_background: Color32::from_rgb(30, 41, 59),
                text_color: Color32::from_rgb(226, 232, 240),
                accent_color: Color32::from_rgb(99, 102, 241),
                board_light: Color32::from_rgb(241, 245, 249),
                board_dark: Color32::from_rgb(100, 116, 139),
                queen_color: Color32::from_rgb(15, 23, 42),
                probe_color: Color32::from_rgb(250, 204, 21),
                retreat_color: Color32::from_rgb(244, 63, 94),
            },
            Self {
                name: "Classic Wood",
                background: Color32::from_rgb(45, 25, 10),
                panel_background: Color32::from_rgb(70, 40, 20),
                text_color: Color32::from_rgb(245, 230, 200),
                accent_color: Color32::from_rgb(180, 100, 40),
                board_light: Color32::from_rgb(210, 180, 140),
                board_dark: Color32::from_rgb(139, 69, 19),
                queen_color: Color32::from_rgb(45, 25, 10),
                probe_color: Color32::from_rgb(255, 200, 60),
                retreat_color: Color32::from_rgb(200, 40, 40),
            },
            Self {
                name: "Paper",
                background: Color32::from_rgb(240, 240, 230),
                panel_background: Color32::from_rgb(220, 220, 210),
                text_color: Color32::from_rgb(50, 50, 50),
                accent_color: Color32::from_rgb(200, 50, 50),
                board_light: Color32::from_rgb(255, 255, 250),
                board_dark: Color32::from_rgb(200, 200, 190),
                queen_color: Color32::from_rgb(20, 20, 20),
                probe_color: Color32::from_rgb(230, 160, 0),
                retreat_color: Color32::from_rgb(200, 50, 50),
            },
        ]
    }

    /// Preset lookup for restoring a persisted selection.
    pub fn by_name(name: &str) -> Option<Self> {
        Self::presets().into_iter().find(|t| t.name == name)
    }

    /// The preset after this one, wrapping around. Used by the compact
    /// layout's cycle button.
    pub fn next(&self) -> Self {
        let presets = Self::presets();
        let idx = presets
            .iter()
            .position(|t| t.name == self.name)
            .unwrap_or(0);
        presets[(idx + 1) % presets.len()].clone()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::presets()[0].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_names_are_unique() {
        let presets = Theme::presets();
        for (i, a) in presets.iter().enumerate() {
            for b in &presets[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }

    #[test]
    fn by_name_finds_every_preset() {
        for preset in Theme::presets() {
            assert_eq!(Theme::by_name(preset.name).map(|t| t.name), Some(preset.name));
        }
        assert!(Theme::by_name("nope").is_none());
    }

    #[test]
    fn next_cycles_through_all_presets() {
        let mut theme = Theme::default();
        let count = Theme::presets().len();
        for _ in 0..count {
            theme = theme.next();
        }
        assert_eq!(theme.name, Theme::default().name);
    }
}

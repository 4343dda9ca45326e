use crate::color::Hsl;
use crate::config::BackgroundMode;
use crate::pipeline::detect::Anchors;

/// The 22 named roles of a terminal theme, declared in palette order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Background,
    Foreground,
    Bold,
    Cursor,
    Selection,
    SelectedText,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

impl Role {
    pub const ALL: [Role; 22] = [
        Role::Background,
        Role::Foreground,
        Role::Bold,
        Role::Cursor,
        Role::Selection,
        Role::SelectedText,
        Role::Black,
        Role::Red,
        Role::Green,
        Role::Yellow,
        Role::Blue,
        Role::Magenta,
        Role::Cyan,
        Role::White,
        Role::BrightBlack,
        Role::BrightRed,
        Role::BrightGreen,
        Role::BrightYellow,
        Role::BrightBlue,
        Role::BrightMagenta,
        Role::BrightCyan,
        Role::BrightWhite,
    ];

    /// ANSI slot number 0-15 for the sixteen palette roles; `None` for the
    /// special roles.
    pub fn ansi_slot(self) -> Option<usize> {
        match self {
            Role::Black => Some(0),
            Role::Red => Some(1),
            Role::Green => Some(2),
            Role::Yellow => Some(3),
            Role::Blue => Some(4),
            Role::Magenta => Some(5),
            Role::Cyan => Some(6),
            Role::White => Some(7),
            Role::BrightBlack => Some(8),
            Role::BrightRed => Some(9),
            Role::BrightGreen => Some(10),
            Role::BrightYellow => Some(11),
            Role::BrightBlue => Some(12),
            Role::BrightMagenta => Some(13),
            Role::BrightCyan => Some(14),
            Role::BrightWhite => Some(15),
            _ => None,
        }
    }

    /// Stable name, matching the conventional theme-template keys.
    pub fn name(self) -> &'static str {
        match self {
            Role::Background => "background",
            Role::Foreground => "foreground",
            Role::Bold => "bold",
            Role::Cursor => "cursor",
            Role::Selection => "selection",
            Role::SelectedText => "selected-text",
            Role::Black => "ansi-black-normal",
            Role::Red => "ansi-red-normal",
            Role::Green => "ansi-green-normal",
            Role::Yellow => "ansi-yellow-normal",
            Role::Blue => "ansi-blue-normal",
            Role::Magenta => "ansi-magenta-normal",
            Role::Cyan => "ansi-cyan-normal",
            Role::White => "ansi-white-normal",
            Role::BrightBlack => "ansi-black-bright",
            Role::BrightRed => "ansi-red-bright",
            Role::BrightGreen => "ansi-green-bright",
            Role::BrightYellow => "ansi-yellow-bright",
            Role::BrightBlue => "ansi-blue-bright",
            Role::BrightMagenta => "ansi-magenta-bright",
            Role::BrightCyan => "ansi-cyan-bright",
            Role::BrightWhite => "ansi-white-bright",
        }
    }
}

/// One role's color, with every channel format derived from a single
/// HSL→RGB conversion so there is no independent source of truth per format.
#[derive(Debug, Clone)]
pub struct RoleColor {
    pub hsl: Hsl,
    /// Normalized sRGB channels in `[0, 1]`.
    pub rgb: [f32; 3],
    /// sRGB channels as 0-255 integers, rounded from `rgb`.
    pub rgb8: [u8; 3],
    /// Lowercase `#rrggbb`, formatted from `rgb8`.
    pub hex: String,
}

impl RoleColor {
    fn new(hsl: Hsl) -> Self {
        let rgb = hsl.to_rgb_f32();
        let rgb8 = [
            (rgb[0].clamp(0.0, 1.0) * 255.0).round() as u8,
            (rgb[1].clamp(0.0, 1.0) * 255.0).round() as u8,
            (rgb[2].clamp(0.0, 1.0) * 255.0).round() as u8,
        ];
        let hex = format!("#{:02x}{:02x}{:02x}", rgb8[0], rgb8[1], rgb8[2]);
        Self { hsl, rgb, rgb8, hex }
    }
}

/// Finished mapping of all 22 roles, immutable once assembled.
#[derive(Debug, Clone)]
pub struct Palette {
    entries: Vec<RoleColor>,
}

impl Palette {
    pub fn get(&self, role: Role) -> &RoleColor {
        &self.entries[role as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, &RoleColor)> {
        Role::ALL.iter().copied().zip(self.entries.iter())
    }
}

/// Resolve which color is background and which anchor backs the foreground.
///
/// An explicit hex background picks the anchor that opposes its lightness as
/// foreground; `auto` behaves like `dark` (the detected anchors already
/// reflect the image's own balance).
pub fn resolve_background(anchors: &Anchors, mode: &BackgroundMode) -> (Hsl, Hsl) {
    match mode {
        BackgroundMode::Auto | BackgroundMode::Dark => (anchors.dark, anchors.light),
        BackgroundMode::Light => (anchors.light, anchors.dark),
        BackgroundMode::Hex(background) => {
            if background.lightness() < 0.5 {
                (*background, anchors.light)
            } else {
                (*background, anchors.dark)
            }
        }
    }
}

/// Synthesize the ANSI black slot from the background's own lightness: push
/// up when very dark, down when midtone, and pin to 0.2 when light.
fn synthesize_black(background: &Hsl) -> Hsl {
    let lightness = background.lightness();
    if lightness < 0.1 {
        background.with_lightness(lightness + 0.1)
    } else if lightness < 0.5 {
        background.with_lightness(lightness - 0.1)
    } else {
        background.with_lightness(0.2)
    }
}

/// Combine the resolved background/foreground with the interleaved expanded
/// colors into the full role table.
///
/// The positional contract: pair `i` of `expanded` fills ANSI color `i`
/// (normal at `2i`, bright at `2i + 1`); pair 0 is displaced from the black
/// slots by the synthesized blacks but still backs the selection role.
pub fn assemble(background: Hsl, foreground: Hsl, expanded: &[Hsl]) -> Palette {
    debug_assert!(expanded.len() >= 16, "role table needs 8 expanded pairs");

    let black = synthesize_black(&background);
    let bright_black = black.with_lightness(black.lightness() + 0.1);

    let color_for = |role: Role| -> Hsl {
        match role {
            Role::Background | Role::SelectedText => background,
            Role::Foreground | Role::Bold => foreground,
            Role::Cursor => expanded[2],
            Role::Selection => expanded[0],
            Role::Black => black,
            Role::BrightBlack => bright_black,
            Role::Red => expanded[2],
            Role::BrightRed => expanded[3],
            Role::Green => expanded[4],
            Role::BrightGreen => expanded[5],
            Role::Yellow => expanded[6],
            Role::BrightYellow => expanded[7],
            Role::Blue => expanded[8],
            Role::BrightBlue => expanded[9],
            Role::Magenta => expanded[10],
            Role::BrightMagenta => expanded[11],
            Role::Cyan => expanded[12],
            Role::BrightCyan => expanded[13],
            Role::White => expanded[14],
            Role::BrightWhite => expanded[15],
        }
    };

    Palette {
        entries: Role::ALL
            .iter()
            .map(|role| RoleColor::new(color_for(*role)))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchors() -> Anchors {
        Anchors {
            dark: Hsl::new(0.6, 0.15, 0.12),
            light: Hsl::new(0.1, 0.1, 0.85),
        }
    }

    fn expanded() -> Vec<Hsl> {
        (0..16).map(|i| Hsl::new(i as f32 / 16.0, 0.7, 0.55)).collect()
    }

    #[test]
    fn all_roles_are_covered() {
        assert_eq!(Role::ALL.len(), 22);
        let palette = assemble(anchors().dark, anchors().light, &expanded());
        assert_eq!(palette.iter().count(), 22);
    }

    #[test]
    fn ansi_slots_cover_zero_through_fifteen() {
        let mut slots: Vec<usize> = Role::ALL.iter().filter_map(|r| r.ansi_slot()).collect();
        slots.sort_unstable();
        assert_eq!(slots, (0..16).collect::<Vec<_>>());
        assert_eq!(Role::Background.ansi_slot(), None);
    }

    #[test]
    fn expanded_pairs_land_on_their_slots() {
        let expanded = expanded();
        let palette = assemble(anchors().dark, anchors().light, &expanded);
        assert_eq!(palette.get(Role::Red).hsl, expanded[2]);
        assert_eq!(palette.get(Role::BrightRed).hsl, expanded[3]);
        assert_eq!(palette.get(Role::Cyan).hsl, expanded[12]);
        assert_eq!(palette.get(Role::BrightWhite).hsl, expanded[15]);
        assert_eq!(palette.get(Role::Cursor).hsl, expanded[2]);
        assert_eq!(palette.get(Role::Selection).hsl, expanded[0]);
    }

    #[test]
    fn special_roles_follow_background_and_foreground() {
        let a = anchors();
        let palette = assemble(a.dark, a.light, &expanded());
        assert_eq!(palette.get(Role::Background).hsl, a.dark);
        assert_eq!(palette.get(Role::SelectedText).hsl, a.dark);
        assert_eq!(palette.get(Role::Foreground).hsl, a.light);
        assert_eq!(palette.get(Role::Bold).hsl, a.light);
    }

    #[test]
    fn very_dark_background_lifts_black() {
        let background = Hsl::new(0.0, 0.1, 0.04);
        let palette = assemble(background, anchors().light, &expanded());
        assert!((palette.get(Role::Black).hsl.lightness() - 0.14).abs() < 1e-5);
        assert!((palette.get(Role::BrightBlack).hsl.lightness() - 0.24).abs() < 1e-5);
    }

    #[test]
    fn midtone_background_lowers_black() {
        let background = Hsl::new(0.0, 0.1, 0.3);
        let palette = assemble(background, anchors().light, &expanded());
        assert!((palette.get(Role::Black).hsl.lightness() - 0.2).abs() < 1e-5);
    }

    #[test]
    fn light_background_pins_black_to_fixed_lightness() {
        let background = Hsl::new(0.0, 0.1, 0.9);
        let palette = assemble(background, anchors().light, &expanded());
        assert!((palette.get(Role::Black).hsl.lightness() - 0.2).abs() < 1e-5);
        assert!((palette.get(Role::BrightBlack).hsl.lightness() - 0.3).abs() < 1e-5);
    }

    #[test]
    fn channel_formats_agree() {
        let palette = assemble(anchors().dark, anchors().light, &expanded());
        for (_, entry) in palette.iter() {
            for c in 0..3 {
                assert_eq!(entry.rgb8[c], (entry.rgb[c] * 255.0).round() as u8);
            }
            assert_eq!(
                entry.hex,
                format!("#{:02x}{:02x}{:02x}", entry.rgb8[0], entry.rgb8[1], entry.rgb8[2])
            );
            assert_eq!(entry.hsl.to_rgb8(), entry.rgb8);
        }
    }

    #[test]
    fn resolve_modes() {
        let a = anchors();
        assert_eq!(resolve_background(&a, &BackgroundMode::Auto), (a.dark, a.light));
        assert_eq!(resolve_background(&a, &BackgroundMode::Dark), (a.dark, a.light));
        assert_eq!(resolve_background(&a, &BackgroundMode::Light), (a.light, a.dark));

        let dark_hex = Hsl::new(0.0, 0.0, 0.1);
        let (bg, fg) = resolve_background(&a, &BackgroundMode::Hex(dark_hex));
        assert_eq!(bg, dark_hex);
        assert_eq!(fg, a.light);

        let light_hex = Hsl::new(0.0, 0.0, 0.92);
        let (bg, fg) = resolve_background(&a, &BackgroundMode::Hex(light_hex));
        assert_eq!(bg, light_hex);
        assert_eq!(fg, a.dark);
    }
}

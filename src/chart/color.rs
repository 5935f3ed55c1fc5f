use super::error::PaletteError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn from_hex(hex: &str) -> Result<Self, PaletteError> {
        let invalid = || PaletteError::InvalidColor(hex.to_owned());
        let digits = hex.trim().strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(invalid());
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| invalid())
        };
        Ok(Self(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

const DEFAULT_PALETTE: [Rgb; 13] = [
    Rgb(0xd7, 0x30, 0x27),
    Rgb(0xe3, 0x4a, 0x33),
    Rgb(0xf4, 0x6d, 0x43),
    Rgb(0xfc, 0x8d, 0x59),
    Rgb(0xfd, 0xae, 0x61),
    Rgb(0xfe, 0xe0, 0x8b),
    Rgb(0xff, 0xff, 0xbf),
    Rgb(0xd9, 0xef, 0x8b),
    Rgb(0xa6, 0xd9, 0x6a),
    Rgb(0x66, 0xbd, 0x63),
    Rgb(0x1a, 0x98, 0x50),
    Rgb(0x0f, 0x7a, 0x3d),
    Rgb(0x00, 0x68, 0x37),
];

/// Ordered low → high relevance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_PALETTE.to_vec(),
        }
    }
}

impl Palette {
    pub fn from_hex_list<S: AsRef<str>>(entries: &[S]) -> Result<Self, PaletteError> {
        if entries.is_empty() {
            return Err(PaletteError::Empty);
        }

        let colors = entries
            .iter()
            .map(|entry| Rgb::from_hex(entry.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { colors })
    }

    pub fn steps(&self) -> usize {
        self.colors.len()
    }

    pub fn color_for(&self, raw_score: f64) -> Rgb {
        self.colors[palette_index(normalize_score(raw_score), self.colors.len())]
    }
}

/// Accepts a 0–1 fraction or a 0–100 percentage.
pub fn normalize_score(raw: f64) -> f64 {
    if !raw.is_finite() {
        return 0.0;
    }

    let fraction = if raw > 1.0 { raw / 100.0 } else { raw };
    fraction.clamp(0.0, 1.0)
}

pub fn palette_index(score: f64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    let max_index = len - 1;
    let index = (score * max_index as f64).round();
    if index.is_nan() || index <= 0.0 {
        0
    } else {
        (index as usize).min(max_index)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(0.42, 0.42)]
    #[case(1.0, 1.0)]
    #[case(55.0, 0.55)]
    #[case(100.0, 1.0)]
    #[case(250.0, 1.0)]
    #[case(-3.0, 0.0)]
    #[case(f64::NAN, 0.0)]
    #[case(f64::INFINITY, 0.0)]
    fn normalizes_fractions_and_percentages(#[case] raw: f64, #[case] expected: f64) {
        assert!((normalize_score(raw) - expected).abs() < 1e-12);
    }

    #[test]
    fn index_stays_in_range_for_every_input() {
        let samples = (-50..=250).map(|step| step as f64 * 0.5);
        for raw in samples {
            let index = palette_index(normalize_score(raw), 13);
            assert!(index < 13, "index {index} out of range for {raw}");
        }
    }

    #[rstest]
    #[case(0.0, 0)]
    #[case(0.1, 1)]
    #[case(0.5, 6)]
    #[case(0.9, 11)]
    #[case(1.0, 12)]
    fn rounds_to_nearest_palette_step(#[case] score: f64, #[case] expected: usize) {
        assert_eq!(palette_index(score, 13), expected);
    }

    #[test]
    fn percentage_and_fraction_share_a_color() {
        let palette = Palette::default();
        assert_eq!(palette.steps(), 13);
        assert_eq!(palette.color_for(40.0), palette.color_for(0.4));
    }

    #[test]
    fn parses_custom_palette() {
        let palette = Palette::from_hex_list(&["#000000", "#FFFFFF"]).expect("palette");
        assert_eq!(palette.color_for(0.2), Rgb(0, 0, 0));
        assert_eq!(palette.color_for(0.8), Rgb(255, 255, 255));
    }

    #[rstest]
    #[case("123456")]
    #[case("#12345")]
    #[case("#12345g")]
    #[case("#ééé")]
    fn rejects_malformed_colors(#[case] entry: &str) {
        assert_eq!(
            Palette::from_hex_list(&[entry]),
            Err(PaletteError::InvalidColor(entry.to_owned()))
        );
    }

    #[test]
    fn rejects_empty_palette() {
        let entries: [&str; 0] = [];
        assert_eq!(Palette::from_hex_list(&entries), Err(PaletteError::Empty));
    }
}

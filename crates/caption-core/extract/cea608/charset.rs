//! CEA-608 character sets
//!
//! Cells carry a 3-bit charset selector next to the character code. The
//! basic set is ASCII with a handful of positions replaced by accented
//! letters; the special and extended sets are reached through two-byte
//! control codes upstream and arrive here already tagged.

/// Charset selector stored in the cell attribute word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Charset {
    /// Basic North American set, 0x20-0x7F
    Basic,
    /// Special North American set, 0x30-0x3F
    Special,
    /// Extended Western European: Spanish and French, 0x20-0x3F
    ExtendedSpanishFrench,
    /// Extended Western European: Portuguese and German, 0x20-0x3F
    ExtendedPortugueseGerman,
}

impl Charset {
    /// Decode the selector; unknown values fall back to the basic set
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits {
            1 => Self::Special,
            2 => Self::ExtendedSpanishFrench,
            3 => Self::ExtendedPortugueseGerman,
            _ => Self::Basic,
        }
    }

    /// Selector bits for this charset
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Self::Basic => 0,
            Self::Special => 1,
            Self::ExtendedSpanishFrench => 2,
            Self::ExtendedPortugueseGerman => 3,
        }
    }
}

const SPECIAL: [char; 16] = [
    '®', '°', '½', '¿', '™', '¢', '£', '♪', 'à', ' ', 'è', 'â', 'ê', 'î', 'ô', 'û',
];

const SPANISH_FRENCH: [char; 32] = [
    'Á', 'É', 'Ó', 'Ú', 'Ü', 'ü', '‘', '¡', '*', '\'', '─', '©', '℠', '•', '“', '”', 'À', 'Â',
    'Ç', 'È', 'Ê', 'Ë', 'ë', 'Î', 'Ï', 'ï', 'Ô', 'Ù', 'ù', 'Û', '«', '»',
];

const PORTUGUESE_GERMAN: [char; 32] = [
    'Ã', 'ã', 'Í', 'Ì', 'ì', 'Ò', 'ò', 'Õ', 'õ', '{', '}', '\\', '^', '_', '|', '~', 'Ä', 'ä',
    'Ö', 'ö', 'ß', '¥', '¤', '│', 'Å', 'å', 'Ø', 'ø', '┌', '┐', '└', '┘',
];

/// Map a character code to Unicode; codes outside the set become a space
#[must_use]
pub fn decode(charset: Charset, code: u8) -> char {
    match charset {
        Charset::Basic => decode_basic(code),
        Charset::Special => match code {
            0x30..=0x3F => SPECIAL[usize::from(code - 0x30)],
            _ => ' ',
        },
        Charset::ExtendedSpanishFrench => match code {
            0x20..=0x3F => SPANISH_FRENCH[usize::from(code - 0x20)],
            _ => ' ',
        },
        Charset::ExtendedPortugueseGerman => match code {
            0x20..=0x3F => PORTUGUESE_GERMAN[usize::from(code - 0x20)],
            _ => ' ',
        },
    }
}

fn decode_basic(code: u8) -> char {
    match code {
        0x2A => 'á',
        0x5C => 'é',
        0x5E => 'í',
        0x5F => 'ó',
        0x60 => 'ú',
        0x7B => 'ç',
        0x7C => '÷',
        0x7D => 'Ñ',
        0x7E => 'ñ',
        0x7F => '█',
        0x20..=0x7E => char::from(code),
        _ => ' ',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_substitutions() {
        assert_eq!(decode(Charset::Basic, b'A'), 'A');
        assert_eq!(decode(Charset::Basic, 0x2A), 'á');
        assert_eq!(decode(Charset::Basic, 0x7E), 'ñ');
        assert_eq!(decode(Charset::Basic, 0x10), ' ');
    }

    #[test]
    fn special_and_extended() {
        assert_eq!(decode(Charset::Special, 0x37), '♪');
        assert_eq!(decode(Charset::Special, 0x20), ' ');
        assert_eq!(decode(Charset::ExtendedSpanishFrench, 0x3F), '»');
        assert_eq!(decode(Charset::ExtendedPortugueseGerman, 0x34), 'ß');
    }

    #[test]
    fn selector_round_trip() {
        for bits in 0..4 {
            assert_eq!(Charset::from_bits(bits).bits(), bits);
        }
        assert_eq!(Charset::from_bits(7), Charset::Basic);
    }
}

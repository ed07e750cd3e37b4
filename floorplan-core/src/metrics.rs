//! Advance widths of the PDF base-14 Helvetica faces and WinAnsi encoding.
//!
//! PDF viewers ship these faces, so nothing is embedded; centering a line only
//! needs its width, which comes from the standard AFM metrics (1/1000 em).

use crate::surface::FontFace;
use crate::units::Points;

/// Helvetica widths for `' '..='~'` under WinAnsiEncoding.
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191,
    333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556,
    556, 556, 278, 278, 584, 584, 584, 556,
   1015, 667, 667, 722, 722, 667, 611, 778,
    722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556,
    556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722,
    500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold widths for `' '..='~'` under WinAnsiEncoding.
#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238,
    333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556,
    556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778,
    722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611,
    611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778,
    556, 556, 500, 389, 280, 389, 584,
];

/// Accented Latin-1 letters share the advance of their base letter.
fn fold_accent(c: char) -> Option<char> {
    Some(match c {
        'À'..='Å' => 'A',
        'Ç' => 'C',
        'È'..='Ë' => 'E',
        'Ì'..='Ï' => 'I',
        'Ð' => 'D',
        'Ñ' => 'N',
        'Ò'..='Ö' | 'Ø' => 'O',
        'Ù'..='Ü' => 'U',
        'Ý' => 'Y',
        'Þ' => 'P',
        'à'..='å' => 'a',
        'ç' => 'c',
        'è'..='ë' => 'e',
        'ñ' => 'n',
        'ð' | 'ò'..='ö' | 'ø' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        'þ' => 'p',
        _ => return None,
    })
}

fn ascii_width(c: char, face: FontFace) -> Option<u16> {
    let idx = (c as usize).checked_sub(0x20)?;
    let table = match face {
        FontFace::Regular => &HELVETICA,
        FontFace::Bold => &HELVETICA_BOLD,
    };
    table.get(idx).copied()
}

fn char_width(c: char, face: FontFace) -> u16 {
    let bold = face == FontFace::Bold;
    match c {
        ' '..='~' => ascii_width(c, face).unwrap_or(0),
        'ì'..='ï' => 278,
        'æ' => 889,
        'Æ' => 1000,
        'ß' => 611,
        '¹' | '²' | '³' => 333,
        '°' => 400,
        '±' | '×' | '÷' | '¬' => 584,
        '\u{a0}' | '\u{2009}' | '\u{202f}' | '·' => 278,
        '€' | '–' | '«' | '»' => 556,
        '—' => 1000,
        '•' => 350,
        'µ' => {
            if bold {
                611
            } else {
                556
            }
        }
        '‘' | '’' => {
            if bold {
                278
            } else {
                222
            }
        }
        '“' | '”' => {
            if bold {
                500
            } else {
                333
            }
        }
        _ => fold_accent(c)
            .and_then(|base| ascii_width(base, face))
            // Anything else is replaced by '?' on the page.
            .unwrap_or(if bold { 611 } else { 556 }),
    }
}

/// Rendered width of a single line of text.
pub fn text_width(text: &str, face: FontFace, size: f64) -> Points {
    let units: u32 = text.chars().map(|c| u32::from(char_width(c, face))).sum();
    Points(f64::from(units) * size / 1000.0)
}

/// Encodes text for a simple font using WinAnsiEncoding.
pub fn to_winansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' | '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '\u{2009}' | '\u{202f}' => 0xa0,
            '€' => 0x80,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_are_monospaced() {
        let w = text_width("0123456789", FontFace::Regular, 10.0);
        assert!((w.raw() - 55.6).abs() < 1e-9);
        let b = text_width("0123456789", FontFace::Bold, 10.0);
        assert_eq!(w, b);
    }

    #[test]
    fn area_label_width() {
        // "12.0 m²" = 556*2 + 278 + 556 + 278 + 833 + 333
        let w = text_width("12.0 m²", FontFace::Regular, 8.0);
        assert!((w.raw() - 3390.0 * 8.0 / 1000.0).abs() < 1e-9);
    }

    #[test]
    fn bold_is_wider() {
        let r = text_width("Les Crêts Corniers", FontFace::Regular, 14.0);
        let b = text_width("Les Crêts Corniers", FontFace::Bold, 14.0);
        assert!(b > r);
        assert_eq!(
            text_width("ê", FontFace::Regular, 1.0),
            text_width("e", FontFace::Regular, 1.0)
        );
    }

    #[test]
    fn winansi_encoding() {
        assert_eq!(to_winansi("m²"), vec![b'm', 0xb2]);
        assert_eq!(to_winansi("Crêts"), vec![b'C', b'r', 0xea, b't', b's']);
        assert_eq!(to_winansi("a–b"), vec![b'a', 0x96, b'b']);
        assert_eq!(to_winansi("1\u{202f}m"), vec![b'1', 0xa0, b'm']);
        assert_eq!(to_winansi("日"), vec![b'?']);
        assert!(to_winansi("").is_empty());
    }
}

// Helvetica metrics for the standard 14 fonts. Widths are in 1/1000 em.

const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

const DEFAULT_WIDTH: u16 = 556;

fn char_width(c: char) -> u16 {
    match c {
        ' '..='~' => HELVETICA_ASCII[c as usize - 0x20],
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => 556,
        'é' | 'è' | 'ê' | 'ë' => 556,
        'í' | 'ì' | 'î' | 'ï' => 278,
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 556,
        'ú' | 'ù' | 'û' | 'ü' | 'ñ' => 556,
        'ç' => 500,
        'Á' | 'À' | 'Â' | 'Ä' | 'Ã' | 'É' | 'È' | 'Ê' | 'Ë' => 667,
        'Í' | 'Ì' | 'Î' | 'Ï' => 278,
        'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' => 778,
        'Ú' | 'Ù' | 'Û' | 'Ü' | 'Ñ' | 'Ç' => 722,
        '¿' => 611,
        '¡' => 333,
        '°' => 400,
        'º' => 365,
        'ª' => 370,
        '–' => 556,
        '—' => 1000,
        '‘' | '’' => 222,
        '“' | '”' => 333,
        '€' => 556,
        '\u{a0}' => 278,
        _ => DEFAULT_WIDTH,
    }
}

/// Width of `text` in points at `size`.
pub fn text_width(text: &str, size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| char_width(c) as u32).sum();
    units as f32 * size / 1000.0
}

/// Greedy word wrap. Never yields empty lines; a single word wider than
/// `max_width` gets a line of its own.
pub fn wrap_text(text: &str, max_width: f32, size: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{} {}", current, word);
        if text_width(&candidate, size) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Encode text for a simple font using WinAnsiEncoding.
pub fn encode_winansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            '\t' | '\n' | '\r' => b' ',
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measures_ascii() {
        // "Fecha": F 611 + e 556 + c 500 + h 556 + a 556 = 2779
        assert!((text_width("Fecha", 10.0) - 27.79).abs() < 0.001);
        assert_eq!(text_width("", 10.0), 0.0);
    }

    #[test]
    fn accented_letters_measure_like_their_base() {
        assert_eq!(text_width("ó", 10.0), text_width("o", 10.0));
        assert_eq!(text_width("Ñ", 10.0), text_width("N", 10.0));
    }

    #[test]
    fn wraps_on_width() {
        let lines = wrap_text("Revisión de contrato de arrendamiento comercial", 80.0, 10.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(!line.is_empty());
            if line.contains(' ') {
                assert!(text_width(line, 10.0) <= 80.0);
            }
        }
        assert_eq!(lines.join(" "), "Revisión de contrato de arrendamiento comercial");
    }

    #[test]
    fn wide_word_stands_alone() {
        let lines = wrap_text("a Supercalifragilisticoespialidoso b", 40.0, 10.0);
        assert_eq!(lines, vec!["a", "Supercalifragilisticoespialidoso", "b"]);
    }

    #[test]
    fn blank_text_has_no_lines() {
        assert!(wrap_text("", 100.0, 10.0).is_empty());
        assert!(wrap_text("   ", 100.0, 10.0).is_empty());
    }

    #[test]
    fn encodes_spanish_text() {
        assert_eq!(encode_winansi("Año"), vec![b'A', 0xF1, b'o']);
        assert_eq!(encode_winansi("CÓDIGO:")[1], 0xD3);
        assert_eq!(encode_winansi("a – b"), vec![b'a', b' ', 0x96, b' ', b'b']);
        assert_eq!(encode_winansi("✓"), vec![b'?']);
    }
}

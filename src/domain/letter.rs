/// Letter identifiers: the fixed, ordered set of hub levels.
///
/// Each letter has a stable storage key (ASCII, never reordered) and a
/// display glyph. Position in `ALPHABET` is the level index; the storage
/// key is what lands in the save file.

/// (storage key, display glyph), in level order.
const ALPHABET: [(&str, char); 33] = [
    ("a", 'А'),
    ("be", 'Б'),
    ("ve", 'В'),
    ("ge", 'Г'),
    ("de", 'Д'),
    ("ye", 'Е'),
    ("yo", 'Ё'),
    ("zhe", 'Ж'),
    ("ze", 'З'),
    ("i", 'И'),
    ("short_i", 'Й'),
    ("ka", 'К'),
    ("el", 'Л'),
    ("em", 'М'),
    ("en", 'Н'),
    ("o", 'О'),
    ("pe", 'П'),
    ("er", 'Р'),
    ("es", 'С'),
    ("te", 'Т'),
    ("u", 'У'),
    ("ef", 'Ф'),
    ("kha", 'Х'),
    ("tse", 'Ц'),
    ("che", 'Ч'),
    ("sha", 'Ш'),
    ("shcha", 'Щ'),
    ("hard_sign", 'Ъ'),
    ("yery", 'Ы'),
    ("soft_sign", 'Ь'),
    ("e", 'Э'),
    ("yu", 'Ю'),
    ("ya", 'Я'),
];

pub const LETTER_COUNT: usize = ALPHABET.len();

/// The glyphs in level order, as one string. Used by the spotter games.
pub const GLYPHS: &str = "АБВГДЕЁЖЗИЙКЛМНОПРСТУФХЦЧШЩЪЫЬЭЮЯ";

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct LetterId(u8);

impl LetterId {
    pub fn from_index(index: usize) -> Option<LetterId> {
        if index < LETTER_COUNT {
            Some(LetterId(index as u8))
        } else {
            None
        }
    }

    pub fn from_key(key: &str) -> Option<LetterId> {
        ALPHABET
            .iter()
            .position(|(k, _)| *k == key)
            .map(|i| LetterId(i as u8))
    }

    pub fn from_glyph(glyph: char) -> Option<LetterId> {
        ALPHABET
            .iter()
            .position(|(_, g)| *g == glyph)
            .map(|i| LetterId(i as u8))
    }

    /// All letters in level order.
    pub fn all() -> impl Iterator<Item = LetterId> {
        (0..LETTER_COUNT).map(|i| LetterId(i as u8))
    }

    pub fn first() -> LetterId {
        LetterId(0)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn key(self) -> &'static str {
        ALPHABET[self.index()].0
    }

    pub fn glyph(self) -> char {
        ALPHABET[self.index()].1
    }

    /// The letter unlocked by completing this one.
    pub fn next(self) -> Option<LetterId> {
        LetterId::from_index(self.index() + 1)
    }
}

impl std::fmt::Display for LetterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_unique() {
        let mut keys: Vec<&str> = ALPHABET.iter().map(|(k, _)| *k).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), LETTER_COUNT);
    }

    #[test]
    fn glyph_string_matches_table() {
        let from_table: String = LetterId::all().map(|l| l.glyph()).collect();
        assert_eq!(from_table, GLYPHS);
    }

    #[test]
    fn key_lookup_round_trips_position() {
        for letter in LetterId::all() {
            assert_eq!(LetterId::from_key(letter.key()), Some(letter));
            assert_eq!(LetterId::from_glyph(letter.glyph()), Some(letter));
        }
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert_eq!(LetterId::from_key("omega"), None);
        assert_eq!(LetterId::from_index(LETTER_COUNT), None);
    }

    #[test]
    fn last_letter_has_no_next() {
        let last = LetterId::from_index(LETTER_COUNT - 1).unwrap();
        assert_eq!(last.glyph(), 'Я');
        assert_eq!(last.next(), None);
        assert_eq!(LetterId::first().next().map(|l| l.glyph()), Some('Б'));
    }
}

use rand::{rngs::ThreadRng, Rng};

/// Hangul compatibility jamo: 17 consonants followed by 17 vowels
pub const KOREAN_GLYPHS: [char; 34] = [
    'ㄱ', 'ㄴ', 'ㄷ', 'ㄹ', 'ㅁ', 'ㅂ', 'ㅅ', 'ㅇ', 'ㅈ', 'ㅊ', 'ㅍ', 'ㅌ', 'ㅃ', 'ㅉ', 'ㄸ', 'ㄲ',
    'ㅆ', 'ㅏ', 'ㅑ', 'ㅓ', 'ㅕ', 'ㅗ', 'ㅛ', 'ㅜ', 'ㅠ', 'ㅡ', 'ㅣ', 'ㅐ', 'ㅔ', 'ㅚ', 'ㅟ', 'ㅢ',
    'ㅘ', 'ㅝ',
];

pub const LATIN_GLYPHS: [char; 52] = [
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's',
    't', 'u', 'v', 'w', 'x', 'y', 'z', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L',
    'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum CharCategory {
    Korean,
    Latin,
}

impl CharCategory {
    pub const ALL: [CharCategory; 2] = [CharCategory::Korean, CharCategory::Latin];

    pub fn glyphs(&self) -> &'static [char] {
        match self {
            CharCategory::Korean => &KOREAN_GLYPHS,
            CharCategory::Latin => &LATIN_GLYPHS,
        }
    }

    /// Category a glyph belongs to, or None if it is not in the pool
    pub fn of(c: char) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.glyphs().contains(&c))
    }
}

pub fn is_pool_glyph(c: char) -> bool {
    CharCategory::of(c).is_some()
}

/// Pick a glyph in two stages: a fair coin chooses the category, then a glyph
/// is drawn uniformly within it. Both categories get equal weight even though
/// the Latin set is larger.
pub fn pick_glyph<R: Rng>(rng: &mut R) -> char {
    let category = if rng.gen_bool(0.5) {
        CharCategory::Korean
    } else {
        CharCategory::Latin
    };
    let glyphs = category.glyphs();
    glyphs[rng.gen_range(0..glyphs.len())]
}

/// Source of round targets
pub trait CharPicker {
    fn pick(&mut self) -> char;
}

/// Production picker backed by an rng
#[derive(Debug)]
pub struct RandomPicker<R: Rng> {
    rng: R,
}

impl RandomPicker<ThreadRng> {
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl Default for RandomPicker<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RandomPicker<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> CharPicker for RandomPicker<R> {
    fn pick(&mut self) -> char {
        pick_glyph(&mut self.rng)
    }
}

/// Picker that cycles through a fixed list, for deterministic tests and demos
#[derive(Debug, Clone)]
pub struct ScriptedPicker {
    glyphs: Vec<char>,
    next: usize,
}

impl ScriptedPicker {
    /// Falls back to the first Korean glyph when given an empty script.
    pub fn new(glyphs: impl IntoIterator<Item = char>) -> Self {
        let mut glyphs: Vec<char> = glyphs.into_iter().collect();
        if glyphs.is_empty() {
            glyphs.push(KOREAN_GLYPHS[0]);
        }
        Self { glyphs, next: 0 }
    }
}

impl CharPicker for ScriptedPicker {
    fn pick(&mut self) -> char {
        let c = self.glyphs[self.next % self.glyphs.len()];
        self.next = self.next.wrapping_add(1);
        c
    }
}

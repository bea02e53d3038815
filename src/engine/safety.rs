/// Words that may not suit a children's story.
pub const BANNED_WORDS: [&str; 16] = [
    "violent", "scary", "kill", "murder", "blood", "weapon", "gun", "knife", "die", "death",
    "hate", "fight", "evil", "devil", "terror", "horror",
];

/// Case-insensitive whole-word match. "Eddie" and "obedient" are not hits;
/// "Scary!" is.
///
/// Only used for editor hints. Illustration requests are never blocked on it.
pub fn first_banned_word(text: &str) -> Option<&'static str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .find_map(|word| {
            BANNED_WORDS
                .iter()
                .copied()
                .find(|banned| word.eq_ignore_ascii_case(banned))
        })
}

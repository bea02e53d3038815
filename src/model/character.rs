use std::collections::HashSet;

pub const MAX_CHARACTERS: usize = 5;
pub const MAX_TRAITS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    #[error("You can only create up to {MAX_CHARACTERS} characters")]
    Full,
    #[error("You need at least one character for your story")]
    LastCharacter,
    #[error("Character '{0}' is not in the roster")]
    UnknownCharacter(u32),
    #[error("Character id {0} appears more than once")]
    DuplicateId(u32),
    #[error("A story needs between 1 and {MAX_CHARACTERS} characters, got {0}")]
    InvalidSize(usize),
    #[error("You can only add up to {MAX_TRAITS} traits per character")]
    TooManyTraits,
    #[error("Trait '{0}' is already listed")]
    DuplicateTrait(String),
    #[error("Traits cannot be empty")]
    EmptyTrait,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Character {
    pub id: u32,
    pub name: String,
    pub personality: String,
    traits: Vec<String>,
}

impl Character {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub fn traits(&self) -> &[String] {
        &self.traits
    }

    /// Ready to appear in a story: named, described, and with at least one trait.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.personality.trim().is_empty()
            && !self.traits.is_empty()
    }

    pub fn add_trait(&mut self, raw: &str) -> Result<(), RosterError> {
        let tag = raw.trim();
        if tag.is_empty() {
            return Err(RosterError::EmptyTrait);
        }
        if self.traits.len() >= MAX_TRAITS {
            return Err(RosterError::TooManyTraits);
        }
        if self.traits.iter().any(|t| t == tag) {
            return Err(RosterError::DuplicateTrait(tag.to_string()));
        }

        self.traits.push(tag.to_string());
        Ok(())
    }

    pub fn remove_trait(&mut self, tag: &str) -> bool {
        let before = self.traits.len();
        self.traits.retain(|t| t != tag);
        self.traits.len() != before
    }
}

/// The user's cast. Never empty, never more than [`MAX_CHARACTERS`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    characters: Vec<Character>,
    next_id: u32,
}

impl Default for Roster {
    fn default() -> Self {
        Self {
            characters: vec![Character::new(1)],
            next_id: 2,
        }
    }
}

impl TryFrom<Vec<Character>> for Roster {
    type Error = RosterError;

    fn try_from(characters: Vec<Character>) -> Result<Self, Self::Error> {
        if characters.is_empty() || characters.len() > MAX_CHARACTERS {
            return Err(RosterError::InvalidSize(characters.len()));
        }

        let mut seen = HashSet::new();
        for c in &characters {
            if !seen.insert(c.id) {
                return Err(RosterError::DuplicateId(c.id));
            }
            if c.traits.len() > MAX_TRAITS {
                return Err(RosterError::TooManyTraits);
            }
            if c.traits.iter().any(|t| t.trim().is_empty()) {
                return Err(RosterError::EmptyTrait);
            }
        }

        let next_id = characters.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        Ok(Self { characters, next_id })
    }
}

impl Roster {
    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    /// Field-by-field editing. Traits stay behind [`Character::add_trait`].
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Character> {
        self.characters.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_full(&self) -> bool {
        self.characters.len() >= MAX_CHARACTERS
    }

    pub fn add_character(&mut self) -> Result<u32, RosterError> {
        if self.is_full() {
            return Err(RosterError::Full);
        }

        let id = self.next_id;
        self.next_id += 1;
        self.characters.push(Character::new(id));
        Ok(id)
    }

    pub fn remove_character(&mut self, id: u32) -> Result<Character, RosterError> {
        let index = self
            .characters
            .iter()
            .position(|c| c.id == id)
            .ok_or(RosterError::UnknownCharacter(id))?;

        if self.characters.len() == 1 {
            return Err(RosterError::LastCharacter);
        }

        Ok(self.characters.remove(index))
    }

    pub fn character_mut(&mut self, id: u32) -> Result<&mut Character, RosterError> {
        self.characters
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(RosterError::UnknownCharacter(id))
    }

    pub fn add_trait(&mut self, id: u32, raw: &str) -> Result<(), RosterError> {
        self.character_mut(id)?.add_trait(raw)
    }

    pub fn remove_trait(&mut self, id: u32, tag: &str) -> Result<bool, RosterError> {
        Ok(self.character_mut(id)?.remove_trait(tag))
    }

    pub fn has_complete_character(&self) -> bool {
        self.characters.iter().any(Character::is_complete)
    }

    /// Complete characters in roster order; the first one is the protagonist.
    pub fn complete_characters(&self) -> Vec<Character> {
        self.characters
            .iter()
            .filter(|c| c.is_complete())
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(id: u32, name: &str, traits: &[&str]) -> Character {
        let mut c = Character::new(id);
        c.name = name.into();
        c.personality = "kind".into();
        for t in traits {
            c.add_trait(t).unwrap();
        }
        c
    }

    #[test]
    fn completeness_needs_name_personality_and_trait() {
        let mut c = Character::new(1);
        assert!(!c.is_complete());

        c.name = "Mira".into();
        c.personality = "bold".into();
        assert!(!c.is_complete());

        c.add_trait("brave").unwrap();
        assert!(c.is_complete());

        c.name = "   ".into();
        assert!(!c.is_complete());
    }

    #[test]
    fn roster_is_clamped_between_one_and_five() {
        let mut roster = Roster::default();
        assert_eq!(roster.len(), 1);

        let only = roster.characters()[0].id;
        assert_eq!(roster.remove_character(only), Err(RosterError::LastCharacter));
        assert_eq!(roster.len(), 1);

        for _ in 1..MAX_CHARACTERS {
            roster.add_character().unwrap();
        }
        assert_eq!(roster.len(), MAX_CHARACTERS);
        assert_eq!(roster.add_character(), Err(RosterError::Full));
        assert_eq!(roster.len(), MAX_CHARACTERS);
    }

    #[test]
    fn ids_stay_unique_after_removal() {
        let mut roster = Roster::default();
        let a = roster.add_character().unwrap();
        roster.remove_character(a).unwrap();
        let b = roster.add_character().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn sixth_trait_is_rejected_without_mutation() {
        let mut c = filled(1, "Mira", &["a", "b", "c", "d", "e"]);
        let before = c.clone();

        assert_eq!(c.add_trait("f"), Err(RosterError::TooManyTraits));
        assert_eq!(c, before);
    }

    #[test]
    fn traits_are_trimmed_and_distinct() {
        let mut c = Character::new(1);
        assert_eq!(c.add_trait("   "), Err(RosterError::EmptyTrait));
        c.add_trait("  brave ").unwrap();
        assert_eq!(c.traits(), ["brave".to_string()]);
        assert_eq!(
            c.add_trait("brave"),
            Err(RosterError::DuplicateTrait("brave".into()))
        );
        assert!(c.remove_trait("brave"));
        assert!(c.traits().is_empty());
    }

    #[test]
    fn complete_characters_keep_roster_order() {
        let roster = Roster::try_from(vec![
            Character::new(7),
            filled(3, "Ada", &["smart"]),
            filled(9, "Bo", &["funny"]),
        ])
        .unwrap();

        let names: Vec<_> = roster
            .complete_characters()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["Ada", "Bo"]);
    }

    #[test]
    fn try_from_validates_bounds_and_ids() {
        assert_eq!(Roster::try_from(vec![]), Err(RosterError::InvalidSize(0)));
        assert_eq!(
            Roster::try_from((1..=6).map(Character::new).collect::<Vec<_>>()),
            Err(RosterError::InvalidSize(6))
        );
        assert_eq!(
            Roster::try_from(vec![Character::new(2), Character::new(2)]),
            Err(RosterError::DuplicateId(2))
        );

        let mut roster = Roster::try_from(vec![Character::new(4)]).unwrap();
        assert_eq!(roster.add_character(), Ok(5));
    }

    #[test]
    fn unknown_ids_are_reported() {
        let mut roster = Roster::default();
        assert_eq!(
            roster.add_trait(99, "brave"),
            Err(RosterError::UnknownCharacter(99))
        );
    }
}

/// Resource card kinds held in hand slots.
///
/// `None` is the empty-slot sentinel, not an item: it never stacks, is
/// never granted by terrain, and is skipped by hand-size accounting.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Card {
    Food,
    Wood,
    Weapon,
    Dice,
    Research,
    #[default]
    None,
}

impl Card {
    /// True for concrete cards, false for the empty-slot sentinel.
    pub fn is_some(self) -> bool {
        self != Card::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Weapon".parse::<Card>().unwrap(), Card::Weapon);
        assert_eq!("research".parse::<Card>().unwrap(), Card::Research);
        assert!("sword".parse::<Card>().is_err());
    }
}

//! Hit accumulation and damage math

use super::geom::{Direction, Ticks};

/// Attack/entity element. `Null` attacks have no elemental interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Element {
    #[default]
    Null,
    Fire,
    Aqua,
    Elec,
    Wood,
    Sword,
    Wind,
    Cursor,
    Break,
}

impl Element {
    /// Super-effectiveness doubles incoming damage. Two cycles:
    /// Fire>Wood>Elec>Aqua>Fire and Sword>Wind>Cursor>Break>Sword.
    pub fn is_super_effective_against(self, other: Element) -> bool {
        matches!(
            (self, other),
            (Element::Fire, Element::Wood)
                | (Element::Aqua, Element::Fire)
                | (Element::Elec, Element::Aqua)
                | (Element::Wood, Element::Elec)
                | (Element::Sword, Element::Wind)
                | (Element::Wind, Element::Cursor)
                | (Element::Cursor, Element::Break)
                | (Element::Break, Element::Sword)
        )
    }
}

/// How hard a hit shoves its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragKind {
    #[default]
    None,
    Small,
    Big,
}

/// Damage carried by an attack. `double_damage` is set when the attacker's
/// emotion was consumed at chip use time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Damage {
    pub base: i32,
    pub double_damage: bool,
}

impl Damage {
    pub fn new(base: i32) -> Self {
        Self {
            base,
            double_damage: false,
        }
    }

    pub fn amount(self) -> i32 {
        if self.double_damage {
            self.base * 2
        } else {
            self.base
        }
    }
}

/// Pending hit accumulator. Attacks land here during a tick; the entity
/// resolves the whole record once in its per-tick routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Hit {
    pub total_damage: i32,

    pub flash_time: Ticks,
    pub paralyze_time: Ticks,
    pub confuse_time: Ticks,
    pub blind_time: Ticks,
    pub immobilize_time: Ticks,
    pub freeze_time: Ticks,
    pub bubble_time: Ticks,

    pub flinch: bool,
    pub drag: DragKind,
    pub slide_direction: Direction,
    pub element: Element,
}

impl Hit {
    pub fn add_damage(&mut self, damage: Damage) {
        self.total_damage += damage.amount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn super_effectiveness_cycles() {
        assert!(Element::Fire.is_super_effective_against(Element::Wood));
        assert!(Element::Aqua.is_super_effective_against(Element::Fire));
        assert!(Element::Sword.is_super_effective_against(Element::Wind));
        assert!(!Element::Wood.is_super_effective_against(Element::Fire));
        assert!(!Element::Null.is_super_effective_against(Element::Wood));
        assert!(!Element::Fire.is_super_effective_against(Element::Null));
    }

    #[test]
    fn damage_doubling() {
        assert_eq!(Damage::new(80).amount(), 80);
        let d = Damage {
            base: 80,
            double_damage: true,
        };
        assert_eq!(d.amount(), 160);
    }
}

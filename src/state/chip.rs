//! The static chip catalog
//!
//! A chip is a pure factory: using one consumes the emotion multiplier into
//! a damage record and installs the chip's behavior. No hidden state.

use crate::behaviors::{Behavior, Sword, SwordRange, SwordStyle, WindRack};

use super::hit::Damage;

/// A named attack card
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chip {
    pub index: usize,
    pub name: &'static str,
    pub base_damage: i32,
    pub make_behavior: fn(Damage) -> Behavior,
}

fn sword_short(damage: Damage) -> Behavior {
    Behavior::Sword(Sword {
        damage,
        style: SwordStyle::Sword,
        range: SwordRange::Short,
    })
}

fn sword_wide(damage: Damage) -> Behavior {
    Behavior::Sword(Sword {
        damage,
        style: SwordStyle::Sword,
        range: SwordRange::Wide,
    })
}

fn sword_long(damage: Damage) -> Behavior {
    Behavior::Sword(Sword {
        damage,
        style: SwordStyle::Sword,
        range: SwordRange::Long,
    })
}

fn blade_wide(damage: Damage) -> Behavior {
    Behavior::Sword(Sword {
        damage,
        style: SwordStyle::Blade,
        range: SwordRange::Wide,
    })
}

fn blade_long(damage: Damage) -> Behavior {
    Behavior::Sword(Sword {
        damage,
        style: SwordStyle::Blade,
        range: SwordRange::Long,
    })
}

fn wind_rack(damage: Damage) -> Behavior {
    Behavior::WindRack(WindRack { damage })
}

pub const SWORD: Chip = Chip {
    index: 70,
    name: "Sword",
    base_damage: 80,
    make_behavior: sword_short,
};

pub const WIDE_SWRD: Chip = Chip {
    index: 71,
    name: "WideSwrd",
    base_damage: 80,
    make_behavior: sword_wide,
};

pub const LONG_SWRD: Chip = Chip {
    index: 72,
    name: "LongSwrd",
    base_damage: 100,
    make_behavior: sword_long,
};

pub const WIDE_BLDE: Chip = Chip {
    index: 73,
    name: "WideBlde",
    base_damage: 150,
    make_behavior: blade_wide,
};

pub const LONG_BLDE: Chip = Chip {
    index: 74,
    name: "LongBlde",
    base_damage: 150,
    make_behavior: blade_long,
};

pub const WIND_RACK: Chip = Chip {
    index: 75,
    name: "WindRack",
    base_damage: 140,
    make_behavior: wind_rack,
};

/// Every chip, indexable by catalog position
pub const CATALOG: [Chip; 6] = [SWORD, WIDE_SWRD, LONG_SWRD, WIDE_BLDE, LONG_BLDE, WIND_RACK];

/// Look a chip up by its catalog index
pub fn by_index(index: usize) -> Option<&'static Chip> {
    CATALOG.iter().find(|c| c.index == index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behaviors::Behavior;

    #[test]
    fn catalog_lookup() {
        assert_eq!(by_index(70).unwrap().name, "Sword");
        assert_eq!(by_index(74).unwrap().base_damage, 150);
        assert!(by_index(999).is_none());
    }

    #[test]
    fn factories_forward_damage() {
        let damage = Damage {
            base: 80,
            double_damage: true,
        };
        match (SWORD.make_behavior)(damage) {
            Behavior::Sword(sword) => assert_eq!(sword.damage.amount(), 160),
            other => panic!("unexpected behavior {other:?}"),
        }
    }
}

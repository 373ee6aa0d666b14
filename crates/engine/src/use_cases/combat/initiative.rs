//! Initiative system: rolling, ordering and next-turn selection.

use lorekeep_domain::{Combatant, Stat};

use crate::infrastructure::ports::RandomPort;

/// Initiative penalty applied to the player when enemies ambush.
pub const AMBUSH_PENALTY: i32 = 10;

/// `d20 + dexterity modifier`, minus the ambush penalty for a surprised
/// player.
pub fn roll_initiative(combatant: &Combatant, is_ambush: bool, random: &dyn RandomPort) -> i32 {
    let roll = random.gen_range(1, 20);
    let modifier = combatant.attributes.modifier(Stat::Dexterity);
    let penalty = if is_ambush && combatant.is_player {
        AMBUSH_PENALTY
    } else {
        0
    };
    roll + modifier - penalty
}

/// Roll for everyone and sort descending. The sort is stable, so ties keep
/// insertion order (player first, then enemies as requested).
pub fn order_by_initiative(
    mut combatants: Vec<Combatant>,
    is_ambush: bool,
    random: &dyn RandomPort,
) -> Vec<Combatant> {
    for combatant in combatants.iter_mut() {
        combatant.initiative = roll_initiative(combatant, is_ambush, random);
    }
    combatants.sort_by(|a, b| b.initiative.cmp(&a.initiative));
    combatants
}

/// Next index after `current` holding a combatant that can act, scanning
/// forward and wrapping. The current slot is considered last.
pub fn next_actionable_index(turn_order: &[Combatant], current: usize) -> Option<usize> {
    let len = turn_order.len();
    (1..=len)
        .map(|offset| (current + offset) % len)
        .find(|&idx| turn_order[idx].can_act && turn_order[idx].is_alive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::{FixedRandom, SequenceRandom};
    use crate::use_cases::combat::test_support::combatant;

    #[test]
    fn ties_keep_insertion_order() {
        let order = order_by_initiative(
            vec![
                combatant("pc", true, 100),
                combatant("enemy_0_goblin", false, 20),
                combatant("enemy_1_wolf", false, 20),
            ],
            false,
            &FixedRandom(0.5, 10),
        );
        let ids: Vec<_> = order.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["pc", "enemy_0_goblin", "enemy_1_wolf"]);
        assert!(order.iter().all(|c| c.initiative == 10));
    }

    #[test]
    fn higher_roll_goes_first() {
        let order = order_by_initiative(
            vec![combatant("pc", true, 100), combatant("enemy_0_goblin", false, 20)],
            false,
            &SequenceRandom::new(&[], &[5, 17]),
        );
        assert_eq!(order[0].id, "enemy_0_goblin");
        assert_eq!(order[0].initiative, 17);
    }

    #[test]
    fn dexterity_modifier_applies() {
        let mut nimble = combatant("pc", true, 100);
        nimble.attributes.dexterity = 15;
        assert_eq!(roll_initiative(&nimble, false, &FixedRandom(0.5, 10)), 12);
        nimble.attributes.dexterity = 7;
        assert_eq!(roll_initiative(&nimble, false, &FixedRandom(0.5, 10)), 8);
    }

    #[test]
    fn ambush_penalises_only_the_player() {
        let rng = FixedRandom(0.5, 10);
        assert_eq!(roll_initiative(&combatant("pc", true, 100), true, &rng), 0);
        assert_eq!(
            roll_initiative(&combatant("enemy_0_goblin", false, 20), true, &rng),
            10
        );
    }

    #[test]
    fn next_index_skips_fallen_and_wraps() {
        let mut order = vec![
            combatant("pc", true, 100),
            combatant("a", false, 10),
            combatant("b", false, 10),
        ];
        order[1].knock_out();
        assert_eq!(next_actionable_index(&order, 0), Some(2));
        assert_eq!(next_actionable_index(&order, 2), Some(0));

        order[2].knock_out();
        assert_eq!(next_actionable_index(&order, 0), Some(0));

        order[0].knock_out();
        assert_eq!(next_actionable_index(&order, 0), None);
    }
}

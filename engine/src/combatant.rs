use serde::{Deserialize, Serialize};

/// Combat-session state shared by characters and monsters. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Vitals {
    pub max_hp: i32,
    pub current_hp: i32,
    pub turn_slot: Option<usize>,
    pub targeted: bool,
}

impl Vitals {
    pub fn new(max_hp: i32) -> Self {
        Self {
            max_hp,
            current_hp: max_hp,
            turn_slot: None,
            targeted: false,
        }
    }

    /// Reset both maximum and current HP.
    pub fn reset(&mut self, max_hp: i32) {
        self.max_hp = max_hp.max(0);
        self.current_hp = self.max_hp;
    }

    /// Current HP always lands in `[0, max_hp]`.
    pub fn set_hp(&mut self, hp: i32) {
        self.current_hp = hp.clamp(0, self.max_hp.max(0));
    }

    /// Apply damage. Returns true if this call dropped the holder to 0 HP.
    pub fn apply_damage(&mut self, dmg: i32) -> bool {
        let before = self.current_hp;
        self.set_hp(before - dmg.max(0));
        before > 0 && self.current_hp == 0
    }

    /// Heal up to the maximum. Returns the HP actually gained.
    pub fn heal(&mut self, amount: i32) -> i32 {
        if amount <= 0 {
            return 0;
        }
        let before = self.current_hp;
        self.set_hp(before + amount);
        self.current_hp - before
    }

    pub fn is_conscious(&self) -> bool {
        self.current_hp > 0
    }
}

/// Read/write surface the scheduler and round engine use for both sides.
pub trait Combatant {
    fn name(&self) -> &str;
    fn vitals(&self) -> &Vitals;
    fn vitals_mut(&mut self) -> &mut Vitals;
    fn initiative(&self) -> i32;
    fn set_initiative(&mut self, initiative: i32);

    fn current_hp(&self) -> i32 {
        self.vitals().current_hp
    }

    fn max_hp(&self) -> i32 {
        self.vitals().max_hp
    }

    fn is_conscious(&self) -> bool {
        self.vitals().is_conscious()
    }

    fn turn_slot(&self) -> Option<usize> {
        self.vitals().turn_slot
    }

    fn set_turn_slot(&mut self, slot: usize) {
        self.vitals_mut().turn_slot = Some(slot);
    }

    fn is_targeted(&self) -> bool {
        self.vitals().targeted
    }

    fn set_targeted(&mut self, targeted: bool) {
        self.vitals_mut().targeted = targeted;
    }

    /// Damage the combatant and mark it as targeted.
    fn take_hit(&mut self, dmg: i32) -> bool {
        let vitals = self.vitals_mut();
        vitals.targeted = true;
        vitals.apply_damage(dmg)
    }
}

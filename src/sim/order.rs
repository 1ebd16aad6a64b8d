//! Level-gated order generation
//!
//! Orders get busier as levels climb: flavored dough from level 2, guaranteed
//! sprinkles from level 3. Draws happen in a fixed sequence so a scripted
//! random source can pin every branch.

use rand::Rng;

use super::donut::{DonutConfig, DoughFlavor, Filling, Shape, Sprinkles, Topping};

/// Chance threshold above which a flavored dough is rolled (level 2+)
pub const DOUGH_ROLL_THRESHOLD: f64 = 0.5;
/// Chance threshold above which a topping is rolled
pub const TOPPING_ROLL_THRESHOLD: f64 = 0.3;
/// Chance threshold above which a rolled filling is dropped again
pub const FILLING_DROP_THRESHOLD: f64 = 0.8;
/// Chance threshold above which sprinkles are added below level 3
pub const SPRINKLES_ROLL_THRESHOLD: f64 = 0.6;

/// Random source for order generation
pub trait OrderDice {
    /// Uniform draw in `[0, 1)`
    fn chance(&mut self) -> f64;
    /// Uniform index in `0..n`
    fn pick(&mut self, n: usize) -> usize;
}

impl<R: Rng + ?Sized> OrderDice for R {
    fn chance(&mut self) -> f64 {
        self.random::<f64>()
    }

    fn pick(&mut self, n: usize) -> usize {
        self.random_range(0..n)
    }
}

/// Generate the target donut for `level`
pub fn generate_order<D: OrderDice + ?Sized>(level: u32, dice: &mut D) -> DonutConfig {
    let shape = Shape::ALL[dice.pick(Shape::ALL.len())];

    let mut dough = DoughFlavor::Classic;
    if level > 1 && dice.chance() > DOUGH_ROLL_THRESHOLD {
        dough = DoughFlavor::ALL[dice.pick(DoughFlavor::ALL.len())];
    }

    let mut topping = Topping::None;
    if dice.chance() > TOPPING_ROLL_THRESHOLD {
        topping = Topping::ALL[dice.pick(Topping::ALL.len())];
    }

    let mut filling = Filling::None;
    if shape == Shape::Filled {
        // Skip index 0 (None) so a filled order starts out with a real filling
        filling = Filling::ALL[dice.pick(Filling::ALL.len() - 1) + 1];
        if dice.chance() > FILLING_DROP_THRESHOLD {
            filling = Filling::None;
        }
    }

    let mut sprinkles = Sprinkles::None;
    if level > 2 || dice.chance() > SPRINKLES_ROLL_THRESHOLD {
        sprinkles = Sprinkles::ALL[dice.pick(Sprinkles::ALL.len())];
        if sprinkles == Sprinkles::None {
            sprinkles = Sprinkles::Rainbow;
        }
    }

    DonutConfig {
        shape,
        dough,
        topping,
        sprinkles,
        filling,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::VecDeque;

    /// Replays a fixed script of draws; panics if the generator asks for a
    /// draw of the wrong kind or more draws than scripted.
    #[derive(Debug, Default)]
    pub(crate) struct ScriptedDice {
        draws: VecDeque<Draw>,
    }

    #[derive(Debug, Clone, Copy)]
    pub(crate) enum Draw {
        Chance(f64),
        Pick(usize),
    }

    impl ScriptedDice {
        pub(crate) fn new(draws: &[Draw]) -> Self {
            Self {
                draws: draws.iter().copied().collect(),
            }
        }

        pub(crate) fn is_exhausted(&self) -> bool {
            self.draws.is_empty()
        }
    }

    impl OrderDice for ScriptedDice {
        fn chance(&mut self) -> f64 {
            match self.draws.pop_front() {
                Some(Draw::Chance(v)) => v,
                other => panic!("expected chance draw, got {:?}", other),
            }
        }

        fn pick(&mut self, n: usize) -> usize {
            match self.draws.pop_front() {
                Some(Draw::Pick(i)) => {
                    assert!(i < n, "scripted pick {} out of range 0..{}", i, n);
                    i
                }
                other => panic!("expected pick draw, got {:?}", other),
            }
        }
    }

    use Draw::{Chance, Pick};

    #[test]
    fn test_level_one_plain_ring() {
        // ring, topping skipped (0.3 is not > 0.3), sprinkles skipped
        let mut dice = ScriptedDice::new(&[Pick(0), Chance(0.3), Chance(0.6)]);
        let order = generate_order(1, &mut dice);
        assert_eq!(order, DonutConfig::INITIAL);
        assert!(dice.is_exhausted());
    }

    #[test]
    fn test_level_one_never_rolls_dough() {
        // No dough draw is consumed on level 1
        let mut dice = ScriptedDice::new(&[Pick(1), Chance(0.9), Pick(2), Pick(0), Chance(0.1), Chance(0.1)]);
        let order = generate_order(1, &mut dice);
        assert_eq!(order.shape, Shape::Filled);
        assert_eq!(order.dough, DoughFlavor::Classic);
        assert_eq!(order.topping, Topping::PinkGlaze);
        assert_eq!(order.filling, Filling::Strawberry);
        assert_eq!(order.sprinkles, Sprinkles::None);
        assert!(dice.is_exhausted());
    }

    #[test]
    fn test_filled_filling_can_drop_back_to_none() {
        let mut dice = ScriptedDice::new(&[
            Pick(1),     // filled
            Chance(0.7), // dough rolled
            Pick(3),     // matcha
            Chance(0.2), // no topping
            Pick(4),     // lemon
            Chance(0.81), // dropped
            Chance(0.0), // no sprinkles
        ]);
        let order = generate_order(2, &mut dice);
        assert_eq!(order.dough, DoughFlavor::Matcha);
        assert_eq!(order.topping, Topping::None);
        assert_eq!(order.filling, Filling::None);
        assert_eq!(order.sprinkles, Sprinkles::None);
        assert!(dice.is_exhausted());
    }

    #[test]
    fn test_level_three_forces_sprinkles_without_chance_draw() {
        // Sprinkle pick lands on None and is remapped to Rainbow
        let mut dice = ScriptedDice::new(&[Pick(0), Chance(0.4), Chance(0.5), Pick(0)]);
        let order = generate_order(3, &mut dice);
        assert_eq!(order.dough, DoughFlavor::Classic);
        assert_eq!(order.topping, Topping::None);
        assert_eq!(order.sprinkles, Sprinkles::Rainbow);
        assert!(dice.is_exhausted());
    }

    #[test]
    fn test_sprinkles_pick_kept_when_not_none() {
        let mut dice = ScriptedDice::new(&[Pick(0), Chance(0.0), Chance(0.61), Pick(4)]);
        let order = generate_order(1, &mut dice);
        assert_eq!(order.sprinkles, Sprinkles::Gold);
    }

    #[test]
    fn test_classic_dough_frequency_above_level_one() {
        // 50% skip the roll, and the roll itself lands on Classic 1 time in 4
        let mut rng = Pcg32::seed_from_u64(7);
        let samples = 20_000;
        let classic = (0..samples)
            .filter(|_| generate_order(4, &mut rng).dough == DoughFlavor::Classic)
            .count();
        let ratio = classic as f64 / samples as f64;
        assert!((ratio - 0.625).abs() < 0.02, "classic ratio {}", ratio);
    }

    #[test]
    fn test_level_one_is_always_classic() {
        let mut rng = Pcg32::seed_from_u64(99);
        for _ in 0..1_000 {
            assert_eq!(generate_order(1, &mut rng).dough, DoughFlavor::Classic);
        }
    }

    #[test]
    fn test_sprinkles_always_present_from_level_three() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..1_000 {
            assert_ne!(generate_order(3, &mut rng).sprinkles, Sprinkles::None);
        }
    }

    #[test]
    fn test_same_seed_same_orders() {
        let mut a = Pcg32::seed_from_u64(2024);
        let mut b = Pcg32::seed_from_u64(2024);
        for level in 1..20 {
            assert_eq!(generate_order(level, &mut a), generate_order(level, &mut b));
        }
    }

    proptest! {
        #[test]
        fn prop_rings_never_have_filling(seed in any::<u64>(), level in 1u32..30) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let order = generate_order(level, &mut rng);
            if order.shape == Shape::Ring {
                prop_assert_eq!(order.filling, Filling::None);
            }
            prop_assert!(order.is_consistent());
        }
    }
}

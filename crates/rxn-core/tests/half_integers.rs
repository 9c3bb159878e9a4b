use proptest::prelude::*;
use rxn_core::{spin_projections, HalfInteger, Parity, Spin};

proptest! {
    #[test]
    fn projections_are_ascending_and_symmetric(doubled in 0i32..16) {
        let magnitude = HalfInteger::from_doubled(doubled);
        let projections = spin_projections(magnitude);
        prop_assert_eq!(projections.len() as i32, doubled + 1);
        prop_assert!(projections.windows(2).all(|pair| pair[0] < pair[1]));
        let total: HalfInteger = projections.iter().copied().sum();
        prop_assert_eq!(total, HalfInteger::ZERO);
        for projection in projections {
            prop_assert!(Spin::new(magnitude, projection).is_ok());
        }
    }

    #[test]
    fn float_and_fraction_spellings_agree(doubled in -20i32..20) {
        let from_float = HalfInteger::try_from(f64::from(doubled) / 2.0).unwrap();
        let from_text: HalfInteger = format!("{doubled}/2").parse().unwrap();
        prop_assert_eq!(from_float, from_text);
        prop_assert_eq!(from_float.doubled(), doubled);
    }
}

#[test]
fn integral_spellings_are_equal() {
    let a: HalfInteger = "1".parse().unwrap();
    let b: HalfInteger = "2/2".parse().unwrap();
    let c = HalfInteger::try_from(1.0).unwrap();
    assert_eq!(a, b);
    assert_eq!(b, c);
    assert!(HalfInteger::try_from(0.25).is_err());
}

#[test]
fn spin_rejects_unreachable_projection() {
    assert!(Spin::new(HalfInteger::ONE, HalfInteger::HALF).is_err());
    assert!(Spin::new(HalfInteger::HALF, HalfInteger::from_doubled(3)).is_err());
}

#[test]
fn parity_products() {
    assert_eq!(Parity::product([Parity::Minus; 3]), Parity::Minus);
    assert_eq!(Parity::from_exponent(-3), Parity::Minus);
    assert_eq!(Parity::from_half_exponent(HalfInteger::HALF), None);
    assert_eq!(-Parity::Plus, Parity::Minus);
}

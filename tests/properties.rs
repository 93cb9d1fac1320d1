use mmcq::color_box::Axis;
use mmcq::{ColorBox, Histogram, QuantizeConfig, QuantizeError, SplitOutcome};
use proptest::prelude::*;

fn samples_strategy(max_len: usize) -> impl Strategy<Value = Vec<rgb::RGBA<u8>>> {
    prop::collection::vec(
        (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(r, g, b)| rgb::RGBA { r, g, b, a: 255 }),
        1..max_len,
    )
}

/// A box anywhere in the 5-bit cube.
fn box_strategy() -> impl Strategy<Value = ColorBox> {
    (
        prop::array::uniform3(0u8..32),
        prop::array::uniform3(0u8..32),
    )
        .prop_map(|(a, b)| ColorBox::new(a, b))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // Both children non-empty, mass conserved, gap-free partition of one axis.
    #[test]
    fn prop_split_partitions_parent(samples in samples_strategy(300), parent in box_strategy()) {
        let hist = Histogram::from_samples(&samples, 5).unwrap();
        let population = parent.population(&hist);

        match mmcq::split(&parent, &hist) {
            SplitOutcome::Unsplittable => {
                prop_assert!(population != 1);
            }
            SplitOutcome::SinglePixel(leaf) => {
                prop_assert_eq!(population, 1);
                prop_assert_eq!(leaf, parent);
            }
            SplitOutcome::Split(first, second) => {
                let p1 = first.population(&hist);
                let p2 = second.population(&hist);
                prop_assert!(p1 >= 1 && p2 >= 1, "empty child: {} / {}", p1, p2);
                prop_assert_eq!(p1 + p2, population);
                prop_assert_eq!(first.volume() + second.volume(), parent.volume());

                let split_axes: Vec<Axis> = Axis::ALL
                    .into_iter()
                    .filter(|a| first.min()[a.index()] != second.min()[a.index()])
                    .collect();
                prop_assert_eq!(split_axes.len(), 1);
                let i = split_axes[0].index();
                prop_assert_eq!(first.min()[i], parent.min()[i]);
                prop_assert_eq!(first.max()[i] + 1, second.min()[i]);
                prop_assert_eq!(second.max()[i], parent.max()[i]);
                for j in (0..3).filter(|&j| j != i) {
                    prop_assert_eq!(first.min()[j], parent.min()[j]);
                    prop_assert_eq!(first.max()[j], parent.max()[j]);
                    prop_assert_eq!(second.min()[j], parent.min()[j]);
                    prop_assert_eq!(second.max()[j], parent.max()[j]);
                }
            }
        }
    }

    #[test]
    fn prop_quantize_conserves_mass(samples in samples_strategy(400), max_colors in 2u32..=32) {
        let config = QuantizeConfig::new().max_colors(max_colors);
        match mmcq::quantize(&samples, &config) {
            Ok(map) => {
                prop_assert!(!map.is_empty());
                prop_assert!(map.len() <= max_colors as usize);
                let total: u64 = map.entries().map(|e| e.population).sum();
                prop_assert_eq!(total, samples.len() as u64);
            }
            Err(QuantizeError::InsufficientColors { distinct, .. }) => {
                prop_assert!(distinct <= max_colors as usize);
            }
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }

    #[test]
    fn prop_classify_is_total(
        samples in samples_strategy(300),
        queries in samples_strategy(50),
        max_colors in 2u32..=16,
    ) {
        let config = QuantizeConfig::new().max_colors(max_colors);
        if let Ok(map) = mmcq::quantize(&samples, &config) {
            for query in queries {
                let index = map.classify_index(query);
                prop_assert!(index < map.len());
                prop_assert_eq!(map.classify(query), map.palette()[index]);
            }
        }
    }

    #[test]
    fn prop_deterministic(samples in samples_strategy(300), max_colors in 2u32..=16) {
        let config = QuantizeConfig::new().max_colors(max_colors);
        let a = mmcq::quantize(&samples, &config);
        let b = mmcq::quantize(&samples, &config);
        match (a, b) {
            (Ok(a), Ok(b)) => prop_assert!(a.entries().eq(b.entries())),
            (Err(_), Err(_)) => {}
            _ => prop_assert!(false, "runs disagree"),
        }
    }
}

/**
 * Order-randomizing transform over a slice.
 */
use rand::Rng;


/// Return a uniformly random permutation of `items`, leaving `items` untouched.
///
/// This is the Fisher-Yates shuffle: walk `i` from the last index down to 1, and swap
/// position `i` with a position drawn uniformly from `0..=i`.
pub fn shuffled<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    let mut i = out.len();
    while i > 1 {
        i -= 1;
        let j = rng.gen_range(0..=i);
        out.swap(i, j);
    }
    out
}


#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn output_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        let input: Vec<u32> = (0..50).collect();
        for _ in 0..20 {
            let mut output = shuffled(&input, &mut rng);
            assert_eq!(output.len(), input.len());
            output.sort();
            assert_eq!(output, input);
        }
    }

    #[test]
    fn input_is_left_alone() {
        let mut rng = StdRng::seed_from_u64(1);
        let input = vec!["a", "b", "c", "d"];
        let _ = shuffled(&input, &mut rng);
        assert_eq!(input, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn short_inputs_come_back_unchanged() {
        let mut rng = StdRng::seed_from_u64(3);
        let empty: Vec<u8> = Vec::new();
        assert_eq!(shuffled(&empty, &mut rng), empty);
        assert_eq!(shuffled(&[42], &mut rng), vec![42]);
    }

    #[test]
    fn positions_are_roughly_uniform() {
        let mut rng = StdRng::seed_from_u64(2024);
        let input = [0usize, 1, 2, 3];
        let trials = 40_000;
        // counts[element][position]
        let mut counts = [[0u32; 4]; 4];
        for _ in 0..trials {
            for (pos, &elem) in shuffled(&input, &mut rng).iter().enumerate() {
                counts[elem][pos] += 1;
            }
        }

        let expected = trials as f64 / 4.0;
        for row in counts.iter() {
            for &count in row.iter() {
                let deviation = (count as f64 - expected).abs() / expected;
                assert!(deviation < 0.05, "count {} too far from {}", count, expected);
            }
        }
    }
}

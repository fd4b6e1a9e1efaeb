use rand::Rng;
use rust_decimal::Decimal;
use tender_pricing::domain::reduction::reduce;
use tender_pricing::domain::rounding::{RoundingMode, RoundingPolicy, round_price};

const ROUNDS: usize = 500;

fn money(rng: &mut impl Rng, max_cents: i64) -> Decimal {
    Decimal::new(rng.gen_range(1..=max_cents), 2)
}

#[test]
fn test_reduce_never_crosses_floor() {
    let mut rng = rand::thread_rng();
    for _ in 0..ROUNDS {
        let start = money(&mut rng, 500_000_000);
        let floor = money(&mut rng, 500_000_000);
        let step = Decimal::new(rng.gen_range(1..=300), 4);

        let result = reduce(start, step, floor);
        if floor > start {
            assert!(result.steps.is_empty());
            assert_eq!(result.final_price, start);
            continue;
        }
        assert!(result.final_price >= floor, "{start} {step} {floor}");
        assert!(result.final_price * (Decimal::ONE - step) < floor);
        assert!(result.steps.windows(2).all(|w| w[1] < w[0]));
        assert_eq!(result.steps.last().copied().unwrap_or(start), result.final_price);
    }
}

#[test]
fn test_reduce_is_idempotent_once_at_floor() {
    let mut rng = rand::thread_rng();
    for _ in 0..ROUNDS {
        let start = money(&mut rng, 200_000_000);
        let floor = start * Decimal::new(rng.gen_range(50..=100), 2);
        let step = Decimal::new(rng.gen_range(5..=250), 4);

        let first = reduce(start, step, floor);
        let again = reduce(first.final_price, step, floor);
        assert!(again.steps.is_empty());
        assert_eq!(again.final_price, first.final_price);
    }
}

#[test]
fn test_rounding_is_idempotent_and_bounded() {
    let mut rng = rand::thread_rng();
    let granularities = [Decimal::ONE, Decimal::TEN, Decimal::ONE_HUNDRED, Decimal::ONE_THOUSAND];
    for _ in 0..ROUNDS {
        let price = money(&mut rng, 1_000_000_000);
        let round_to = granularities[rng.gen_range(0..granularities.len())];
        for mode in [RoundingMode::Nearest, RoundingMode::Up, RoundingMode::Down] {
            let policy = RoundingPolicy::new("p", "r", round_to, mode);
            let once = round_price(price, &policy);

            assert_eq!(round_price(once, &policy), once);
            assert!((once - price).abs() <= round_to);
            match mode {
                RoundingMode::Up => assert!(once >= price),
                RoundingMode::Down => assert!(once <= price),
                RoundingMode::Nearest => assert!((once - price).abs() * Decimal::TWO <= round_to),
            }
        }
    }
}

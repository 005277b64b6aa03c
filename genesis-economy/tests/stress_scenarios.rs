use genesis_economy::{
    EconomyState, NotableEvent, Shock, ShockSchedule, SimulationConfig, SimulationRun, Strategy,
    Verdict, compare_strategies, simulate,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

fn stress_schedule() -> ShockSchedule {
    ShockSchedule::new(vec![
        Shock::gold_rush(100, 5.0),
        Shock::whale_deposit(150, 2_000_000.0),
    ])
    .unwrap()
}

fn stress_config() -> SimulationConfig {
    SimulationConfig::default().with_shocks(stress_schedule())
}

#[test]
fn supply_never_goes_negative_under_random_flows() {
    let mut rng = ChaCha20Rng::seed_from_u64(0x6e65_7369_73);
    for _ in 0..32 {
        let start_tax = rng.gen_range(0.0..=1.0);
        let mut economy = EconomyState::new(rng.gen_range(1.0..1_000_000.0), start_tax).unwrap();
        for _ in 0..200 {
            if rng.gen_bool(0.4) {
                economy.inject(rng.gen_range(-50_000.0..50_000.0));
            } else {
                let volume = rng.gen_range(0.0..5_000_000.0);
                let before = economy.money_supply();
                let burned = economy.burn(volume);
                assert!(burned >= 0.0);
                assert!(burned <= before);
            }
            assert!(economy.money_supply() >= 0.0);
        }
    }
}

#[test]
fn laissez_faire_ten_days_follows_exact_burn_arithmetic() {
    let config = SimulationConfig::new(Strategy::LaissezFaire).with_days(10);
    let base_income = config.base_income;
    let mut run = SimulationRun::new(config).unwrap();
    let mut before = run.state().money_supply();
    while let Some(record) = run.tick(&mut ()) {
        let in_circulation = before + base_income;
        let expected = in_circulation - 0.20 * 0.05 * in_circulation;
        assert!((record.money_supply - expected).abs() < 1e-6);
        assert!(record.money_supply < before);
        assert!((record.tax_rate - 0.05).abs() < f64::EPSILON);
        before = record.money_supply;
    }
    assert_eq!(run.records().len(), 10);
}

#[test]
fn tax_rate_stays_in_bounds_through_the_stress_test() {
    for strategy in Strategy::ALL {
        let outcome = simulate(stress_config().with_strategy(strategy), &mut ()).unwrap();
        assert_eq!(outcome.records.len(), 365);
        for record in &outcome.records {
            assert!(record.money_supply >= 0.0);
            match strategy.bounds() {
                Some(bounds) => assert!(
                    bounds.contains(record.tax_rate),
                    "{strategy} left its range on day {}",
                    record.day
                ),
                None => assert!((record.tax_rate - 0.05).abs() < f64::EPSILON),
            }
        }
    }
}

#[test]
fn hawk_contains_the_whale_better_than_no_regulation() {
    let outcomes = compare_strategies(
        &stress_config(),
        &[Strategy::LaissezFaire, Strategy::Hawk],
        &mut (),
    )
    .unwrap();
    let (laissez, hawk) = (&outcomes[0], &outcomes[1]);
    assert_eq!(hawk.verdict, Verdict::Success);
    assert!(hawk.peak_money_supply() < laissez.peak_money_supply());
    assert!(hawk.peak_tax_rate() > 0.05);
}

#[test]
fn dove_lets_the_gold_rush_run_hot() {
    let outcome = simulate(stress_config().with_strategy(Strategy::Dove), &mut ()).unwrap();
    assert_eq!(outcome.verdict, Verdict::Failure);
    let last = outcome.last_record().unwrap();
    assert!(last.money_supply > 1.5 * last.inflation_target);
}

#[test]
fn comparison_runs_are_independent() {
    let config = stress_config();
    let compared = compare_strategies(&config, &Strategy::ALL, &mut ()).unwrap();
    for (strategy, outcome) in Strategy::ALL.into_iter().zip(&compared) {
        let alone = simulate(config.clone().with_strategy(strategy), &mut ()).unwrap();
        assert_eq!(&alone, outcome);
    }
}

#[test]
fn stress_events_reach_the_listener_once_per_run() {
    let mut events: Vec<NotableEvent> = Vec::new();
    let _ = compare_strategies(&stress_config(), &[Strategy::Dove, Strategy::Balanced], &mut events)
        .unwrap();
    let impulses = events
        .iter()
        .filter(|event| matches!(event, NotableEvent::Impulse { day: 150, .. }))
        .count();
    assert_eq!(impulses, 2);
    assert!(events.iter().all(|event| event.day() == 100 || event.day() == 150));
}

#[test]
fn listener_does_not_change_results() {
    let silent = simulate(stress_config(), &mut ()).unwrap();
    let mut events: Vec<NotableEvent> = Vec::new();
    let observed = simulate(stress_config(), &mut events).unwrap();
    assert_eq!(silent, observed);
    assert!(!events.is_empty());
}

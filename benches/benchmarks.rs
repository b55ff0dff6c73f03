use claim_drop::{
    amount::RawAmount,
    conditions::CurrencyMetadata,
    derive_claim_state, ClaimCondition, ClaimSnapshot,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn phase(name: &str, snapshot_cap: Option<u64>) -> ClaimCondition {
    ClaimCondition {
        name: name.to_string(),
        available_supply: Some(RawAmount::from("9500")),
        max_claimable_supply: Some(RawAmount::from("10000")),
        max_claimable_per_wallet: Some(RawAmount::from(25)),
        currency_metadata: Some(CurrencyMetadata {
            value: Some(RawAmount::from("15000000000000000")),
            decimals: Some(RawAmount::from(18)),
            symbol: Some("ETH".to_string()),
        }),
        snapshot_cap: snapshot_cap.map(RawAmount::from),
    }
}

fn derive_benchmark(c: &mut Criterion) {
    let snapshot = ClaimSnapshot {
        active_claim_condition: Some(phase("Public", None)),
        claim_conditions: (0..16)
            .map(|i| phase(&format!("Phase {i}"), Some(i * 3)))
            .collect(),
        claimed_supply: Some(RawAmount::from("500")),
        ..Default::default()
    };

    c.bench_function("derive_claim_state", |b| {
        b.iter(|| derive_claim_state(black_box(&snapshot), black_box(3)))
    });

    let unreadable = ClaimSnapshot {
        active_claim_condition: Some(ClaimCondition {
            available_supply: Some(RawAmount::from("unlimited")),
            max_claimable_supply: Some(RawAmount::from("unlimited")),
            ..Default::default()
        }),
        ..Default::default()
    };
    c.bench_function("derive_claim_state_fallbacks", |b| {
        b.iter(|| derive_claim_state(black_box(&unreadable), black_box(1)))
    });
}

criterion_group!(benches, derive_benchmark);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tablecheck_rules::mining::{AssociationRuleMiner, MiningConfig};
use tablecheck_rules::transaction::InputFormat;

fn create_test_transactions(count: usize) -> Vec<Vec<String>> {
    let items = ["A", "B", "C", "D", "E", "F", "G", "H"];
    let mut transactions = Vec::new();

    for i in 0..count {
        let num_items = (i % 5) + 2; // 2-6 items per transaction
        let tx_items: Vec<String> = items.iter().take(num_items).map(|s| s.to_string()).collect();
        transactions.push(tx_items);
    }

    transactions
}

fn bench_apriori_1k(c: &mut Criterion) {
    c.bench_function("apriori_1k_transactions", |b| {
        let transactions = create_test_transactions(1000);
        let config = MiningConfig::default();

        b.iter(|| {
            let mut miner = AssociationRuleMiner::new(config.clone());
            miner
                .load_data(transactions.clone(), InputFormat::Tabular)
                .unwrap();
            black_box(miner.execute(&|| false).unwrap())
        });
    });
}

fn bench_apriori_100(c: &mut Criterion) {
    c.bench_function("apriori_100_transactions", |b| {
        let transactions = create_test_transactions(100);
        let config = MiningConfig::default();

        b.iter(|| {
            let mut miner = AssociationRuleMiner::new(config.clone());
            miner
                .load_data(transactions.clone(), InputFormat::Tabular)
                .unwrap();
            black_box(miner.execute(&|| false).unwrap())
        });
    });
}

criterion_group!(benches, bench_apriori_100, bench_apriori_1k);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tablecheck_rules::column::ColumnType;
use tablecheck_rules::dc::{DcConfig, DcVerification};

fn create_test_rows(count: usize) -> Vec<Vec<String>> {
    (0..count)
        .map(|i| vec![i.to_string(), (count - i).to_string(), format!("name{}", i % 50)])
        .collect()
}

fn schema() -> Vec<(String, ColumnType)> {
    vec![
        ("Id".to_string(), ColumnType::Int),
        ("Rank".to_string(), ColumnType::Int),
        ("Name".to_string(), ColumnType::Str),
    ]
}

fn bench_ucc_check_1k(c: &mut Criterion) {
    c.bench_function("dc_ucc_1k_rows", |b| {
        let rows = create_test_rows(1000);

        b.iter(|| {
            let mut verifier = DcVerification::new(DcConfig {
                denial_constraint: "!(t.Id == s.Id)".to_string(),
            });
            verifier.load_data(rows.clone(), schema()).unwrap();
            black_box(verifier.execute(&|| false).unwrap())
        });
    });
}

fn bench_general_shape_200(c: &mut Criterion) {
    c.bench_function("dc_general_shape_200_rows", |b| {
        let rows = create_test_rows(200);

        b.iter(|| {
            let mut verifier = DcVerification::new(DcConfig {
                denial_constraint: "!(t.Id < s.Rank and t.Rank < s.Id)".to_string(),
            });
            verifier.load_data(rows.clone(), schema()).unwrap();
            black_box(verifier.execute(&|| false).unwrap())
        });
    });
}

criterion_group!(benches, bench_ucc_check_1k, bench_general_shape_200);
criterion_main!(benches);

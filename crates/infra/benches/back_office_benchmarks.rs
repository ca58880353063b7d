use std::hint::black_box;

use chrono::Utc;
use criterion::{Criterion, criterion_group, criterion_main};
use uuid::Uuid;

use tillpoint_core::{Money, ProductId, StoreId, SupplierId, UserId};
use tillpoint_infra::InMemoryBackOffice;
use tillpoint_products::Product;
use tillpoint_purchasing::NewPurchaseOrder;
use tillpoint_restock::{Operator, QuickRestock, RestockForm};
use tillpoint_suppliers::Supplier;

struct Setup {
    back_office: InMemoryBackOffice,
    store: StoreId,
    product: Product,
    supplier: Supplier,
    operator: Operator,
}

fn setup() -> Setup {
    let back_office = InMemoryBackOffice::new();
    let store = StoreId::new();
    let product = Product::new(ProductId::new(), store, "Bench item")
        .with_prices(Money::from_minor_units(1000), Money::from_minor_units(1500));
    let supplier = Supplier::new(SupplierId::new(), store, "Bench supplier");
    back_office.put_product(product.clone()).unwrap();
    back_office.add_supplier(supplier.clone()).unwrap();
    Setup {
        back_office,
        store,
        product,
        supplier,
        operator: Operator {
            id: UserId::new(),
            name: "bench".to_string(),
        },
    }
}

fn restock_order(setup: &Setup, quantity: u32) -> NewPurchaseOrder {
    let mut form = RestockForm::for_product(&setup.product);
    form.supplier_id = Some(setup.supplier.id);
    form.quantity = quantity;
    QuickRestock {
        store_id: setup.store,
        product: &setup.product,
        form: &form,
        operator: &setup.operator,
        idempotency_key: Uuid::now_v7(),
        submitted_at: Utc::now(),
    }
    .build()
    .unwrap()
}

fn bench_quick_restock(c: &mut Criterion) {
    let mut group = c.benchmark_group("quick_restock");

    group.bench_function("create_received_order", |b| {
        let setup = setup();
        b.iter(|| {
            let order = restock_order(&setup, black_box(5));
            setup.back_office.create_order(order).unwrap();
        });
    });

    // Same key every time: only the first create does work.
    group.bench_function("replayed_idempotency_key", |b| {
        let setup = setup();
        let order = restock_order(&setup, 5);
        setup.back_office.create_order(order.clone()).unwrap();
        b.iter(|| {
            setup.back_office.create_order(black_box(order.clone())).unwrap();
        });
    });

    group.finish();
}

fn bench_last_supply_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("last_supply_lookup");

    for history in [10usize, 1_000] {
        let setup = setup();
        for _ in 0..history {
            setup
                .back_office
                .create_order(restock_order(&setup, 1))
                .unwrap();
        }
        group.bench_function(format!("orders_{history}"), |b| {
            b.iter(|| {
                setup
                    .back_office
                    .last_supply(black_box(setup.store), black_box(setup.product.id))
                    .unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_quick_restock, bench_last_supply_lookup);
criterion_main!(benches);

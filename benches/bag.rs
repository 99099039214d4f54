use criterion::{criterion_group, criterion_main, Criterion};

use nars::bag::{Bag, Item};
use nars::Budget;

#[derive(Debug, Clone)]
struct Entry {
    key: String,
    budget: Budget,
}

impl Item for Entry {
    fn key(&self) -> &str {
        &self.key
    }
    fn budget(&self) -> &Budget {
        &self.budget
    }
    fn budget_mut(&mut self) -> &mut Budget {
        &mut self.budget
    }
}

fn bag_churn(c: &mut Criterion) {
    c.bench_function("bag put/take churn", |b| {
        b.iter(|| {
            let mut bag: Bag<Entry> = Bag::new(1000, 10.0);
            for i in 0..1000usize {
                let priority = (i % 100) as f32 / 100.0;
                bag.put_in(Entry {
                    key: format!("item{}", i),
                    budget: Budget::new(priority, 0.5, 0.5),
                });
            }
            for _ in 0..1000 {
                if let Some(item) = bag.take_out() {
                    bag.put_back(item);
                }
            }
            bag.len()
        })
    });
}

criterion_group!(benches, bag_churn);
criterion_main!(benches);

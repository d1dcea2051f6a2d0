use criterion::{black_box, criterion_group, criterion_main, Criterion};
use goap_core::{AgentAction, AgentGoal, Fact, IdleStrategy};
use goap_planner::GoapPlanner;

#[derive(Debug, Clone, Copy)]
struct Bits(u64);

fn fact(bit: u32) -> Fact<Bits> {
    Fact::new(format!("bit{bit}"), move |w: &Bits| w.0 & (1 << bit) != 0)
}

/// `set_i` needs bit `i - 1` and sets bit `i`; the goal is the last bit.
fn chain_planner(len: u32) -> (GoapPlanner<Bits>, AgentGoal<Bits>) {
    let actions = (0..len)
        .map(|i| {
            let mut builder = AgentAction::builder(format!("set_{i}"))
                .with_strategy(IdleStrategy::new(0.0))
                .add_effect(fact(i));
            if i > 0 {
                builder = builder.add_precondition(fact(i - 1));
            }
            builder.build().expect("action")
        })
        .collect();
    let goal = AgentGoal::builder("chain")
        .with_desired_effect(fact(len - 1))
        .build()
        .expect("goal");
    (GoapPlanner::new(actions).expect("planner"), goal)
}

/// Independent `set_i` actions; the goal needs every bit.
fn wide_planner(bits: u32) -> (GoapPlanner<Bits>, AgentGoal<Bits>) {
    let actions = (0..bits)
        .map(|i| {
            AgentAction::builder(format!("set_{i}"))
                .with_strategy(IdleStrategy::new(0.0))
                .add_effect(fact(i))
                .build()
                .expect("action")
        })
        .collect();
    let goal = (0..bits)
        .fold(AgentGoal::builder("all"), |goal, i| {
            goal.with_desired_effect(fact(i))
        })
        .build()
        .expect("goal");
    (GoapPlanner::new(actions).expect("planner"), goal)
}

fn bench_goap_planner(c: &mut Criterion) {
    let world = Bits(0);

    let (planner, goal) = chain_planner(12);
    c.bench_function("goap-planner/plan(chain=12)", |b| {
        b.iter(|| {
            let plan = planner.plan([&goal], None, &world).expect("plan");
            black_box(plan.len());
        })
    });

    let (planner, goal) = wide_planner(5);
    c.bench_function("goap-planner/plan(wide=5)", |b| {
        b.iter(|| {
            let plan = planner.plan([&goal], None, &world).expect("plan");
            black_box(plan.len());
        })
    });
}

criterion_group!(benches, bench_goap_planner);
criterion_main!(benches);

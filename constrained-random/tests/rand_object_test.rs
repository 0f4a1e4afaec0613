#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

use constrained_random::domain::Domain;
use constrained_random::RandObject;
use constrained_random::RandVar;
use constrained_random::RandomizationError;
use constrained_random::RandomizationOptions;
use constrained_random::Value;

fn int(object: &RandObject, name: &str) -> i128 {
    object
        .get_value(name)
        .and_then(Value::as_int)
        .expect("integer value")
}

fn ints(values: &[&Value]) -> Vec<i128> {
    values
        .iter()
        .map(|value| value.as_int().expect("integer value"))
        .collect()
}

fn seeded() -> RandObject {
    RandObject::with_seed(RandomizationOptions::default(), 0)
}

#[test]
fn basic_variables_are_randomized_independently() {
    let mut object = seeded();
    object
        .add_rand_var(RandVar::builder("foo").domain(0..100))
        .expect("valid variable");
    object
        .add_rand_var(RandVar::builder("bar").domain(vec![1, 2, 3]))
        .expect("valid variable");
    object
        .add_rand_var(RandVar::builder("baz").bits(4))
        .expect("valid variable");
    object
        .add_rand_var(RandVar::builder("bob").domain(Domain::weighted([(0, 9), (1, 1)])))
        .expect("valid variable");
    object
        .add_rand_var(
            RandVar::builder("dan")
                .domain(0..5)
                .constraint(|value| value.as_int() != Some(3)),
        )
        .expect("valid variable");
    object
        .add_rand_var(
            RandVar::builder("joe")
                .generator(|arguments| Value::Int(arguments[0].as_int().unwrap_or_default() + 1))
                .arguments([Value::Int(1)]),
        )
        .expect("valid variable");

    for _ in 0..100 {
        object.randomize().expect("satisfiable");

        assert!((0..100).contains(&int(&object, "foo")));
        assert!([1, 2, 3].contains(&int(&object, "bar")));
        assert!((0..16).contains(&int(&object, "baz")));
        assert!([0, 1].contains(&int(&object, "bob")));
        assert!([0, 1, 2, 4].contains(&int(&object, "dan")));
        assert_eq!(int(&object, "joe"), 2);
    }
}

#[test]
fn chained_order_constraints_hold() {
    let mut object = seeded();
    object
        .add_rand_var(RandVar::builder("a").domain(0..10))
        .expect("valid variable");
    object
        .add_rand_var(RandVar::builder("b").domain(0..10))
        .expect("valid variable");
    object
        .add_rand_var(RandVar::builder("c").domain(5..10))
        .expect("valid variable");
    object
        .add_constraint(|values| values[0] < values[1], ["a", "b"])
        .expect("known variables");
    object
        .add_constraint(|values| values[0] < values[1], ["b", "c"])
        .expect("known variables");

    for _ in 0..100 {
        object.randomize().expect("satisfiable");

        assert!(int(&object, "a") < int(&object, "b"));
        assert!(int(&object, "b") < int(&object, "c"));
    }
}

#[test]
fn plus_one_holds_after_every_randomization() {
    let mut object = seeded();
    object
        .add_rand_var(RandVar::builder("x").domain(0..100).order(0))
        .expect("valid variable");
    object
        .add_rand_var(RandVar::builder("y").domain(0..100).order(1))
        .expect("valid variable");
    object
        .add_constraint(
            |values| {
                let values = ints(values);
                values[1] == values[0] + 1
            },
            ["x", "y"],
        )
        .expect("known variables");

    for _ in 0..100 {
        object.randomize().expect("satisfiable");

        assert_eq!(int(&object, "y"), int(&object, "x") + 1);
    }
}

#[test]
fn sum_over_several_groups_holds() {
    let mut object = seeded();
    for (name, order) in [("x", 0), ("y", 1), ("z", 1)] {
        object
            .add_rand_var(
                RandVar::builder(name)
                    .domain(-100..100)
                    .order(order)
                    .constraint(|value| value.as_int() != Some(0)),
            )
            .expect("valid variable");
    }
    object
        .add_constraint(
            |values| ints(values).iter().sum::<i128>() == 41,
            ["x", "y", "z"],
        )
        .expect("known variables");

    for _ in 0..10 {
        object.randomize().expect("satisfiable");

        let (x, y, z) = (int(&object, "x"), int(&object, "y"), int(&object, "z"));
        assert_eq!(x + y + z, 41);
        assert!(x != 0 && y != 0 && z != 0);
    }
}

#[test]
fn solving_order_makes_products_feasible() {
    let mut object = seeded();
    object
        .add_rand_var(RandVar::builder("a").domain(0..100).order(0))
        .expect("valid variable");
    object
        .add_rand_var(RandVar::builder("b").domain(0..100).order(1))
        .expect("valid variable");
    object
        .add_constraint(|values| ints(values)[0] * ints(values)[1] < 1000, ["a", "b"])
        .expect("known variables");
    object
        .add_rand_var(RandVar::builder("c").domain(0..100).order(2))
        .expect("valid variable");
    object
        .add_constraint(
            |values| ints(values).iter().sum::<i128>() < 100,
            ["a", "b", "c"],
        )
        .expect("known variables");

    for _ in 0..100 {
        object.randomize().expect("satisfiable");

        let (a, b, c) = (int(&object, "a"), int(&object, "b"), int(&object, "c"));
        assert!(a * b < 1000);
        assert!(a + b + c < 100);
    }
}

#[test]
fn list_variables_take_part_in_joint_constraints() {
    let mut object = seeded();
    object
        .add_rand_var(RandVar::builder("total").domain(0..10))
        .expect("valid variable");
    object
        .add_rand_var(
            RandVar::builder("parts")
                .domain(0..5)
                .length(2)
                .constraint(|value| value.as_int() != Some(0))
                .order(1),
        )
        .expect("valid variable");
    object
        .add_constraint(
            |values| {
                let parts = values[1]
                    .as_list()
                    .map(|list| list.iter().filter_map(Value::as_int).sum::<i128>());
                values[0].as_int() == parts
            },
            ["total", "parts"],
        )
        .expect("known variables");

    for _ in 0..50 {
        object.randomize().expect("satisfiable");

        let parts = object
            .get_value("parts")
            .and_then(Value::as_list)
            .expect("list value");
        assert_eq!(parts.len(), 2);
        assert!(!parts.contains(&Value::Int(0)));
        let sum = parts.iter().filter_map(Value::as_int).sum::<i128>();
        assert_eq!(int(&object, "total"), sum);
    }
}

#[test]
fn unsatisfiable_joint_constraints_are_reported() {
    let mut object = RandObject::with_seed(
        RandomizationOptions {
            max_iterations: 5,
            ..Default::default()
        },
        0,
    );
    object
        .add_rand_var(RandVar::builder("x").domain(0..10))
        .expect("valid variable");
    object
        .add_rand_var(RandVar::builder("y").bits(20).order(1))
        .expect("valid variable");
    object
        .add_constraint(|_| false, ["x", "y"])
        .expect("known variables");

    assert!(matches!(
        object.randomize(),
        Err(RandomizationError::IterationsExhausted {
            max_iterations: 5,
            ..
        })
    ));
}

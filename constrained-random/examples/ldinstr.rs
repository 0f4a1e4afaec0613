//! Produces random encodings of a made-up load instruction with the fields (starting at the
//! least significant bit):
//! - `imm0` (11 bits): immediate offset of the memory address.
//! - `src0` (5 bits): source register of the memory address.
//! - `dst0` (5 bits): destination register of the loaded data.
//! - `wb` (1 bit): whether the address is written back to `src0`.
//! - a fixed 10-bit encoding of the instruction.
//!
//! When the address is written back, `dst0` may not be the same register as `src0`. The sum of
//! the contents of `src0` and `imm0` should be word-aligned and should not overflow 32 bits.
use std::io::Write;

use clap::Parser;
use constrained_random::RandObject;
use constrained_random::RandVar;
use constrained_random::RandomizationOptions;
use constrained_random::Value;
use log::LevelFilter;

const ENCODING: i128 = 0xfa80_0000;

#[derive(Parser)]
struct Cli {
    /// The number of instructions to produce.
    #[arg(short, long, default_value_t = 5)]
    count: usize,

    /// The seed of the random generator, so that runs can be repeated.
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Log how the constraints are solved.
    #[arg(short, long)]
    verbose: bool,
}

/// Stands in for reading the current contents of `src0` from a model of the processor.
fn read_model_for_src0_value(_: &[Value]) -> Value {
    Value::Int(0xffff_fbcd)
}

fn wb_dst_src(values: &[&Value]) -> bool {
    let [wb, dst0, src0] = values else {
        return false;
    };
    wb.as_int() == Some(0) || dst0 != src0
}

fn sum_src0_imm0(values: &[&Value]) -> bool {
    let (Some(src0_value), Some(imm0)) = (values[0].as_int(), values[1].as_int()) else {
        return false;
    };
    let address = src0_value + imm0;
    address & 3 == 0 && address < 0xffff_ffff
}

fn opcode(object: &RandObject) -> Option<i128> {
    let field = |name: &str| object.get_value(name).and_then(Value::as_int);

    Some(
        ENCODING
            | field("imm0")?
            | field("src0")? << 11
            | field("dst0")? << 16
            | field("wb")? << 21,
    )
}

fn main() {
    let Cli {
        count,
        seed,
        verbose,
    } = Cli::parse();

    env_logger::Builder::new()
        .format(move |buf, record| writeln!(buf, "{}", record.args()))
        .filter_level(if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        })
        .target(env_logger::Target::Stdout)
        .init();

    let mut instruction = RandObject::with_seed(RandomizationOptions::default(), seed);
    let variables = [
        RandVar::builder("src0").bits(5).order(0),
        RandVar::builder("src0_value")
            .generator(read_model_for_src0_value)
            .order(0),
        RandVar::builder("wb").bits(1).order(0),
        RandVar::builder("dst0").bits(5).order(1),
        RandVar::builder("imm0").bits(11).order(2),
    ];
    for variable in variables {
        if let Err(error) = instruction.add_rand_var(variable) {
            eprintln!("Failed to add a variable: {error}");
            return;
        }
    }

    let constraints: [(fn(&[&Value]) -> bool, &[&str]); 2] = [
        (wb_dst_src, &["wb", "dst0", "src0"]),
        (sum_src0_imm0, &["src0_value", "imm0"]),
    ];
    for (predicate, variables) in constraints {
        if let Err(error) = instruction.add_constraint(predicate, variables.iter().copied()) {
            eprintln!("Failed to add a constraint: {error}");
            return;
        }
    }

    for _ in 0..count {
        if let Err(error) = instruction.randomize() {
            eprintln!("Failed to randomize the instruction: {error}");
            return;
        }

        match opcode(&instruction) {
            Some(opcode) => println!("{opcode:#x}"),
            None => eprintln!("The instruction has a non-integer field"),
        }
    }
}

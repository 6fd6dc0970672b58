use std::process;

use argh::FromArgs;
use snafu::{ResultExt as _, Whatever};
use stack_pool::{Stack, StackPool};

/// Build two stacks in one pool and print them.
#[derive(Debug, FromArgs)]
struct Args {
    /// number of nodes to reserve up front
    #[argh(option, default = "16")]
    capacity: usize,
    /// finish by popping an empty stack, which fails
    #[argh(switch)]
    trace_underflow: bool,
}

fn main() {
    env_logger::init();
    let args: Args = argh::from_env();

    if let Err(err) = run(&args) {
        eprintln!("{}", snafu::Report::from_error(err));
        process::exit(1);
    }
}

fn push_all(pool: &mut StackPool<i32>, stack: Stack, values: &[i32]) -> Stack {
    values.iter().fold(stack, |stack, &v| pool.push(v, stack))
}

fn run(args: &Args) -> Result<(), Whatever> {
    let mut pool = StackPool::<i32>::with_capacity(args.capacity);

    let l1 = push_all(&mut pool, Stack::EMPTY, &[1, 3, 5, 7]);
    let l2 = push_all(&mut pool, Stack::EMPTY, &[2, 4, 6, 8, 10, 12, 14, 16]);

    let l1 = pool.pop(l1).whatever_context("failed to pop l1")?;
    let l2 = pool.pop(l2).whatever_context("failed to pop l2")?;
    let l1 = push_all(&mut pool, l1, &[9, 11]);

    println!("l1: {}", pool.display_stack(l1));
    println!("l2: {}", pool.display_stack(l2));
    println!("nodes: {}", pool.display_nodes());
    println!(
        "len={} capacity={} free={}",
        pool.len(),
        pool.capacity(),
        pool.free_len()
    );

    let l1 = pool.free_stack(l1);
    println!("after free_stack(l1): free={}", pool.free_len());

    if args.trace_underflow {
        pool.pop(l1)
            .whatever_context("failed to pop the freed stack")?;
    }

    Ok(())
}

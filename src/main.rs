use std::fmt;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ordtree::avl::AvlTree;
use ordtree::rbtree::RbTree;
use ordtree::sort::{bubble_sort, insertion_sort, selection_sort};
use ordtree::unbalanced::UnbalancedTree;
use ordtree::SearchTree;

#[derive(Parser, Debug)]
#[command(name = "ordtree")]
#[command(about = "Drive the ordered key stores and sorts.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a tree, print it, and verify its invariants.
    Tree {
        /// Which balancing strategy to use.
        #[arg(long, value_enum, default_value_t = Engine::Avl)]
        engine: Engine,
        /// Keys to insert, in order.
        #[arg(required = true, allow_negative_numbers = true)]
        keys: Vec<i64>,
        /// Keys to remove after every insert is done.
        #[arg(long, num_args = 1.., allow_negative_numbers = true)]
        remove: Vec<i64>,
    },
    /// Sort values in place and print each pass at trace level.
    Sort {
        /// Which sorting algorithm to use.
        #[arg(long, value_enum, default_value_t = Algorithm::Insertion)]
        algorithm: Algorithm,
        /// Values to sort.
        #[arg(allow_negative_numbers = true)]
        values: Vec<i64>,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Engine {
    Avl,
    RedBlack,
    Plain,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Algorithm {
    Selection,
    Bubble,
    Insertion,
}

/// Reads the filter from `ORDTREE_LOG`, falling back to warnings only.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("ORDTREE_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run_tree<T>(keys: &[i64], remove: &[i64]) -> Result<()>
where
    T: SearchTree<i64> + Default + fmt::Display,
{
    let mut tree = T::default();
    for &key in keys {
        if !tree.insert(key) {
            info!(key, "duplicate key skipped");
        }
    }
    for key in remove {
        if tree.remove(key).is_none() {
            info!(key, "key to remove was absent");
        }
    }

    print!("{tree}");
    let in_order: Vec<_> = std::iter::successors(tree.minimum(), |n| tree.successor(n.key()))
        .map(|n| *n.key())
        .collect();
    println!("in order: {in_order:?}");

    tree.check().context("tree invariants do not hold")?;
    println!("invariants: ok");
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.cmd {
        Command::Tree {
            engine,
            keys,
            remove,
        } => match engine {
            Engine::Avl => run_tree::<AvlTree<i64>>(&keys, &remove),
            Engine::RedBlack => run_tree::<RbTree<i64>>(&keys, &remove),
            Engine::Plain => run_tree::<UnbalancedTree<i64>>(&keys, &remove),
        },
        Command::Sort {
            algorithm,
            mut values,
        } => {
            match algorithm {
                Algorithm::Selection => selection_sort(&mut values),
                Algorithm::Bubble => bubble_sort(&mut values),
                Algorithm::Insertion => insertion_sort(&mut values),
            }
            println!("{values:?}");
            Ok(())
        }
    }
}

use clap::{Parser, ValueEnum};

use avl_map::{AvlTreeMap, Error, KeyGenerator, Order};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OrderArg {
    Asc,
    Desc,
}

impl From<OrderArg> for Order {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Asc => Order::Ascending,
            OrderArg::Desc => Order::Descending,
        }
    }
}

/// Fills an AVL tree map with random keys and prints it.
#[derive(Parser, Debug)]
#[command(name = "avl-demo")]
struct Cli {
    /// Number of keys to draw, duplicates overwrite earlier values.
    #[arg(long, short, default_value_t = 16)]
    count: usize,
    /// Smallest key that may be drawn.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    min: i64,
    /// Keys are drawn below this bound.
    #[arg(long, default_value_t = 100, allow_negative_numbers = true)]
    max: i64,
    /// Seed for a reproducible run.
    #[arg(long, short)]
    seed: Option<u64>,
    #[arg(long, short, value_enum, default_value_t = OrderArg::Asc)]
    order: OrderArg,
    /// Print the tree structure with balance factors.
    #[arg(long, short)]
    dump: bool,
    /// Number of drawn keys to remove again afterwards.
    #[arg(long, short, default_value_t = 0)]
    remove: usize,
}

fn print_map(map: &AvlTreeMap<i64, usize>, order: Order, dump: bool) -> Result<(), Error> {
    println!("{} keys, height {}", map.len(), map.height());
    println!("{:?}", map.all(order));
    map.iterate(order, |node| {
        println!("{:>6} => {:<4} balance {:>2}", node.key(), node.value(), node.balance());
    });
    if dump {
        let mut out = String::new();
        map.dump(&mut out)?;
        print!("{out}");
    }
    Ok(())
}

fn main() -> Result<(), Error> {
    env_logger::init();
    let cli = Cli::parse();
    let order = Order::from(cli.order);

    let mut keys = match cli.seed {
        Some(seed) => KeyGenerator::from_seed(seed),
        None => KeyGenerator::from_entropy(),
    };
    let drawn = keys.keys(cli.count, cli.min, cli.max)?;

    let mut map = AvlTreeMap::new();
    for (index, key) in drawn.iter().enumerate() {
        map.insert(*key, index);
    }
    print_map(&map, order, cli.dump)?;

    if cli.remove > 0 {
        for key in drawn.iter().take(cli.remove) {
            map.remove(key);
        }
        println!("after removing {} drawn keys:", cli.remove.min(drawn.len()));
        print_map(&map, order, cli.dump)?;
    }
    Ok(())
}

use clap::Parser;
use probe_table::HashTable;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "target_capacity", default_value_t = 1000)]
    target_capacity: usize,

    /// Percentage of the inserted keys to remove again afterwards.
    #[arg(short = 'r', long = "remove_percent", default_value_t = 50)]
    remove_percent: usize,
}

fn main() {
    let args = Args::parse();

    println!(
        "Creating HashTable with target capacity: {}",
        args.target_capacity
    );

    let mut table: HashTable<String, u64> =
        HashTable::with_capacity(args.target_capacity).expect("failed to allocate table");

    println!("Actual capacity: {}", table.capacity());

    // Fill up to just below the grow threshold so the table keeps its size.
    let num_values = table.capacity() - table.capacity() / 4 - 1;
    println!("Filling table with {} string keys...", num_values);
    for i in 0..num_values {
        table
            .insert(format!("key_{:08}", i), i as u64)
            .expect("insert failed");
    }

    println!("Inserted {} values into table", table.len());
    println!("Load factor: {:.2}%", table.load_factor() * 100.0);
    table.print_probe_histogram();
    table.debug_stats().print();

    let num_removed = num_values * args.remove_percent.min(100) / 100;
    println!();
    println!("Removing {} values...", num_removed);
    for i in 0..num_removed {
        table
            .remove(&format!("key_{:08}", i))
            .expect("key should be present");
    }

    println!(
        "{} values remain in {} slots ({} tombstones)",
        table.len(),
        table.capacity(),
        table.tombstones()
    );
    table.print_probe_histogram();
    table.debug_stats().print();
}

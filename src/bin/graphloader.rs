use std::{env, process};

use graphloader::{Edge, GraphStore, LoaderConfig, LoaderOutput, Vertex, run_loader};
use serde_json::json;

struct CliConfig {
    database: String,
    command: String,
    num_batches: usize,
    num_neighbors: usize,
    num_hops: usize,
    shuffle: bool,
    rng_seed: Option<u64>,
    demo: bool,
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        println!("{}", help());
        return;
    }
    let arg_refs: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
    let config = match parse_args(&arg_refs) {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(2);
        }
    };

    let store = match open_store(&config) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("{err}");
            process::exit(2);
        }
    };

    if let Err(err) = run_command(&store, &config) {
        eprintln!("command failed: {err}");
        process::exit(1);
    }
}

fn parse_args(args: &[&str]) -> Result<CliConfig, String> {
    let mut config = CliConfig {
        database: String::from("memory"),
        command: String::from("status"),
        num_batches: 1,
        num_neighbors: 10,
        num_hops: 2,
        shuffle: false,
        rng_seed: None,
        demo: false,
    };
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match *arg {
            "--db" | "--database" => {
                config.database = next_value(&mut iter, "--db")?;
            }
            "--batches" => {
                config.num_batches = parse_number(&next_value(&mut iter, "--batches")?)?;
            }
            "--neighbors" => {
                config.num_neighbors = parse_number(&next_value(&mut iter, "--neighbors")?)?;
            }
            "--hops" => {
                config.num_hops = parse_number(&next_value(&mut iter, "--hops")?)?;
            }
            "--rng-seed" => {
                let value = next_value(&mut iter, "--rng-seed")?;
                config.rng_seed =
                    Some(value.parse().map_err(|_| format!("bad seed {value}"))?);
            }
            "--shuffle" => config.shuffle = true,
            "--demo" => config.demo = true,
            other if other.starts_with('-') => {
                return Err(format!("unknown flag {other}"));
            }
            _ => config.command = arg.to_string(),
        }
    }
    Ok(config)
}

fn next_value<'a, I: Iterator<Item = &'a &'a str>>(
    iter: &mut I,
    flag: &str,
) -> Result<String, String> {
    iter.next()
        .map(|v| v.to_string())
        .ok_or_else(|| format!("{flag} requires a value"))
}

fn parse_number(value: &str) -> Result<usize, String> {
    value.parse().map_err(|_| format!("bad number {value}"))
}

fn help() -> &'static str {
    "Usage: graphloader [--db memory|PATH] [--batches N] [--neighbors N] [--hops N] \
     [--shuffle] [--rng-seed N] [--demo] [status|run]\n"
}

fn open_store(config: &CliConfig) -> Result<GraphStore, String> {
    let store = if config.database == "memory" {
        GraphStore::open_in_memory().map_err(|e| e.to_string())?
    } else {
        GraphStore::open(&config.database).map_err(|e| e.to_string())?
    };
    if config.demo {
        seed_demo_graph(&store).map_err(|e| e.to_string())?;
    }
    Ok(store)
}

fn run_command(store: &GraphStore, config: &CliConfig) -> Result<(), String> {
    match config.command.as_str() {
        "status" => {
            let vertices = store.vertex_count().map_err(|e| e.to_string())?;
            println!("vertices={vertices}");
            Ok(())
        }
        "run" => {
            let loader = LoaderConfig {
                num_batches: config.num_batches,
                num_neighbors: config.num_neighbors,
                num_hops: config.num_hops,
                shuffle: config.shuffle,
                rng_seed: config.rng_seed,
                ..LoaderConfig::default()
            };
            let output = run_loader(store, &loader, None).map_err(|e| e.to_string())?;
            if let LoaderOutput::Direct(batches) = output {
                for batch in batches {
                    println!(
                        "batch {}: {} vertex records, {} edge records",
                        batch.batch_id,
                        batch.vertex_batch.lines().count(),
                        batch.edge_batch.lines().count()
                    );
                }
            }
            Ok(())
        }
        other => Err(format!("unknown command {other}")),
    }
}

fn seed_demo_graph(store: &GraphStore) -> Result<(), graphloader::GraphLoaderError> {
    let mut ids = Vec::new();
    for idx in 0..10 {
        let id = store.insert_vertex(&Vertex {
            id: 0,
            vertex_type: "Item".into(),
            key: format!("item{idx}"),
            data: json!({ "idx": idx }),
        })?;
        ids.push(id);
    }
    for (pos, &from) in ids.iter().enumerate() {
        let to = ids[(pos + 1) % ids.len()];
        store.insert_edge(&Edge {
            id: 0,
            from_id: from,
            to_id: to,
            edge_type: "NEXT".into(),
            data: json!({}),
        })?;
        let skip = ids[(pos + 3) % ids.len()];
        store.insert_edge(&Edge {
            id: 0,
            from_id: from,
            to_id: skip,
            edge_type: "SKIP".into(),
            data: json!({}),
        })?;
    }
    Ok(())
}

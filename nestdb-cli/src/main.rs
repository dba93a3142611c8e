use clap::{Parser, Subcommand, ValueEnum};
use nestdb::{FieldMap, Query, SchemaDefinition, Store};
use serde::Deserialize;
use std::process;

/// nestdb CLI — run scripted workloads against an in-memory nestdb store
#[derive(Parser)]
#[command(name = "nestdb", version, about)]
struct Cli {
    /// Output format
    #[arg(long, default_value = "json")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Seed a store from a data directory and list its databases
    Databases {
        /// Path to the data directory (default: current directory)
        #[arg(long, default_value = ".")]
        data_dir: String,
    },

    /// Execute a script of operations against a fresh store and print
    /// the resulting table snapshots
    Run {
        /// Path to the script YAML file
        script: String,
    },
}

/// A scripted workload: a database name, table declarations, and a
/// sequence of operations.
#[derive(Deserialize)]
struct Script {
    #[serde(default = "default_database")]
    database: String,
    #[serde(flatten)]
    schema: SchemaDefinition,
    #[serde(default)]
    ops: Vec<Op>,
}

fn default_database() -> String {
    "main".to_string()
}

#[derive(Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Op {
    Insert {
        table: String,
        data: FieldMap,
    },
    UpdateWhere {
        table: String,
        column: String,
        value: nestdb::Value,
        data: FieldMap,
        #[serde(default)]
        all: bool,
    },
    DeleteWhere {
        table: String,
        column: String,
        value: nestdb::Value,
        #[serde(default)]
        all: bool,
    },
    FindWhere {
        table: String,
        column: String,
        value: nestdb::Value,
        #[serde(default)]
        or_fail: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("ERROR:{e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Databases { data_dir } => {
            let store = Store::open(&data_dir)?;
            let mut names: Vec<String> = store
                .database_names()
                .into_iter()
                .map(str::to_string)
                .collect();
            names.sort();
            print_output(&serde_json::json!({ "databases": names }), &cli.format);
        }

        Command::Run { script } => {
            let text = std::fs::read_to_string(&script)?;
            let script: Script = serde_yaml::from_str(&text)?;
            let output = run_script(script)?;
            print_output(&output, &cli.format);
        }
    }

    Ok(())
}

fn run_script(script: Script) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let mut store = Store::new();
    let db = store.create_database(&script.database)?;

    for (name, definition) in &script.schema.tables {
        db.create_table(
            name,
            definition.columns.clone(),
            definition.options.clone().unwrap_or_default(),
        )?;
    }

    let mut results = Vec::new();
    for op in script.ops {
        match op {
            Op::Insert { table, data } => {
                let record = db.get_table_mut(&table)?.insert_one(data)?;
                results.push(serde_json::json!({ "inserted": record.row_id() }));
            }
            Op::UpdateWhere {
                table,
                column,
                value,
                data,
                all,
            } => {
                db.get_table_mut(&table)?
                    .update_where(&Query::new(column, value), &data, all)?;
                results.push(serde_json::json!({ "updated": true }));
            }
            Op::DeleteWhere {
                table,
                column,
                value,
                all,
            } => {
                db.get_table_mut(&table)?
                    .delete_where(&Query::new(column, value), all)?;
                results.push(serde_json::json!({ "deleted": true }));
            }
            Op::FindWhere {
                table,
                column,
                value,
                or_fail,
            } => {
                let mut query = Query::new(column, value);
                if or_fail {
                    query = query.or_fail();
                }
                let found = db
                    .get_table(&table)?
                    .find_where(&query)?
                    .map(|record| record.to_plain_object());
                results.push(serde_json::json!({ "found": found }));
            }
        }
    }

    let mut tables = serde_json::Map::new();
    let mut names = db.table_names();
    names.sort();
    for name in names {
        let rows: Vec<serde_json::Value> = db
            .get_table(name)?
            .snapshot()
            .map(|(_, record)| record.to_plain_object())
            .collect();
        tables.insert(name.to_string(), serde_json::Value::Array(rows));
    }

    Ok(serde_json::json!({
        "database": script.database,
        "results": results,
        "tables": tables,
    }))
}

fn print_output(value: &serde_json::Value, format: &OutputFormat) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(value) {
            Ok(s) => println!("{s}"),
            Err(e) => eprintln!("ERROR:{e}"),
        },
        OutputFormat::Yaml => match serde_yaml::to_string(value) {
            Ok(s) => print!("{s}"),
            Err(e) => eprintln!("ERROR:{e}"),
        },
    }
}

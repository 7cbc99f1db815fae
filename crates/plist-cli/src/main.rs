use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use plist_document::{Document, Tree};
use plist_value::Item;

#[derive(Parser)]
#[command(name = "plist", about = "Property list utilities")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print an indexed outline of a property list
    Inspect(Inspect),
    /// Rewrite a property list in canonical XML form
    Format(Format),
    /// Convert a property list to JSON
    ToJson(ToJson),
    /// Convert a JSON file to a property list
    FromJson(FromJson),
}

#[derive(Args)]
struct Inspect {
    /// Path to the property list to inspect
    file: PathBuf,
}

#[derive(Args)]
struct Format {
    /// Path to the property list to reformat
    file: PathBuf,
    /// Write the result back instead of printing it
    #[arg(short, long)]
    in_place: bool,
}

#[derive(Args)]
struct ToJson {
    /// Path to the property list to convert
    file: PathBuf,
}

#[derive(Args)]
struct FromJson {
    /// Path to the JSON file to convert
    file: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect(Inspect { file }) => {
            let item = read_plist(&file)?;
            let mut document = Document::with_root_item(item);
            let mut out = String::new();
            let root = document.tree().root();
            outline(document.tree_mut(), root, "root", &mut out);
            print!("{out}");
        }
        Commands::Format(Format { file, in_place }) => {
            let item = read_plist(&file)?;
            let formatted = plist_xml::write(&item);
            if in_place {
                fs::write(&file, formatted)
                    .with_context(|| format!("failed to write {}", file.display()))?;
            } else {
                print!("{formatted}");
            }
        }
        Commands::ToJson(ToJson { file }) => {
            let item = read_plist(&file)?;
            let value = plist_json::item_to_value(&item)?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Commands::FromJson(FromJson { file }) => {
            let contents = fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let value: serde_json::Value = serde_json::from_str(&contents)
                .with_context(|| format!("{} is not valid JSON", file.display()))?;
            let item = plist_json::value_to_item(&value)?;
            print!("{}", plist_xml::write(&item));
        }
    }
    Ok(())
}

fn read_plist(file: &PathBuf) -> anyhow::Result<Item> {
    let contents =
        fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
    plist_xml::read(&contents).with_context(|| format!("{} is not a property list", file.display()))
}

/// One line per node: its label, kind, and a short value summary. Children
/// are materialised through the tree so the outline reflects exactly what a
/// retained view of the document would show.
fn outline(tree: &mut Tree, node: plist_document::NodeId, label: &str, out: &mut String) {
    let depth = tree.index_path(node).len();
    let item = tree.item(node);
    out.push_str(&"  ".repeat(depth));
    out.push_str(&format!("{label}: {} = {item}\n", item.kind()));
    for index in 0..tree.child_count(node) {
        let child = tree.child(node, index);
        let label = match tree.item(node) {
            Item::Dictionary(dictionary) => match dictionary.pair(index) {
                Some(pair) => pair.key.clone(),
                None => index.to_string(),
            },
            _ => index.to_string(),
        };
        outline(tree, child, &label, out);
    }
}

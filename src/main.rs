use std::path::PathBuf;
use std::process;

use clap::Parser;
use url::Url;

use docstyle::css::{Property, StyleEntry, StyleSheet};

#[derive(Parser, Debug)]
#[command(name = "docstyle")]
#[command(about = "Cascade inspector: load stylesheets and dump resolved rules")]
struct Args {
    /// Stylesheet files to load, in cascade order
    stylesheets: Vec<PathBuf>,

    /// Selector chain to resolve, e.g. "html body p.warn"
    #[arg(long)]
    selector: Option<String>,

    /// Inline declaration text to parse and dump, e.g. "color:red"
    #[arg(long)]
    declaration: Option<String>,

    /// Use the standards 96-dpi unit table instead of the legacy one
    #[arg(long, default_value_t = false)]
    w3c_units: bool,

    /// Rebase the absolute font-size table to this base point size
    #[arg(long)]
    base_size: Option<i32>,
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    let sheet = StyleSheet::new();

    if args.w3c_units {
        sheet.add_rule("W3C_LENGTH_UNITS_ENABLE");
    }
    if let Some(base) = args.base_size {
        sheet.add_rule(&format!("BASE_SIZE {}", base));
    }

    for path in &args.stylesheets {
        let css = match std::fs::read_to_string(path) {
            Ok(css) => css,
            Err(e) => {
                eprintln!("Error: cannot read {}: {}", path.display(), e);
                process::exit(1);
            }
        };
        let base = std::fs::canonicalize(path)
            .ok()
            .and_then(|p| Url::from_file_path(p).ok());
        sheet.load_rules(&css, base.as_ref());
        log::info!("loaded {}", path.display());
    }

    if let Some(decl) = &args.declaration {
        println!("declaration {{");
        let attrs = sheet.get_declaration(decl);
        for (key, value) in attrs.iter() {
            println!("  {}: {};", key.name(), value.to_css_string());
        }
        println!("}}");
    }

    if let Some(selector) = &args.selector {
        let style = sheet.get_rule(selector);
        println!("resolved \"{}\"", style.name());

        println!("matched rules:");
        for entry in style.entries() {
            match entry {
                StyleEntry::Rule(rule) => {
                    println!("  {} (specificity {})", rule.name(), rule.specificity())
                }
                StyleEntry::Extended(style) => {
                    println!("  [linked sheet: {}]", style.name())
                }
                StyleEntry::Empty => {}
            }
        }

        println!("effective declarations:");
        for key in Property::ALL {
            if let Some(value) = style.get(key) {
                println!("  {}: {};", key.name(), value.to_css_string());
            }
        }
    }

    if args.selector.is_none() && args.declaration.is_none() {
        eprintln!("Nothing to do: pass --selector or --declaration");
    }
}

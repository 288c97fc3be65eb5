use anyhow::{Context, Result};
use markdown_expand_config::Config;
use markdown_expand_engine::{Expansion, io};
use std::{
    env,
    path::{Path, PathBuf},
    process,
};

#[derive(Debug, PartialEq)]
struct Args {
    source: PathBuf,
    output_root: Option<PathBuf>,
    dry_run: bool,
}

fn parse_args(args: &[String]) -> Option<Args> {
    let mut dry_run = false;
    let mut positional = Vec::new();

    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--dry-run" | "-n" => dry_run = true,
            flag if flag.starts_with('-') => return None,
            path => positional.push(PathBuf::from(path)),
        }
    }

    let mut positional = positional.into_iter();
    let source = positional.next()?;
    let output_root = positional.next();
    if positional.next().is_some() {
        return None;
    }

    Some(Args {
        source,
        output_root,
        dry_run,
    })
}

fn summary_lines(expansion: &Expansion, output_root: &Path, dry_run: bool) -> Vec<String> {
    if expansion.documents.is_empty() {
        return vec!["No level-1 headings found, nothing to expand".to_string()];
    }

    let verb = if dry_run { "would write" } else { "wrote" };
    expansion
        .documents
        .iter()
        .map(|doc| {
            format!(
                "{verb} {} ({:?})",
                doc.relative_path.to_path(output_root).display(),
                doc.title
            )
        })
        .collect()
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let program_name = args
        .first()
        .cloned()
        .unwrap_or_else(|| "markdown-expand".to_string());

    let Some(cli) = parse_args(&args) else {
        eprintln!("Usage: {program_name} [--dry-run] <source.md> [output-dir]");
        process::exit(1);
    };

    let config = match Config::load() {
        Ok(Some(config)) => {
            log::debug!("Loaded config from {}", Config::config_path().display());
            config
        }
        Ok(None) => Config::default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    let output_root = cli
        .output_root
        .clone()
        .unwrap_or_else(|| config.output_root_for(&cli.source));
    let options = config.expand_options();

    let expansion = if cli.dry_run {
        io::plan_expansion(&cli.source, &output_root, &options)
    } else {
        io::expand_file(&cli.source, &output_root, &options)
    }
    .with_context(|| format!("Failed to expand {}", cli.source.display()))?;

    for line in summary_lines(&expansion, &output_root, cli.dry_run) {
        println!("{line}");
    }

    Ok(())
}

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use faultline::{
    apply_code_change, apply_patches, extract_entities_from_directory, get_patch, BugRewrite,
    CheckoutGuard, CodeEntity,
};
use similar::{ChangeTag, TextDiff};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "faultline")]
#[command(about = "Multi-language code entity extraction and fault injection", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract code entities (functions, methods, constructors) from a directory
    Extract {
        /// Directory to scan
        #[arg(short, long)]
        dir: PathBuf,

        /// Include test files and directories in the scan
        #[arg(long)]
        include_tests: bool,

        /// Cap the number of entities collected per file
        #[arg(short, long)]
        max_entities: Option<usize>,

        /// Emit the entity list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replace one extracted entity with its placeholder stub and capture the patch
    Stub {
        /// Repository checkout to mutate
        #[arg(short, long)]
        repo: PathBuf,

        /// Index of the entity in extraction order (see `extract`)
        #[arg(short, long)]
        index: usize,

        /// Show a unified diff of the entity before and after
        #[arg(long)]
        diff: bool,

        /// Leave the mutation in the working tree instead of resetting
        #[arg(long)]
        keep_changes: bool,
    },

    /// Capture the current working-tree changes of a repository as a patch
    ShowPatch {
        /// Repository checkout to diff
        #[arg(short, long)]
        repo: PathBuf,

        /// Leave the working tree as-is instead of resetting after capture
        #[arg(long)]
        keep_changes: bool,
    },

    /// Apply patch files in order and print the validated combined patch
    ApplyPatches {
        /// Repository checkout to apply against
        #[arg(short, long)]
        repo: PathBuf,

        /// Patch files, applied in the given order
        #[arg(required = true)]
        patches: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            dir,
            include_tests,
            max_entities,
            json,
        } => cmd_extract(dir, include_tests, max_entities, json),

        Commands::Stub {
            repo,
            index,
            diff,
            keep_changes,
        } => cmd_stub(repo, index, diff, keep_changes),

        Commands::ShowPatch { repo, keep_changes } => cmd_show_patch(repo, keep_changes),

        Commands::ApplyPatches { repo, patches } => cmd_apply_patches(repo, patches),
    }
}

fn cmd_extract(
    dir: PathBuf,
    include_tests: bool,
    max_entities: Option<usize>,
    json: bool,
) -> Result<()> {
    let entities = extract_entities_from_directory(&dir, !include_tests, max_entities);

    if json {
        println!("{}", serde_json::to_string_pretty(&entities)?);
        return Ok(());
    }

    for (index, entity) in entities.iter().enumerate() {
        println!(
            "{:>4}  {}  {}",
            index,
            entity.name.bold(),
            format!(
                "{}:{}-{}",
                entity.file_path.display(),
                entity.line_start,
                entity.line_end
            )
            .dimmed()
        );
        println!(
            "      {}  complexity {}",
            entity.signature.dimmed(),
            entity.complexity
        );
    }
    println!();
    println!("{} entities from {}", entities.len(), dir.display());

    Ok(())
}

fn cmd_stub(repo: PathBuf, index: usize, show_diff: bool, keep_changes: bool) -> Result<()> {
    let entities = extract_entities_from_directory(&repo, true, None);
    let entity = entities.get(index).with_context(|| {
        format!(
            "entity index {index} out of range ({} entities extracted)",
            entities.len()
        )
    })?;

    let guard = CheckoutGuard::new(&repo)?;
    guard.validate_path(&entity.file_path)?;

    let bug = BugRewrite::stub_of(entity);
    if show_diff {
        display_diff(entity, &bug.rewrite);
    }

    apply_code_change(entity, &bug.rewrite)?;
    println!(
        "{} stubbed {} in {}",
        "✓".green(),
        entity.name.bold(),
        entity.file_path.display()
    );

    match get_patch(&repo, !keep_changes)? {
        Some(patch) => print!("{patch}"),
        None => println!("{}", "no changes captured".yellow()),
    }

    Ok(())
}

fn cmd_show_patch(repo: PathBuf, keep_changes: bool) -> Result<()> {
    match get_patch(&repo, !keep_changes)? {
        Some(patch) => print!("{patch}"),
        None => println!("{}", "working tree is clean".yellow()),
    }
    Ok(())
}

fn cmd_apply_patches(repo: PathBuf, patches: Vec<PathBuf>) -> Result<()> {
    match apply_patches(&repo, &patches)? {
        Some(combined) => {
            println!(
                "{} {} patches compose cleanly",
                "✓".green(),
                patches.len()
            );
            print!("{combined}");
            Ok(())
        }
        None => {
            println!(
                "{} patch composition failed, repository rolled back",
                "✗".red()
            );
            std::process::exit(1);
        }
    }
}

/// Show a unified diff between the entity's source and its replacement.
fn display_diff(entity: &CodeEntity, rewrite: &str) {
    println!(
        "\n{}",
        format!("--- {} (original)", entity.file_path.display()).dimmed()
    );
    println!(
        "{}",
        format!("+++ {} (rewritten)", entity.file_path.display()).dimmed()
    );

    let diff = TextDiff::from_lines(entity.src_code.as_str(), rewrite);

    for change in diff.iter_all_changes() {
        let line = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => format!(" {}", change).normal(),
        };
        print!("{}", line);
    }
    println!();
}

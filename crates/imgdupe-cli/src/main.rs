use anyhow::bail;
use clap::Parser;
use imgdupe_core::discovery::{self, TargetKind};
use imgdupe_core::{actions, Config, Deduper, HashKind, Report};
use log::{warn, LevelFilter};
use std::fs;
use std::io::{self, BufRead};
use std::path::PathBuf;

/// Find and manage visually duplicate images.
#[derive(Parser)]
#[command(name = "imgdupe")]
#[command(version)]
#[command(about = "Discover visually duplicate images and optionally move, copy or delete them")]
#[command(after_help = "\
Examples:
  Compare two images:
      imgdupe duplicate/image.jpg duplicate/image-copy.jpg
  Find duplicates of target/image.jpg in path/to/images:
      imgdupe target/image.jpg path/to/images
  Find any duplicate images across two directories:
      imgdupe path/to/images other/path/to/images
  Find and delete duplicates in a tree:
      imgdupe --recursive --delete path/to/images
  Read a file listing from stdin and write CSV to a file:
      cat images.txt | imgdupe --search -o - > duplicates.csv")]
struct Cli {
    /// Image files or directories to search; `-` reads newline-delimited
    /// paths from standard input
    #[arg(required = true)]
    targets: Vec<String>,

    /// Search for images in subdirectories of any target directories
    #[arg(short, long)]
    recursive: bool,

    /// Run with info-level logging
    #[arg(short, long)]
    verbose: bool,

    /// Suppress info output and only emit results, for piping
    #[arg(short, long)]
    output: bool,

    /// Suppress all output
    #[arg(short, long)]
    quiet: bool,

    /// Move duplicate images into the given directory, one subdirectory per group
    #[arg(short, long, value_name = "DIR")]
    r#move: Option<PathBuf>,

    /// Same as --move but copies the files instead
    #[arg(short, long, value_name = "DIR")]
    copy: Option<PathBuf>,

    /// Delete all secondary instances of each duplicate group
    #[arg(short, long)]
    delete: bool,

    /// Delete every instance of each duplicate group
    #[arg(long)]
    delete_all: bool,

    /// Which perceptual hash to use
    #[arg(long, default_value = "dct", value_parser = parse_hash)]
    hash: HashKind,

    /// Search radius override; smaller values are more restrictive
    #[arg(long, value_name = "N")]
    threshold: Option<u32>,

    /// Force a many-to-many search even when the first argument is an image
    #[arg(long)]
    search: bool,
}

fn parse_hash(name: &str) -> Result<HashKind, String> {
    HashKind::from_name(name).ok_or_else(|| format!("unknown hash '{name}' (expected dhash or dct)"))
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Info
        } else {
            LevelFilter::Warn
        })
        .parse_default_env()
        .init();

    let targets = gather_targets(&cli.targets)?;

    // Collect concrete image files, remembering whether the first target was
    // itself an image (that selects one-to-many mode).
    let mut files: Vec<PathBuf> = Vec::new();
    let mut image_target = false;
    for (i, target) in targets.iter().enumerate() {
        let path = PathBuf::from(target);
        match discovery::classify(&path) {
            TargetKind::ImageFile => {
                if i == 0 {
                    image_target = true;
                }
                files.push(path);
            }
            TargetKind::Directory => {
                files.extend(discovery::find_images(&path, cli.recursive));
            }
            TargetKind::Other => {
                warn!("skipping {}: not an image or directory", path.display());
            }
        }
    }
    if files.len() <= 1 {
        bail!("not enough images provided");
    }

    let config = Config {
        hash: cli.hash,
        threshold: cli.threshold,
        recursive: cli.recursive,
        workers: 0,
    };
    config.validate()?;
    let deduper = Deduper::new(config);

    let report = if image_target && !cli.search {
        deduper.compare(&files[0], &files[1..])?
    } else {
        deduper.duplicates(&files)?
    };

    let mut error_count = 0;
    for failure in &report.failures {
        warn!("{failure}");
        error_count += 1;
    }

    let silent = cli.output || cli.quiet;
    if report.total == 0 {
        if !silent {
            println!("No duplicate images found");
        }
    } else {
        if !silent {
            if image_target && !cli.search {
                println!(
                    "These {} images are duplicates of {}",
                    report.total,
                    files[0].display()
                );
            } else {
                println!("These {} images are duplicates", report.total);
            }
        }
        if !cli.quiet {
            write_csv(&report)?;
        }
        error_count += apply_actions(&cli, &report);
    }

    if error_count > 0 {
        bail!("{error_count} files could not be processed");
    }
    Ok(())
}

/// Resolve the positional arguments, switching to a stdin listing when `-`
/// appears among them.
fn gather_targets(args: &[String]) -> Result<Vec<String>, anyhow::Error> {
    if !args.iter().any(|a| a == "-") {
        return Ok(args.to_vec());
    }
    let mut targets = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line?;
        targets.extend(line.split_whitespace().map(str::to_string));
    }
    Ok(targets)
}

/// One CSV row per group, no header, flushed before returning.
fn write_csv(report: &Report) -> Result<(), anyhow::Error> {
    let mut w = csv::Writer::from_writer(io::stdout());
    for group in &report.groups {
        w.write_record(group.iter().map(|p| p.to_string_lossy().into_owned()))?;
    }
    w.flush()?;
    Ok(())
}

/// Apply the requested move/copy/delete to each group; returns the number of
/// files that could not be processed.
fn apply_actions(cli: &Cli, report: &Report) -> usize {
    let mut error_count = 0;
    if let Some(dir) = &cli.r#move {
        for (i, group) in report.groups.iter().enumerate() {
            let parent = dir.join(format!("group{i}"));
            if let Err(e) = fs::create_dir_all(&parent) {
                warn!("unable to create {}: {e}", parent.display());
                error_count += group.len();
                continue;
            }
            error_count += drain_failures(actions::move_files(group, &parent));
        }
    } else if let Some(dir) = &cli.copy {
        for (i, group) in report.groups.iter().enumerate() {
            let parent = dir.join(format!("group{i}"));
            if let Err(e) = fs::create_dir_all(&parent) {
                warn!("unable to create {}: {e}", parent.display());
                error_count += group.len();
                continue;
            }
            error_count += drain_failures(actions::copy_files(group, &parent));
        }
    } else if cli.delete || cli.delete_all {
        for group in &report.groups {
            let victims = if cli.delete_all {
                &group[..]
            } else {
                // keep the group seed
                &group[1..]
            };
            error_count += drain_failures(actions::delete_files(victims));
        }
    }
    error_count
}

fn drain_failures(failures: Vec<imgdupe_core::Error>) -> usize {
    for f in &failures {
        warn!("{f}");
    }
    failures.len()
}

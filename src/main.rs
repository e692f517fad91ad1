use std::{
    io::{self, Write},
    path::Path,
};

mod config;
mod date;
mod error;
mod fs;
mod organize;

use config::Args;
use error::Result;
use fs::{FileSystem, LocalFs};
use organize::{Options, Plan, Summary};

fn main() {
    if let Err(e) = run(Args::parse()) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let root = Path::new(args.path());
    let options = args.options();

    if args.dry_run {
        dry_run(&LocalFs, root, &options, &mut io::stdout().lock())?;
    } else {
        let summary = organize::organize(&LocalFs, root, &options)?;
        print_summary(&summary, args.verbose)?;
    }

    Ok(())
}

/// Scans and plans, then prints the plan. Nothing is created or moved.
fn dry_run(
    fs: &impl FileSystem,
    root: &Path,
    options: &Options,
    handle: &mut impl Write,
) -> Result<()> {
    let files = organize::scan(fs, root, options)?;
    pretty_print_plan(&organize::plan(root, &files), handle)?;
    Ok(())
}

fn pretty_print_plan(plan: &Plan, handle: &mut impl Write) -> io::Result<()> {
    if plan.is_empty() {
        writeln!(handle, "Nothing to organize")?;
        return Ok(());
    }

    for bucket in plan.buckets() {
        writeln!(
            handle,
            "{}\n================================================================",
            bucket.destination(plan.root()).display(),
        )?;

        for path in &bucket.files {
            writeln!(handle, "{}", path.display())?;
        }
        writeln!(handle)?;
    }

    writeln!(
        handle,
        "{} files into {} folders",
        plan.len(),
        plan.buckets().len()
    )?;
    Ok(())
}

fn print_summary(summary: &Summary, verbose: bool) -> io::Result<()> {
    let mut handle = io::stdout().lock();

    if verbose {
        for entry in &summary.moves {
            writeln!(handle, "{} -> {}", entry.from.display(), entry.to.display())?;
        }
    }

    writeln!(
        handle,
        "Moved {} files ({} new folders, {} already in place)",
        summary.moves.len(),
        summary.folders_created.len(),
        summary.in_place,
    )?;
    Ok(())
}

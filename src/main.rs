mod archive;
mod args;
mod context;
mod error;
mod manifest;
mod pack;
mod result;
mod utils;

use args::Args;
use context::Context;
use manifest::Manifest;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> result::Result<()> {
    // Parse command-line arguments
    let Args {
        verbose,
        path,
        config,
        source,
        output,
        name,
    } = Args::parse();

    let ctx = Context::from_path(path.as_deref(), verbose)?;

    cliclack::intro("tcxpack")?;

    // Resolve configuration: defaults, then config file, then command line
    let mut manifest = Manifest::load(&ctx, config.as_deref())?;
    manifest.apply(source, output, name);
    manifest.validate()?;
    let paths = manifest.paths(&ctx);

    if ctx.verbose {
        cliclack::log::info(format!(
            "Source: {}\nOutput: {}",
            paths.source_dir.display(),
            paths.final_path.display()
        ))?;
    }

    pack::check_source(&paths)?;

    // Delete the output folder, if it exists
    if paths.output_dir.exists() {
        let spinner = cliclack::spinner();
        spinner.start("Deleting old files, please wait...");
        match pack::clean_output(&paths) {
            Ok(_) => spinner.stop("Old files deleted"),
            Err(e) => {
                spinner.error("Failed to delete old files");
                return Err(e);
            }
        }
    }

    pack::initialize(&paths)?;

    // Copy sources to the archive
    let spinner = cliclack::spinner();
    spinner.start("Packing files, please wait...");
    let summary = match pack::pack(&ctx, &paths) {
        Ok(summary) => summary,
        Err(e) => {
            spinner.error("Packing failed");
            return Err(e);
        }
    };
    spinner.stop(format!(
        "Packed {} files in {} folders",
        summary.files, summary.directories
    ));

    pack::finish(&paths)?;

    cliclack::log::success(format!("Script extension file: {}", paths.final_path.display()))?;
    cliclack::outro("Ready!")?;
    Ok(())
}

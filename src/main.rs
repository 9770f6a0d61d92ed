mod assets;
mod config;
mod core;
mod markdown;

use crate::config::Config;
use crate::core::Context;
use anyhow::Result;
use argh::FromArgs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

/// Build a one-page documentation site from a Markdown file.
#[derive(FromArgs)]
struct Args {
    /// project root; other paths are relative to it (default: .)
    #[argh(option, default = "PathBuf::from(\".\")")]
    root: PathBuf,

    /// markdown source (default: docs.md)
    #[argh(option)]
    source: Option<PathBuf>,

    /// output page (default: index.html)
    #[argh(option)]
    output: Option<PathBuf>,

    /// directory with header.html, sidebar.html, and footer.html (default: assets/includes)
    #[argh(option)]
    includes: Option<PathBuf>,

    /// write the default template fragments into the includes directory and exit
    #[argh(switch)]
    init: bool,

    /// print the page instead of writing the output file
    #[argh(switch)]
    stdout: bool,
}

fn run(args: Args) -> Result<()> {
    let mut config = Config::load(&args.root)?;
    if let Some(source) = args.source {
        config.source = source;
    }
    if let Some(output) = args.output {
        config.output = output;
    }
    if let Some(includes) = args.includes {
        config.includes = includes;
    }
    let ctx = Context::new(&args.root, config);

    if args.init {
        ctx.init_fragments()?;
    } else if args.stdout {
        ctx.render_page(&mut io::stdout().lock())?;
    } else {
        ctx.build()?;
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let args: Args = argh::from_env();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

mod error;
mod search;
mod site;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sab_format::SabFile;

#[derive(Parser)]
enum ProgMode {
    /// Full two-pass site build: scan the archive, convert every file to HTML.
    Build(BuildArgs),
    /// Convert a single SAB file to its XML intermediate.
    Xml(InputOutputArgs),
    /// Convert a single SAB file to a standalone HTML page (no registry: links degrade to `#`).
    Html(InputOutputArgs),
    /// Debug-dump a single file's index-only fast path.
    Index(InputFileOnlyArgs),
}

#[derive(Parser)]
struct BuildArgs {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    #[arg(long)]
    pub emit_xml: bool,
}

#[derive(Parser)]
struct InputOutputArgs {
    pub input_file: PathBuf,
    pub output_file: PathBuf,
}

#[derive(Parser)]
struct InputFileOnlyArgs {
    pub input_file: PathBuf,
}

fn main() {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let mode = ProgMode::parse();
    match mode {
        ProgMode::Build(args) => {
            site::build(&args.input_dir, &args.output_dir, args.emit_xml);
        },
        ProgMode::Xml(args) => {
            let data = std::fs::read(&args.input_file).expect("failed to read input file");
            let file = SabFile::read(&data).expect("failed to read SAB file");
            let source_path = args.input_file.to_string_lossy();
            let xml = sab_xml::emit_xml(&file, &source_path).expect("failed to emit XML");
            std::fs::write(&args.output_file, &xml).expect("failed to write output file");
        },
        ProgMode::Html(args) => {
            let data = std::fs::read(&args.input_file).expect("failed to read input file");
            let file = SabFile::read(&data).expect("failed to read SAB file");
            let title = search::page_title(&file.records);
            let html = sab_html::render_records_to_html(&file.records, &file.index, None, None, &title);
            let html = html
                .replace("{{CSS_PATH}}", "style.css")
                .replace("{{INDEX_PATH}}", "index.html")
                .replace("{{LOGO_PATH}}", "logo.png")
                .replace("{{SEARCH_JS_PATH}}", "search.js");
            std::fs::write(&args.output_file, &html).expect("failed to write output file");
        },
        ProgMode::Index(args) => {
            let data = std::fs::read(&args.input_file).expect("failed to read input file");
            let index = sab_format::read_index_only(&data).expect("failed to read index");
            println!("{:#?}", index);
        },
    }
}

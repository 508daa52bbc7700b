//! pathway_forte command-line entry point

use clap::Parser;
use log::{info, LevelFilter};

use pathway_forte::cli::{Cli, Commands};
use pathway_forte::error::Result;
use pathway_forte::expression::{run_expression_analysis, DeseqRscriptEngine};
use pathway_forte::pathway::{
    merge_spia_files, EmptyHierarchy, EquivalenceMapping, FileHierarchy, MergeConfig,
    MergeSummary,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Some(Commands::Diffexp {
            counts,
            design,
            gene_column,
            output,
            rscript,
        }) => run_diffexp(&counts, &design, &gene_column, &output, &rscript),
        Some(Commands::MergeSpia {
            kegg,
            reactome,
            wikipathways,
            mappings,
            hierarchy,
            output,
        }) => run_merge_spia(
            &kegg,
            &reactome,
            &wikipathways,
            &mappings,
            hierarchy.as_deref(),
            &output,
        ),
        None => {
            println!("pathway_forte v{}", VERSION);
            println!("Run `pathway_forte --help` for usage.");
            return;
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_diffexp(
    counts: &str,
    design: &str,
    gene_column: &str,
    output: &str,
    rscript: &str,
) -> Result<()> {
    let engine = DeseqRscriptEngine::new(rscript)?;
    let results = run_expression_analysis(&engine, counts, design, gene_column, output)?;
    info!(
        "Done! {} genes analyzed, {} significant at padj < 0.05",
        results.n_genes(),
        results.significant_genes(0.05).len()
    );
    Ok(())
}

fn run_merge_spia(
    kegg: &str,
    reactome: &str,
    wikipathways: &str,
    mappings_path: &str,
    hierarchy_path: Option<&str>,
    output: &str,
) -> Result<()> {
    let mappings = EquivalenceMapping::from_csv_file(mappings_path)?;
    info!(
        "Loaded equivalence mappings for {} pathways from {}",
        mappings.len(),
        mappings_path
    );

    let config = MergeConfig {
        kegg_dir: kegg.into(),
        reactome_dir: reactome.into(),
        wikipathways_dir: wikipathways.into(),
        output_dir: output.into(),
    };

    let summary: MergeSummary = match hierarchy_path {
        Some(path) => {
            let hierarchy = FileHierarchy::from_json_file(path)?;
            merge_spia_files(&config, &mappings, &hierarchy)?
        }
        None => merge_spia_files(&config, &mappings, &EmptyHierarchy)?,
    };

    info!(
        "Done! {} workbooks written to {}",
        summary.written, output
    );
    Ok(())
}

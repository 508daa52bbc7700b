//! Command-line interface for pathway_forte

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pathway_forte")]
#[command(version)]
#[command(about = "Pathway enrichment tooling: differential expression and SPIA dataset merging")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run differential expression analysis through DESeq2
    #[command(
        about = "Run differential expression analysis through DESeq2",
        long_about = "Run differential expression analysis through DESeq2\n\n\
            Loads a count matrix and a sample design matrix, fits the model\n\
            ~ class_label in an R subprocess and writes the per-gene results\n\
            table with the gene identifiers re-attached.",
        after_long_help = "\
Examples:
  # Counts with a gene_symbol column, design with a class_label column
  pathway_forte diffexp -c counts.csv -m design.csv -g gene_symbol

  # Custom output path and R installation
  pathway_forte diffexp -c counts.csv -m design.csv -g gene_symbol \\
    -o lihc_results.csv --rscript /opt/R/bin/Rscript"
    )]
    Diffexp {
        /// Path to count matrix CSV file
        #[arg(short, long,
            long_help = "Path to count matrix file.\n\
                Format: one gene identifier column (see --gene-column), all\n\
                remaining columns are raw counts per sample. Comma and tab\n\
                delimiters are auto-detected.")]
        counts: String,

        /// Path to sample design matrix CSV file
        #[arg(short = 'm', long,
            long_help = "Path to sample design matrix file.\n\
                Format: first column = sample IDs, remaining columns =\n\
                covariates. Must contain a class_label column.")]
        design: String,

        /// Name of the gene identifier column [default: gene_symbol]
        #[arg(short, long, default_value = "gene_symbol")]
        gene_column: String,

        /// Output file path [default: results.csv]
        #[arg(short, long, default_value = "results.csv")]
        output: String,

        /// Path to the Rscript executable
        #[arg(long, default_value = "Rscript",
            long_help = "Path to the Rscript executable of an R installation\n\
                with DESeq2 available.")]
        rscript: String,
    },

    /// Merge pathway graphs and export SPIA connectivity matrices
    #[command(
        about = "Merge pathway graphs and export SPIA connectivity matrices",
        long_about = "Merge pathway graphs and export SPIA connectivity matrices\n\n\
            Enumerates serialized pathway graphs under the three source\n\
            directories, merges cross-database equivalence groups from the\n\
            mapping table and writes one .xlsx workbook per pathway.\n\
            Existing workbooks are never overwritten, so an interrupted run\n\
            can be resumed by re-running the command.",
        after_long_help = "\
Examples:
  pathway_forte merge-spia --kegg bel/kegg --reactome bel/reactome \\
    --wikipathways bel/wikipathways --mappings mappings.csv -o spia

  # With the Reactome pathway hierarchy for sub-pathway expansion
  pathway_forte merge-spia --kegg bel/kegg --reactome bel/reactome \\
    --wikipathways bel/wikipathways --mappings mappings.csv \\
    --hierarchy reactome_hierarchy.json -o spia"
    )]
    MergeSpia {
        /// Directory of KEGG pathway graph files
        #[arg(long)]
        kegg: String,

        /// Directory of Reactome pathway graph files
        #[arg(long)]
        reactome: String,

        /// Directory of WikiPathways pathway graph files
        #[arg(long)]
        wikipathways: String,

        /// Path to the ComPath-style equivalence mapping CSV
        #[arg(long)]
        mappings: String,

        /// Path to the Reactome pathway hierarchy JSON
        #[arg(long,
            long_help = "Path to the Reactome pathway hierarchy JSON, an\n\
                object mapping each parent pathway id to its direct\n\
                children. Without it Reactome pathways load without\n\
                sub-pathway expansion.")]
        hierarchy: Option<String>,

        /// Output directory for the exported workbooks [default: spia]
        #[arg(short, long, default_value = "spia")]
        output: String,
    },
}

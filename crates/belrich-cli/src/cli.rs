use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Log level options for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "bel-enrichment")]
#[command(about = "Generate BEL curation sheets from INDRA statements for under-annotated genes")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path (defaults to ./belrich.toml or $BELRICH_CONFIG)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level for belrich crates; overrides RUST_LOG
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Column separator: a single character, `\t` or `tab`
    #[arg(short = 's', long, global = true)]
    pub sep: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the genes of a graph ranked by information score
    Ranks {
        /// Node-link JSON graph
        graph: PathBuf,

        /// Only print the first N genes
        #[arg(short = 'n', long)]
        number: Option<usize>,
    },

    /// Write curation sheets for the least annotated genes of a graph
    #[command(name = "from-graph", alias = "make-sheet")]
    FromGraph {
        /// Node-link JSON graph
        graph: PathBuf,

        /// Output directory for the per-gene sheets
        #[arg(short = 'o', long, required_unless_present = "single")]
        output: Option<PathBuf>,

        /// Minimum information score of a gene (overrides config)
        #[arg(long)]
        information_cutoff: Option<f64>,

        /// Minimum belief of a statement (overrides config)
        #[arg(long)]
        belief_cutoff: Option<f64>,

        /// Maximum number of rows per sheet
        #[arg(long)]
        limit: Option<usize>,

        /// Keep every evidence of a statement instead of only the first
        #[arg(long)]
        duplicates: bool,

        /// Write one combined sheet to this file instead of one per gene
        #[arg(long)]
        single: Option<PathBuf>,
    },

    /// Write a curation sheet for the statements of some documents
    #[command(name = "from-pmids")]
    FromPmids {
        /// PubMed identifiers
        #[arg(required = true)]
        pmids: Vec<String>,

        /// Output sheet
        #[arg(short = 'o', long)]
        output: PathBuf,

        /// Also dump the raw statements as JSON
        #[arg(long)]
        json: Option<PathBuf>,

        /// Drop evidences from documents that were not queried
        #[arg(long)]
        keep_only_query_pmids: bool,

        /// Keep every evidence of a statement instead of only the first
        #[arg(long)]
        duplicates: bool,

        /// Minimum belief of a statement (overrides config)
        #[arg(long)]
        belief_cutoff: Option<f64>,

        /// Empty column for curators (repeatable)
        #[arg(long = "extra-column", value_name = "NAME")]
        extra_columns: Vec<String>,
    },

    /// Write a curation sheet for the statements about some agents
    #[command(name = "from-agents")]
    FromAgents {
        /// Agent names, e.g. HGNC symbols
        #[arg(required = true)]
        agents: Vec<String>,

        /// Output sheet
        #[arg(short = 'o', long)]
        output: PathBuf,

        /// Also dump the raw statements as JSON
        #[arg(long)]
        json: Option<PathBuf>,

        /// Keep every evidence of a statement instead of only the first
        #[arg(long)]
        duplicates: bool,

        /// Minimum belief of a statement (overrides config)
        #[arg(long)]
        belief_cutoff: Option<f64>,
    },

    /// Compile curated sheets into a BEL graph
    #[command(name = "compile-sheets")]
    CompileSheets {
        /// Directory holding the curated sheets
        directory: PathBuf,

        /// Where to write the compiled graph (defaults to the sheet directory)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Sheet file name suffix
        #[arg(long, default_value = belrich_sheets::DEFAULT_SHEET_SUFFIX)]
        suffix: String,

        /// Recompile even when a cached graph exists
        #[arg(long)]
        no_cache: bool,
    },

    /// Summarize curation results per gene
    #[command(name = "summarize-sheets")]
    SummarizeSheets {
        /// Directory holding the curated sheets
        directory: PathBuf,

        /// Output directory for the summary tables
        #[arg(short = 'o', long)]
        output: PathBuf,

        /// Sheet file name suffix
        #[arg(long, default_value = belrich_sheets::DEFAULT_SHEET_SUFFIX)]
        suffix: String,

        /// Only count activation_edges or inhibition_edges
        #[arg(long)]
        edge_filter: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_make_sheet_alias() {
        let cli = Cli::try_parse_from([
            "bel-enrichment",
            "make-sheet",
            "graph.json",
            "-o",
            "out",
            "--belief-cutoff",
            "0.5",
            "--duplicates",
        ])
        .unwrap();
        match cli.command {
            Commands::FromGraph {
                graph,
                output,
                belief_cutoff,
                duplicates,
                single,
                ..
            } => {
                assert_eq!(graph, PathBuf::from("graph.json"));
                assert_eq!(output, Some(PathBuf::from("out")));
                assert_eq!(belief_cutoff, Some(0.5));
                assert!(duplicates);
                assert!(single.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_from_graph_needs_output_or_single() {
        assert!(Cli::try_parse_from(["bel-enrichment", "from-graph", "graph.json"]).is_err());

        let cli = Cli::try_parse_from(["bel-enrichment", "from-graph", "graph.json", "--single", "all.tsv"])
            .unwrap();
        match cli.command {
            Commands::FromGraph { output, single, .. } => {
                assert!(output.is_none());
                assert_eq!(single, Some(PathBuf::from("all.tsv")));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "bel-enrichment",
            "ranks",
            "graph.json",
            "-n",
            "5",
            "--sep",
            ",",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.sep.as_deref(), Some(","));
        assert_eq!(cli.log_level, Some(LogLevel::Debug));
        assert!(matches!(cli.command, Commands::Ranks { number: Some(5), .. }));
    }

    #[test]
    fn test_from_pmids_requires_ids() {
        assert!(Cli::try_parse_from(["bel-enrichment", "from-pmids", "-o", "x.tsv"]).is_err());
        let cli = Cli::try_parse_from([
            "bel-enrichment",
            "from-pmids",
            "1",
            "2",
            "-o",
            "x.tsv",
            "--extra-column",
            "Checked",
            "--extra-column",
            "Correct",
        ])
        .unwrap();
        match cli.command {
            Commands::FromPmids { pmids, extra_columns, .. } => {
                assert_eq!(pmids, vec!["1", "2"]);
                assert_eq!(extra_columns, vec!["Checked", "Correct"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}

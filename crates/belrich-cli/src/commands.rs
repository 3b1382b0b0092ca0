//! Subcommand handlers.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use belrich_common::Config;
use belrich_indra::{writer::parse_separator, IndraDbClient, SheetFormat, StatementSource};
use belrich_kg::nodelink;
use belrich_ranker::{format_rank, most_common, process_rank_genes};
use belrich_sheets::{count_indra_apis, curation_summary, EdgeFilter, SheetsRepository};
use tracing::{info, warn};

use crate::cli::Commands;
use crate::workflow::{
    export_separate, export_single, genes_from_graph, sheet_from_agents, sheet_from_pmids,
    ExportOptions,
};

/// Run a parsed command. `sep` is the global separator flag.
pub async fn run(command: Commands, config: &Config, sep: Option<&str>) -> Result<()> {
    let separator = sep.unwrap_or(config.curation.separator.as_str());

    match command {
        Commands::Ranks { graph, number } => {
            let stdout = io::stdout();
            write_ranks(&graph, number, separator, &mut stdout.lock())?;
        }

        Commands::FromGraph {
            graph,
            output,
            information_cutoff,
            belief_cutoff,
            limit,
            duplicates,
            single,
        } => {
            let cutoff = information_cutoff.unwrap_or(config.curation.information_cutoff);
            let genes = genes_from_graph(&graph, cutoff)
                .with_context(|| format!("selecting genes from {}", graph.display()))?;
            if genes.is_empty() {
                warn!(cutoff, "No genes reach the information cutoff");
                return Ok(());
            }

            let options = ExportOptions {
                minimum_belief: Some(belief_cutoff.unwrap_or(config.curation.minimum_belief)),
                limit,
                allow_duplicates: duplicates,
                format: SheetFormat::with_separator(separator)?,
                ..ExportOptions::default()
            };
            let source = client(config)?;
            match single {
                Some(path) => {
                    ensure_parent(&path)?;
                    let rows = export_single(&source, &genes, &path, &options).await?;
                    info!(path = %path.display(), rows, "Wrote combined sheet");
                }
                None => {
                    let output = output.ok_or_else(|| anyhow!("--output is required without --single"))?;
                    std::fs::create_dir_all(&output)
                        .with_context(|| format!("creating {}", output.display()))?;
                    export_separate(&source, &genes, &output, &options).await?;
                }
            }
        }

        Commands::FromPmids {
            pmids,
            output,
            json,
            keep_only_query_pmids,
            duplicates,
            belief_cutoff,
            extra_columns,
        } => {
            let options = ExportOptions {
                minimum_belief: Some(belief_cutoff.unwrap_or(config.curation.minimum_belief)),
                allow_duplicates: duplicates,
                format: SheetFormat::with_separator(separator)?.with_extra_columns(extra_columns),
                ..ExportOptions::default()
            };
            let source = client(config)?;
            ensure_parent(&output)?;
            sheet_from_pmids(
                &source,
                &pmids,
                &output,
                json.as_deref(),
                keep_only_query_pmids,
                &options,
            )
            .await?;
        }

        Commands::FromAgents {
            agents,
            output,
            json,
            duplicates,
            belief_cutoff,
        } => {
            let options = ExportOptions {
                minimum_belief: Some(belief_cutoff.unwrap_or(config.curation.minimum_belief)),
                allow_duplicates: duplicates,
                format: SheetFormat::with_separator(separator)?,
                ..ExportOptions::default()
            };
            let source = client(config)?;
            ensure_parent(&output)?;
            sheet_from_agents(&source, &agents, &output, json.as_deref(), &options).await?;
        }

        Commands::CompileSheets {
            directory,
            output,
            suffix,
            no_cache,
        } => {
            let mut repository = SheetsRepository::new(directory).with_suffix(suffix);
            if let Some(output) = output {
                repository = repository.with_output_directory(output);
            }
            let graph = repository.graph(!no_cache)?;
            for (api, count) in count_indra_apis(&graph) {
                info!(api = %api, count, "INDRA API");
            }
            if !graph.warnings().is_empty() {
                warn!(warnings = graph.warnings().len(), "Some curated rows could not be compiled");
            }
        }

        Commands::SummarizeSheets {
            directory,
            output,
            suffix,
            edge_filter,
        } => {
            let edge_filter = edge_filter
                .as_deref()
                .map(str::parse::<EdgeFilter>)
                .transpose()?;
            curation_summary(&directory, &output, &suffix, edge_filter)?;
        }
    }

    Ok(())
}

/// Print the genes of the graph at `graph`, most informative first.
fn write_ranks(graph: &Path, number: Option<usize>, separator: &str, out: &mut impl Write) -> Result<()> {
    let bel = nodelink::from_path(graph).with_context(|| format!("reading graph {}", graph.display()))?;
    let ranks = process_rank_genes(&bel);
    let sep = char::from(parse_separator(separator)?).to_string();
    for rank in most_common(&ranks, number) {
        writeln!(out, "{}", format_rank(rank, &sep))?;
    }
    Ok(())
}

fn client(config: &Config) -> Result<impl StatementSource> {
    info!(url = config.indra.url(), "Using INDRA DB REST service");
    Ok(IndraDbClient::new(&config.indra)?)
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    Ok(())
}

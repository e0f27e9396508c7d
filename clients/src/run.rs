//! One end-to-end run: load, translate, then print or publish.

use std::io::Write;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use km_codegen::{TranslationReport, Translator};
use km_ontology::{enumerate, loader, LabelMap};
use km_publisher::{HttpKmClient, KmClient, PublishReport, PublishScheduler};
use tracing::info;

use crate::config::Settings;

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Translation only; the frames were written out.
    Translated {
        /// Frame counts.
        report: TranslationReport,
    },
    /// Translated and published.
    Published {
        /// Frame counts.
        translation: TranslationReport,
        /// Publish accounting.
        publish: PublishReport,
    },
}

/// Runs against the KM server named in `settings`.
///
/// # Errors
///
/// Fails if the HTTP client cannot be built or [`run_with_client`] fails.
pub async fn run<W: Write>(settings: &Settings, out: &mut W) -> Result<RunOutcome> {
    let client = HttpKmClient::new(settings.km.clone()).context("Failed to create KM client")?;
    info!(url = %client.url(), "KM client ready");
    run_with_client(settings, Arc::new(client), out).await
}

/// Runs with an explicit client.
///
/// In translate-only mode every frame is written to `out`, one per line.
/// Otherwise the frames are published and the summary is written to `out`.
/// Publish failures are reported, not returned as errors.
///
/// # Errors
///
/// Fails if the ontology cannot be loaded or `out` cannot be written.
pub async fn run_with_client<W: Write>(
    settings: &Settings,
    client: Arc<dyn KmClient>,
    out: &mut W,
) -> Result<RunOutcome> {
    let path = settings
        .run
        .ontology
        .as_deref()
        .context("No ontology file configured")?;
    let graph = loader::load(path, settings.run.format)
        .with_context(|| format!("Failed to load ontology {}", path.display()))?;

    let labels = LabelMap::extract(&graph);
    let entities = enumerate(&graph).into_vec();
    let translator = Translator::new(&graph, &labels, &settings.naming_options());

    let start = Instant::now();
    let translated = translator.translate_all(&entities);
    let translation = TranslationReport::new(&translated, start.elapsed());
    info!(
        classes = translation.class_count,
        properties = translation.property_count,
        individuals = translation.individual_count,
        elapsed_ms = translation.elapsed.as_millis(),
        "Translation finished"
    );

    if settings.run.translate_only {
        for t in &translated {
            info!(entity = %t.entity, expression = %t.expression, "Generated");
            writeln!(out, "{}", t.expression).context("Failed to write expression")?;
        }
        return Ok(RunOutcome::Translated {
            report: translation,
        });
    }

    let scheduler = PublishScheduler::new(client, settings.scheduler_config());
    let items = translated
        .into_iter()
        .map(|t| (t.entity, t.expression))
        .collect();
    let publish = scheduler
        .run(items, |entity, expression| {
            translator.references(entity, expression)
        })
        .await;

    for line in publish.summary_lines() {
        info!("{line}");
        writeln!(out, "{line}").context("Failed to write summary")?;
    }
    for entity in &publish.stuck {
        info!(%entity, "Stuck entity");
    }

    Ok(RunOutcome::Published {
        translation,
        publish,
    })
}

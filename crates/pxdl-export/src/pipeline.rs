//! One download, end to end.

use pxdl_md::{HistoricalProvider, Market};
use tracing::{debug, info, warn};

use crate::artifact::{self, CsvArtifact};
use crate::csv_out;
use crate::error::DownloadError;
use crate::request::{self, RawDownloadForm};
use crate::shape;

/// Parse, fetch, shape, serialize and name the file.
///
/// Stateless and linear: the provider call is the only await point and is
/// never retried. On any failure nothing partial is returned.
pub async fn run(
    provider: &dyn HistoricalProvider,
    form: &RawDownloadForm,
    market: Market,
) -> Result<CsvArtifact, DownloadError> {
    let req = request::parse(form, market)?;
    info!(
        source = provider.source_name(),
        ticker = %req.ticker,
        start = %req.start_date,
        end = %req.end_date,
        fields = ?req.fields,
        "fetching history"
    );

    let table = provider
        .fetch(&req.ticker, req.start_date, req.end_date, req.interval)
        .await
        .map_err(|e| {
            warn!(ticker = %req.ticker, error = %e, "provider call failed");
            DownloadError::from(e)
        })?;
    debug!(ticker = %req.ticker, rows = table.len(), "provider returned");

    let shaped = shape::shape(&table, &req.fields)?;
    let content = csv_out::serialize(&shaped);
    let artifact = artifact::build(&req, content);

    info!(
        filename = %artifact.filename,
        rows = shaped.len(),
        bytes = artifact.content.len(),
        "export ready"
    );
    Ok(artifact)
}

use tokio::time::{timeout, Instant};

use crate::fetch::decoder;
use crate::fetch::error::FetchError;
use crate::fetch::model::ResponseEnvelope;
use crate::fetch::params::{apply_default_headers, NormalizedParameters};
use crate::fetch::transport::{Transport, TransportRequest};
use crate::observability::metrics::get_metrics;
use crate::utils::logging::debug_log;

/// One attempt: a single transport call plus decoding, raced against
/// `params.timeout()`.
///
/// The timer covers the send and the decode. When it fires first the attempt
/// future is dropped, so a late transport completion is never observed.
pub async fn timed_fetch<T: Transport>(
    transport: &T,
    url: &str,
    params: &NormalizedParameters,
) -> Result<ResponseEnvelope, FetchError> {
    let metrics = get_metrics().await.ok();
    let start = Instant::now();
    let method = params.method.as_str();
    if let Some(metrics) = metrics {
        metrics.fetch_requests.with_label_values(&[method]).inc();
    }

    let request = TransportRequest {
        method: params.method,
        url: url.to_owned(),
        headers: apply_default_headers(&params.headers),
        body: params.body.clone(),
    };

    let attempt = async {
        let response = transport.send(request).await?;
        let data = decoder::decode(url, response.body, params.response_type)?;
        Ok::<_, FetchError>(ResponseEnvelope {
            url: url.to_owned(),
            success: response.ok,
            status_code: response.status,
            response_type: params.response_type,
            data,
        })
    };

    let outcome = match timeout(params.timeout(), attempt).await {
        Ok(outcome) => outcome,
        Err(_) => {
            debug_log!("FetchService->timeout {}", url);
            Err(FetchError::timeout(url))
        }
    };

    if let Some(metrics) = metrics {
        metrics
            .fetch_duration
            .with_label_values(&[method])
            .observe(start.elapsed().as_secs_f64());
    }
    match &outcome {
        Ok(envelope) => debug_log!("{} {} -> {}", method, url, envelope.status_code),
        Err(err) => {
            if let Some(metrics) = metrics {
                metrics.fetch_failures.with_label_values(&[err.reason()]).inc();
            }
            debug_log!("{} {} failed: {}", method, url, err);
        }
    }
    outcome
}

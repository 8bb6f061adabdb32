#[cfg(feature = "lambda")]
use aws_config::BehaviorVersion;
#[cfg(feature = "lambda")]
use aws_sdk_s3::config::Region;
#[cfg(feature = "lambda")]
use aws_sdk_s3::Client as S3Client;
#[cfg(feature = "lambda")]
use house_usage::utils::{logger, validation::Validate};
#[cfg(feature = "lambda")]
use house_usage::{
    LambdaConfig, ReportEngine, RestBookingStore, S3Storage, UsageRecord, UsageReportPipeline,
};
#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
#[cfg(feature = "lambda")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "lambda")]
#[derive(Deserialize)]
pub struct Request {
    /// `YYYY-MM`; omitted means the previous completed month.
    pub month: Option<String>,
    #[serde(default)]
    pub persist: bool,
}

#[cfg(feature = "lambda")]
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub month: String,
    pub records: Vec<UsageRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
}

#[cfg(feature = "lambda")]
fn boxed(e: house_usage::UsageError) -> Error {
    tracing::error!(
        category = ?e.category(),
        severity = ?e.severity(),
        "{}",
        e
    );
    Box::new(e)
}

#[cfg(feature = "lambda")]
async fn function_handler(event: LambdaEvent<Request>) -> Result<Response, Error> {
    let request = event.payload;
    tracing::info!(month = ?request.month, persist = request.persist, "Usage aggregation requested");

    let lambda_config = LambdaConfig::from_env()
        .map_err(boxed)?
        .with_month(request.month);
    lambda_config.validate().map_err(boxed)?;

    let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let s3_config = aws_sdk_s3::config::Builder::from(&config)
        .region(Region::new(lambda_config.s3_region.clone()))
        .force_path_style(true)
        .build();
    let s3_client = S3Client::from_conf(s3_config);

    let store = RestBookingStore::from_config(&lambda_config).map_err(boxed)?;
    let storage = S3Storage::new(
        s3_client,
        lambda_config.s3_bucket.clone(),
        lambda_config.s3_prefix.clone(),
    );
    let engine = ReportEngine::new(UsageReportPipeline::new(store, storage, lambda_config));

    let response = if request.persist {
        let outcome = engine.run().await.map_err(boxed)?;
        Response {
            month: outcome.month,
            records: outcome.records,
            output_path: Some(outcome.output_path),
        }
    } else {
        let report = engine.preview().await.map_err(boxed)?;
        Response {
            month: report.window.label(),
            records: report.records,
            output_path: None,
        }
    };

    tracing::info!(
        month = %response.month,
        houses = response.records.len(),
        "Usage aggregation completed"
    );
    Ok(response)
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    run(service_fn(function_handler)).await
}

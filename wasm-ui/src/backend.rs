//! HTTP calls to the workbench backend.
//!
//! Every call goes through [`read_body`], so a transport failure, a non-2xx
//! status and a malformed body all come back as an [`ApiError`].

use gloo::net::http::{Request, Response};
use ml_workbench::api::{
    self, CSRF_HEADER, CleanResponse, CleanSummary, CompatibleFeatures,
    CompatibleFeaturesRequest, DatasetStatistics, PlotData, PlotDataResponse, RunModelRequest,
    RunModelResponse, UpdateEmailRequest, UploadResponse, VariablesResponse, WorkflowStats,
};
use ml_workbench::{ApiError, PlotRequest, WorkbenchConfig};
use serde_json::{Map, Value};
use wasm_bindgen::JsValue;
use web_sys::{File, FormData};

use crate::dom;

fn net_err(e: gloo::net::Error) -> ApiError {
    ApiError::Network(e.to_string())
}

fn js_err(e: JsValue) -> ApiError {
    ApiError::Network(format!("{e:?}"))
}

async fn read_body(resp: Response) -> Result<String, ApiError> {
    let status = resp.status();
    let body = resp.text().await.map_err(net_err)?;
    api::check_status(status, &body)?;
    Ok(body)
}

fn csrf(config: &WorkbenchConfig) -> String {
    dom::csrf_token(&config.csrf_field)
}

/// `POST /upload/` with the file as multipart form data.
pub async fn upload(config: &WorkbenchConfig, file: &File) -> Result<DatasetStatistics, ApiError> {
    let form = FormData::new().map_err(js_err)?;
    form.append_with_blob_and_filename("file", file, &file.name())
        .map_err(js_err)?;
    let resp = Request::post(&config.url(&config.endpoints.upload))
        .header(CSRF_HEADER, &csrf(config))
        .body(form)
        .map_err(net_err)?
        .send()
        .await
        .map_err(net_err)?;
    let body = read_body(resp).await?;
    api::decode::<UploadResponse>(&body)?.into_result()
}

/// `POST /clean_data/`; prepares the uploaded dataset for modeling.
pub async fn clean_data(config: &WorkbenchConfig) -> Result<CleanSummary, ApiError> {
    let resp = Request::post(&config.url(&config.endpoints.clean_data))
        .header(CSRF_HEADER, &csrf(config))
        .send()
        .await
        .map_err(net_err)?;
    let body = read_body(resp).await?;
    api::decode::<CleanResponse>(&body)?.into_result()
}

pub async fn compatible_features(
    config: &WorkbenchConfig,
    request: &CompatibleFeaturesRequest,
) -> Result<CompatibleFeatures, ApiError> {
    let resp = Request::post(&config.url(&config.endpoints.compatible_features))
        .header(CSRF_HEADER, &csrf(config))
        .json(request)
        .map_err(net_err)?
        .send()
        .await
        .map_err(net_err)?;
    let body = read_body(resp).await?;
    api::parse_compatible_features(&body)
}

pub async fn run_model(
    config: &WorkbenchConfig,
    request: &RunModelRequest,
) -> Result<Map<String, Value>, ApiError> {
    log::info!("running {} for {}", request.model, request.target_type);
    let resp = Request::post(&config.url(&config.endpoints.run_model))
        .header(CSRF_HEADER, &csrf(config))
        .json(request)
        .map_err(net_err)?
        .send()
        .await
        .map_err(net_err)?;
    let body = read_body(resp).await?;
    api::decode::<RunModelResponse>(&body)?.into_result()
}

pub async fn variables(config: &WorkbenchConfig) -> Result<Vec<String>, ApiError> {
    let resp = Request::get(&config.url(&config.endpoints.variables))
        .send()
        .await
        .map_err(net_err)?;
    let body = read_body(resp).await?;
    api::decode::<VariablesResponse>(&body)?.into_result()
}

pub async fn plot_data(
    config: &WorkbenchConfig,
    request: &PlotRequest,
) -> Result<PlotData, ApiError> {
    let resp = Request::get(&config.url(&config.endpoints.plot_data))
        .query(request.query())
        .send()
        .await
        .map_err(net_err)?;
    let body = read_body(resp).await?;
    api::decode::<PlotDataResponse>(&body)?.into_result()
}

pub async fn workflow_stats(config: &WorkbenchConfig) -> Result<WorkflowStats, ApiError> {
    let resp = Request::get(&config.url(&config.endpoints.workflow_statistics))
        .send()
        .await
        .map_err(net_err)?;
    let body = read_body(resp).await?;
    api::decode(&body)
}

pub async fn update_email(
    config: &WorkbenchConfig,
    request: &UpdateEmailRequest,
) -> Result<(), ApiError> {
    let resp = Request::post(&config.url(&config.endpoints.update_email))
        .header(CSRF_HEADER, &csrf(config))
        .json(request)
        .map_err(net_err)?
        .send()
        .await
        .map_err(net_err)?;
    read_body(resp).await.map(|_| ())
}

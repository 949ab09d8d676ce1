//! HTTP handlers of the kinematic analysis.
use actix_web::{
    http::StatusCode,
    post,
    web::{self, Data, Json, ServiceConfig},
    HttpResponse, ResponseError,
};
use four_bar_kin::{csv::report_csv, Analysis, Coupler, LinkSet, Report, SweepCfg};
use serde::{Deserialize, Serialize};

/// Parameters used when a request omits them.
#[derive(Copy, Clone, Debug)]
pub struct Defaults {
    pub step_deg: f64,
    pub rpm: f64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self { step_deg: 1., rpm: 30. }
    }
}

/// Request body of the analysis endpoints.
#[derive(Deserialize, Debug)]
pub struct SolveRequest {
    #[serde(rename = "L1")]
    l1: f64,
    #[serde(rename = "L2")]
    l2: f64,
    #[serde(rename = "L3")]
    l3: f64,
    #[serde(rename = "L4")]
    l4: f64,
    step_deg: Option<f64>,
    rpm: Option<f64>,
    ratio: Option<f64>,
    phi_deg: Option<f64>,
}

impl SolveRequest {
    fn analysis(&self, defaults: &Defaults) -> Analysis {
        let links = LinkSet::new(self.l1, self.l2, self.l3, self.l4);
        let sweep = SweepCfg::from_deg_rpm(
            self.step_deg.unwrap_or(defaults.step_deg),
            self.rpm.unwrap_or(defaults.rpm),
        );
        let coupler = Coupler {
            ratio: self.ratio.unwrap_or(1.),
            phi: self.phi_deg.unwrap_or(0.).to_radians(),
        };
        Analysis::new(links).sweep(sweep).coupler(coupler)
    }
}

/// Error of the analysis endpoints.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Analysis(#[from] four_bar_kin::Error),
    #[error("analysis worker is unavailable")]
    Blocking,
}

impl ApiError {
    fn kind(&self) -> &'static str {
        match self {
            Self::Analysis(e) => e.kind(),
            Self::Blocking => "unavailable",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        use four_bar_kin::Error::*;
        match self {
            Self::Analysis(MechanismInvalid { .. } | InvalidParameter { .. }) => {
                StatusCode::BAD_REQUEST
            }
            Self::Analysis(InsufficientSamples { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Analysis(_) | Self::Blocking => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = ErrorBody { error: self.kind(), message: self.to_string() };
        HttpResponse::build(self.status_code()).json(body)
    }
}

async fn run(defaults: &Defaults, req: SolveRequest) -> Result<Report, ApiError> {
    let analysis = req.analysis(defaults);
    let links = analysis.links;
    let res = web::block(move || analysis.run())
        .await
        .map_err(|_| ApiError::Blocking)?;
    match res {
        Ok(report) => {
            tracing::info!(
                %links,
                ty = %report.ty,
                frames = report.len(),
                skipped = report.skipped,
                "analysis done"
            );
            Ok(report)
        }
        Err(e) => {
            tracing::warn!(%links, kind = e.kind(), "analysis rejected: {e}");
            Err(e.into())
        }
    }
}

/// Analyze a linkage, respond with the report in JSON.
#[post("/solve")]
async fn solve(
    defaults: Data<Defaults>,
    json: Json<SolveRequest>,
) -> Result<Json<Report>, ApiError> {
    run(&defaults, json.into_inner()).await.map(Json)
}

/// Analyze a linkage, respond with the report in CSV.
#[post("/solve.csv")]
async fn solve_csv(
    defaults: Data<Defaults>,
    json: Json<SolveRequest>,
) -> Result<HttpResponse, ApiError> {
    let report = run(&defaults, json.into_inner()).await?;
    let csv = report_csv(&report)?;
    Ok(HttpResponse::Ok().content_type("text/csv").body(csv))
}

/// Register the endpoints and the default parameters.
pub fn config(defaults: Defaults) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(Data::new(defaults))
            .service(solve)
            .service(solve_csv);
    }
}

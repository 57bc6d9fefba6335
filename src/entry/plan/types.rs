use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::args::HttpMethod;
use crate::http::ProxyTarget;

/// Initial size and growth rates of a generated payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GrowthSpec {
    pub(crate) size: usize,
    pub(crate) increment: usize,
    pub(crate) multiplier: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BodySpec {
    Generated(GrowthSpec),
    File(PathBuf),
}

#[derive(Debug)]
pub(crate) struct TestPlan {
    pub(crate) destination: Url,
    pub(crate) method: HttpMethod,
    pub(crate) workers: usize,
    pub(crate) limit: u64,
    pub(crate) timeout: Option<Duration>,
    pub(crate) request_timeout: Duration,
    pub(crate) header: Option<GrowthSpec>,
    pub(crate) body: Option<BodySpec>,
    pub(crate) max_payload: usize,
    pub(crate) proxy: Option<ProxyTarget>,
}

#[derive(Debug)]
pub(crate) struct LoadPlan {
    pub(crate) urls: Vec<String>,
    pub(crate) workers: usize,
    pub(crate) timeout: Option<Duration>,
    pub(crate) request_timeout: Duration,
    pub(crate) proxy: Option<ProxyTarget>,
}

#[derive(Debug)]
pub(crate) enum RunPlan {
    Test(TestPlan),
    Load(LoadPlan),
}

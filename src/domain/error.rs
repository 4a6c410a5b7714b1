/// User-facing failures. Every variant maps to a stable code surfaced in the
/// `--json` error envelope; none are fatal beyond the current invocation.
#[derive(thiserror::Error, Debug)]
pub enum SwapError {
    #[error("no <prop> entries found in {0}")]
    NoProps(String),
    #[error("select a guild (--guild) before running pre-check against a guild hall")]
    GuildRequired,
    #[error("decoration database unavailable: {0}")]
    CatalogUnavailable(String),
    #[error("no pre-check on record; run `decoswap precheck` first")]
    NoPlan,
    #[error("swap plan is out of date ({0}); run `decoswap precheck` again")]
    StalePlan(String),
    #[error(
        "ownership counts are unavailable; enable --include-missing or re-run \
         pre-check with the helper reachable and a guild selected"
    )]
    OwnershipUnverified,
}

impl SwapError {
    pub fn code(&self) -> &'static str {
        match self {
            SwapError::NoProps(_) => "INPUT_ABSENT",
            SwapError::GuildRequired => "SELECTOR_REQUIRED",
            SwapError::CatalogUnavailable(_) => "SERVICE_UNAVAILABLE",
            SwapError::NoPlan => "NO_PLAN",
            SwapError::StalePlan(_) => "STALE_PLAN",
            SwapError::OwnershipUnverified => "OWNERSHIP_UNVERIFIED",
        }
    }
}

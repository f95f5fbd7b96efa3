use std::num::IntErrorKind;
use utoipa::IntoParams;

/// Query parameters for `GET /api/events`.
///
/// `limit` is kept as raw text so that malformed values fall back to the
/// default instead of rejecting the request.
#[derive(Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct IndexParams {
    /// Maximum number of events to return
    #[param(value_type = Option<u64>, example = 20)]
    pub(crate) limit: Option<String>,
}

impl IndexParams {
    /// Builds the parameters from decoded query pairs. When a key repeats,
    /// its first occurrence wins.
    pub(crate) fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let limit = pairs
            .into_iter()
            .find_map(|(key, value)| (key == "limit").then_some(value));

        Self { limit }
    }

    /// Resolves the effective limit: unparseable or absent values use
    /// `default_limit`, and the result is clamped to `1..=max_limit`.
    pub(crate) fn effective_limit(&self, default_limit: u64, max_limit: u64) -> u64 {
        let max_limit = max_limit.max(1);

        let requested = match self.limit.as_deref().map(str::trim) {
            None => return default_limit.clamp(1, max_limit),
            Some(raw) => match raw.parse::<i64>() {
                Ok(n) => n,
                Err(e) => match e.kind() {
                    IntErrorKind::PosOverflow => i64::MAX,
                    IntErrorKind::NegOverflow => i64::MIN,
                    _ => return default_limit.clamp(1, max_limit),
                },
            },
        };

        u64::try_from(requested.max(1))
            .unwrap_or(max_limit)
            .min(max_limit)
    }
}

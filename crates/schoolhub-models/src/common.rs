//! Shared response shapes and lookup parameters.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use schoolhub_core::serde::deserialize_filter;

/// Preview of the next sequential id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct NextIdResponse {
    #[schema(example = "INV-042")]
    pub id: String,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ClassLookupParams {
    /// Level id or `all`
    #[serde(default, deserialize_with = "deserialize_filter")]
    pub level_id: Option<String>,
}

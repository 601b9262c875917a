//! Coordinator HTTP Protocol

use serde::Deserialize;

pub const ENDPOINT_ROOT: &str = "/";
pub const ENDPOINT_QUERY: &str = "/query";

pub const BANNER: &str = "Coordinator running. Use /query?titulo=<text>&edad=<age>&tipo_doc=<type1>+<type2> to search.";

#[derive(Debug, Default, Deserialize)]
pub struct CoordinatorQueryParams {
    #[serde(default)]
    pub titulo: String,
    pub edad: Option<String>,
    pub tipo_doc: Option<String>,
}

impl CoordinatorQueryParams {
    pub fn age(&self) -> Option<i64> {
        self.edad.as_deref().and_then(|s| s.trim().parse().ok())
    }
}
